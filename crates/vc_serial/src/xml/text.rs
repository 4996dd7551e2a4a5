//! Text forms of leaf values.

use alloc::string::{String, ToString};

use crate::asset::{AssetId, FourCC};
use crate::error::{ArchiveError, ArchiveResult};
use crate::flags::SerialHints;
use crate::primitive::PrimitiveMut;
use crate::version::Game;

macro_rules! format_int {
    ($v:expr, $hints:expr) => {
        if $hints.contains(SerialHints::HEX_DISPLAY) {
            alloc::format!("{:#X}", $v)
        } else {
            $v.to_string()
        }
    };
}

pub(crate) fn format_primitive(value: &PrimitiveMut<'_>, hints: SerialHints, game: Game) -> String {
    match value {
        PrimitiveMut::Bool(v) => v.to_string(),
        PrimitiveMut::I8(v) => format_int!(**v, hints),
        PrimitiveMut::U8(v) => format_int!(**v, hints),
        PrimitiveMut::I16(v) => format_int!(**v, hints),
        PrimitiveMut::U16(v) => format_int!(**v, hints),
        PrimitiveMut::I32(v) => format_int!(**v, hints),
        PrimitiveMut::U32(v) => format_int!(**v, hints),
        PrimitiveMut::I64(v) => format_int!(**v, hints),
        PrimitiveMut::U64(v) => format_int!(**v, hints),
        PrimitiveMut::F32(v) => v.to_string(),
        PrimitiveMut::F64(v) => v.to_string(),
        PrimitiveMut::String(v) => String::clone(v),
        PrimitiveMut::FourCC(v) => v.to_string(),
        PrimitiveMut::AssetId(v) => v.to_text(game),
    }
}

/// Parses an integer written in decimal or, with a `0x` prefix, in hex.
///
/// Hex values are read as the unsigned type of the same width, so negative
/// numbers written in two's complement come back unchanged.
macro_rules! parse_int {
    ($text:expr, $ty:ty, $unsigned:ty) => {{
        let text = $text.trim();
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(digits) => <$unsigned>::from_str_radix(digits, 16).map(|v| v as $ty).ok(),
            None => text.parse::<$ty>().ok(),
        };
        parsed.ok_or_else(|| ArchiveError::invalid_value(stringify!($ty), text))?
    }};
}

/// Asset ids carry their own width in text, so unlike formatting this does
/// not depend on the game.
pub(crate) fn parse_primitive(value: PrimitiveMut<'_>, text: &str) -> ArchiveResult<()> {
    match value {
        PrimitiveMut::Bool(v) => {
            *v = match text.trim() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => return Err(ArchiveError::invalid_value("bool", other)),
            }
        }
        PrimitiveMut::I8(v) => *v = parse_int!(text, i8, u8),
        PrimitiveMut::U8(v) => *v = parse_int!(text, u8, u8),
        PrimitiveMut::I16(v) => *v = parse_int!(text, i16, u16),
        PrimitiveMut::U16(v) => *v = parse_int!(text, u16, u16),
        PrimitiveMut::I32(v) => *v = parse_int!(text, i32, u32),
        PrimitiveMut::U32(v) => *v = parse_int!(text, u32, u32),
        PrimitiveMut::I64(v) => *v = parse_int!(text, i64, u64),
        PrimitiveMut::U64(v) => *v = parse_int!(text, u64, u64),
        PrimitiveMut::F32(v) => {
            *v = text
                .trim()
                .parse()
                .map_err(|_| ArchiveError::invalid_value("f32", text))?;
        }
        PrimitiveMut::F64(v) => {
            *v = text
                .trim()
                .parse()
                .map_err(|_| ArchiveError::invalid_value("f64", text))?;
        }
        PrimitiveMut::String(v) => {
            v.clear();
            v.push_str(text);
        }
        PrimitiveMut::FourCC(v) => *v = text.parse::<FourCC>()?,
        PrimitiveMut::AssetId(v) => *v = AssetId::from_text(text)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_primitive, parse_primitive};
    use crate::flags::SerialHints;
    use crate::primitive::PrimitiveMut;
    use crate::version::Game;

    #[test]
    fn hex_display() {
        let mut value = 255_u32;
        let text = format_primitive(
            &PrimitiveMut::U32(&mut value),
            SerialHints::HEX_DISPLAY,
            Game::Prime,
        );
        assert_eq!(text, "0xFF");

        let mut signed = -1_i16;
        let text = format_primitive(
            &PrimitiveMut::I16(&mut signed),
            SerialHints::HEX_DISPLAY,
            Game::Prime,
        );
        assert_eq!(text, "0xFFFF");

        let mut read = 0_i16;
        parse_primitive(PrimitiveMut::I16(&mut read), &text).unwrap();
        assert_eq!(read, -1);

        let mut read = 0_u32;
        parse_primitive(PrimitiveMut::U32(&mut read), "42").unwrap();
        assert_eq!(read, 42);
        assert!(parse_primitive(PrimitiveMut::U32(&mut read), "-3").is_err());
    }

    #[test]
    fn bool_and_float() {
        let mut flag = false;
        parse_primitive(PrimitiveMut::Bool(&mut flag), "true").unwrap();
        assert!(flag);
        assert!(parse_primitive(PrimitiveMut::Bool(&mut flag), "yes").is_err());

        let mut value = 0.1_f32;
        let text =
            format_primitive(&PrimitiveMut::F32(&mut value), SerialHints::empty(), Game::Prime);
        let mut read = 0.0_f32;
        parse_primitive(PrimitiveMut::F32(&mut read), &text).unwrap();
        assert_eq!(read, value);
    }
}
