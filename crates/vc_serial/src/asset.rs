use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{ArchiveError, ArchiveResult};
use crate::version::Game;

// -----------------------------------------------------------------------------
// FourCC

/// A four-character code, stored big-endian.
///
/// # Examples
///
/// ```
/// # use vc_serial::FourCC;
/// let code = FourCC::new(*b"CACH");
/// assert_eq!(code.to_u32(), 0x4341_4348);
/// assert_eq!(code.to_string(), "CACH");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FourCC([u8; 4]);

impl FourCC {
    #[inline]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    #[inline]
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02X}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({self})")
    }
}

impl FromStr for FourCC {
    type Err = ArchiveError;

    /// Accepts the [`Display`](fmt::Display) form, `\xNN` escapes included.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ArchiveError::invalid_value("FourCC", s);

        let mut bytes = [0_u8; 4];
        let mut rest = s.as_bytes();
        for byte in &mut bytes {
            *byte = match rest {
                [b'\\', b'x', hi, lo, tail @ ..] => {
                    rest = tail;
                    let pair = [*hi, *lo];
                    let digits = core::str::from_utf8(&pair).map_err(|_| invalid())?;
                    u8::from_str_radix(digits, 16).map_err(|_| invalid())?
                }
                [first, tail @ ..] => {
                    rest = tail;
                    *first
                }
                [] => return Err(invalid()),
            };
        }
        if !rest.is_empty() {
            return Err(invalid());
        }
        Ok(Self(bytes))
    }
}

// -----------------------------------------------------------------------------
// AssetId

/// Identifier of an asset in the resource catalog.
///
/// The stored width follows the edition: games up to and including
/// [`Game::Echoes`] use 32-bit ids, later ones 64-bit ids.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssetId(u64);

impl AssetId {
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Writes the id with the width used by `game`.
    pub fn put(self, buf: &mut BytesMut, game: Game) -> ArchiveResult<()> {
        if game.uses_32bit_asset_ids() {
            let short = u32::try_from(self.0)
                .map_err(|_| ArchiveError::invalid_value("32-bit asset id", self))?;
            buf.put_u32(short);
        } else {
            buf.put_u64(self.0);
        }
        Ok(())
    }

    /// Reads an id with the width used by `game`.
    pub fn get(buf: &mut Bytes, game: Game) -> ArchiveResult<Self> {
        let needed = Self::width(game);
        if buf.remaining() < needed {
            return Err(ArchiveError::eof(needed, buf.remaining()));
        }
        Ok(if game.uses_32bit_asset_ids() {
            Self(u64::from(buf.get_u32()))
        } else {
            Self(buf.get_u64())
        })
    }

    /// Byte width of ids under `game`.
    #[inline]
    pub const fn width(game: Game) -> usize {
        if game.uses_32bit_asset_ids() { 4 } else { 8 }
    }

    /// Text form: `0x` followed by zero-padded hex digits for the edition's width.
    pub fn to_text(self, game: Game) -> String {
        if game.uses_32bit_asset_ids() {
            alloc::format!("0x{:08X}", self.0)
        } else {
            alloc::format!("0x{:016X}", self.0)
        }
    }

    /// Parses the text form. The `0x` prefix is optional.
    pub fn from_text(text: &str) -> ArchiveResult<Self> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        u64::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| ArchiveError::invalid_value("asset id", text))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({:#X})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{AssetId, FourCC};
    use crate::version::Game;
    use bytes::BytesMut;

    #[test]
    fn fourcc_text() {
        let code: FourCC = "MPRM".parse().unwrap();
        assert_eq!(code, FourCC::new(*b"MPRM"));
        assert_eq!(FourCC::from_u32(code.to_u32()), code);
        assert!("MPR".parse::<FourCC>().is_err());
        assert_eq!(FourCC::new([b'A', 0, b'B', b'C']).to_string(), "A\\x00BC");
        assert_eq!("A\\x00BC".parse::<FourCC>().unwrap(), FourCC::new([b'A', 0, b'B', b'C']));
        let blank = FourCC::default();
        assert_eq!(blank.to_string().parse::<FourCC>().unwrap(), blank);
        assert!("MPRMX".parse::<FourCC>().is_err());
    }

    #[test]
    fn asset_id_width_follows_game() {
        let id = AssetId::new(0x1234_5678);

        let mut short = BytesMut::new();
        id.put(&mut short, Game::Prime).unwrap();
        assert_eq!(short.len(), 4);

        let mut long = BytesMut::new();
        id.put(&mut long, Game::Corruption).unwrap();
        assert_eq!(long.len(), 8);

        let mut bytes = short.freeze();
        assert_eq!(AssetId::get(&mut bytes, Game::Prime).unwrap(), id);

        let mut too_wide = BytesMut::new();
        assert!(AssetId::new(u64::MAX).put(&mut too_wide, Game::Echoes).is_err());
    }

    #[test]
    fn asset_id_text() {
        let id = AssetId::new(0xABCD);
        assert_eq!(id.to_text(Game::Prime), "0x0000ABCD");
        assert_eq!(id.to_text(Game::DKCReturns), "0x000000000000ABCD");
        assert_eq!(AssetId::from_text("0x0000ABCD").unwrap(), id);
        assert_eq!(AssetId::from_text("abcd").unwrap(), id);
        assert!(AssetId::from_text("0xZZ").is_err());
    }
}
