//! Compact big-endian binary backend.
//!
//! Structure is implicit: scopes produce no bytes and every parameter is
//! always present, so readers must visit fields in exactly the order
//! writers did for the same schema revision.
//!
//! | Value              | Encoding                                            |
//! |--------------------|-----------------------------------------------------|
//! | `bool`, pointer    | one byte, `0` or `1`                                |
//! | integers, floats   | fixed width, big-endian                             |
//! | `String`           | `u32` byte length, then UTF-8 bytes                 |
//! | `FourCC`           | four raw bytes                                      |
//! | `AssetId`          | `u32` or `u64`, following the game                  |
//! | container count    | `u16` before `BinarySize32`, `u32` from then on     |

mod reader;
mod writer;

pub use reader::BinaryReader;
pub use writer::BinaryWriter;

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{BinaryReader, BinaryWriter};
    use crate::{
        Archive, ArchiveError, ArchiveVersion, AssetId, FourCC, Game, SerialVersion,
    };

    #[test]
    fn primitives_round_trip() {
        let mut flag = true;
        let mut small = -7_i8;
        let mut word = 0xBEEF_u16;
        let mut long = -1_i64;
        let mut ratio = 0.25_f32;
        let mut precise = core::f64::consts::PI;
        let mut text = String::from("héllo");
        let mut code = FourCC::new(*b"TXTR");
        let mut id = AssetId::new(0xDEAD_BEEF);

        let mut writer = BinaryWriter::new();
        {
            let mut ar =
                Archive::with_version(&mut writer, SerialVersion::for_file(0, Game::Prime));
            ar.field("Flag", &mut flag)
                .unwrap()
                .field("Small", &mut small)
                .unwrap()
                .field("Word", &mut word)
                .unwrap()
                .field("Long", &mut long)
                .unwrap()
                .field("Ratio", &mut ratio)
                .unwrap()
                .field("Precise", &mut precise)
                .unwrap()
                .field("Text", &mut text)
                .unwrap()
                .field("Code", &mut code)
                .unwrap()
                .field("Id", &mut id)
                .unwrap();
        }
        // 1 + 1 + 2 + 8 + 4 + 8 + (4 + 6) + 4 + 4
        assert_eq!(writer.len(), 42);

        let mut reader = BinaryReader::new(writer.into_bytes());
        let mut ar = Archive::with_version(&mut reader, SerialVersion::for_file(0, Game::Prime));

        let (mut f, mut s, mut w, mut l) = (false, 0_i8, 0_u16, 0_i64);
        let (mut r, mut p, mut t) = (0_f32, 0_f64, String::new());
        let (mut c, mut i) = (FourCC::default(), AssetId::default());
        ar.field("Flag", &mut f)
            .unwrap()
            .field("Small", &mut s)
            .unwrap()
            .field("Word", &mut w)
            .unwrap()
            .field("Long", &mut l)
            .unwrap()
            .field("Ratio", &mut r)
            .unwrap()
            .field("Precise", &mut p)
            .unwrap()
            .field("Text", &mut t)
            .unwrap()
            .field("Code", &mut c)
            .unwrap()
            .field("Id", &mut i)
            .unwrap();

        assert_eq!((f, s, w, l), (flag, small, word, long));
        assert_eq!((r, p), (ratio, precise));
        assert_eq!(t, text);
        assert_eq!((c, i), (code, id));
    }

    #[test]
    fn array_size_width_follows_archive_version() {
        let mut items = vec![1_u8, 2, 3];
        let mut nested: Vec<u16> = vec![4, 5];

        let old = SerialVersion::new(ArchiveVersion::Initial as u16, 0, Game::Prime);
        let mut writer = BinaryWriter::new();
        Archive::with_version(&mut writer, old)
            .field("Nested", &mut nested)
            .unwrap();
        // u16 count, two u16 items
        assert_eq!(writer.as_bytes(), &[0, 2, 0, 4, 0, 5]);

        let mut writer = BinaryWriter::new();
        Archive::with_version(&mut writer, old)
            .field("Items", &mut items)
            .unwrap();
        // byte buffers keep an explicit u32 size
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 3, 1, 2, 3]);

        let mut writer = BinaryWriter::new();
        Archive::with_version(&mut writer, SerialVersion::current())
            .field("Nested", &mut nested)
            .unwrap();
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 2, 0, 4, 0, 5]);
    }

    #[test]
    fn truncated_input_is_an_error() {
        let mut reader = BinaryReader::new(bytes::Bytes::from_static(&[0, 0, 0, 9, b'a']));
        let mut text = String::new();
        let err = Archive::new(&mut reader).field("Text", &mut text).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ArchiveError::UnexpectedEof { needed: 9, remaining: 1 }
        ));
    }

    #[test]
    fn version_header_is_recovered() {
        let mut writer = BinaryWriter::new();
        Archive::open_writer(&mut writer, 4, Game::Corruption).unwrap();
        assert_eq!(&writer.as_bytes()[..2], &ArchiveVersion::CURRENT.to_be_bytes());

        let mut reader = BinaryReader::new(writer.into_bytes());
        let ar = Archive::open_reader(&mut reader).unwrap();
        assert_eq!(ar.version(), SerialVersion::for_file(4, Game::Corruption));
    }
}
