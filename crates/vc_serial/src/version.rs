use alloc::string::String;
use core::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::archive::Archive;
use crate::error::{ArchiveError, ArchiveResult};
use crate::flags::SerialHints;
use crate::param::DefaultValue;
use crate::primitive::PrimitiveMut;
use crate::serial::{Serial, SerialCategory};
use crate::FourCC;

// -----------------------------------------------------------------------------
// ArchiveVersion

/// Revisions of the engine's own schema.
///
/// Insert new revisions at the end and bump [`ArchiveVersion::CURRENT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ArchiveVersion {
    Initial = 0,
    /// Binary array counts widened from 16 to 32 bits.
    BinarySize32 = 1,
    /// Non-abstract pointers stopped carrying a `Type` attribute.
    Refactor = 2,
}

impl ArchiveVersion {
    /// The revision written by this engine.
    pub const CURRENT: u16 = ArchiveVersion::Refactor as u16;
}

// -----------------------------------------------------------------------------
// Game

/// The edition tag: which game's variant of the domain schema is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Game {
    PrimeDemo,
    Prime,
    EchoesDemo,
    Echoes,
    CorruptionProto,
    Corruption,
    DKCReturns,
    #[default]
    Unknown,
}

impl Game {
    pub const ALL: [Game; 8] = [
        Game::PrimeDemo,
        Game::Prime,
        Game::EchoesDemo,
        Game::Echoes,
        Game::CorruptionProto,
        Game::Corruption,
        Game::DKCReturns,
        Game::Unknown,
    ];

    /// Four-character id used by binary archives.
    pub const fn id(self) -> FourCC {
        FourCC::new(match self {
            Game::PrimeDemo => *b"MP1D",
            Game::Prime => *b"MPRM",
            Game::EchoesDemo => *b"MP2D",
            Game::Echoes => *b"MP2E",
            Game::CorruptionProto => *b"MP3P",
            Game::Corruption => *b"MP3C",
            Game::DKCReturns => *b"RTRN",
            Game::Unknown => *b"UNKN",
        })
    }

    pub fn from_id(id: FourCC) -> Option<Game> {
        Self::ALL.into_iter().find(|game| game.id() == id)
    }

    /// Name used by text archives.
    pub const fn name(self) -> &'static str {
        match self {
            Game::PrimeDemo => "PrimeDemo",
            Game::Prime => "Prime",
            Game::EchoesDemo => "EchoesDemo",
            Game::Echoes => "Echoes",
            Game::CorruptionProto => "CorruptionProto",
            Game::Corruption => "Corruption",
            Game::DKCReturns => "DKCReturns",
            Game::Unknown => "Unknown",
        }
    }

    pub fn from_name(name: &str) -> Option<Game> {
        Self::ALL.into_iter().find(|game| game.name() == name)
    }

    /// Whether asset ids are 32 bits wide for this game.
    pub const fn uses_32bit_asset_ids(self) -> bool {
        matches!(
            self,
            Game::PrimeDemo | Game::Prime | Game::EchoesDemo | Game::Echoes
        )
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serial for Game {
    const CATEGORY: SerialCategory = SerialCategory::FreeFunction;

    fn serial_body(&mut self, ar: &mut Archive<'_>, hints: SerialHints) -> ArchiveResult<()> {
        if ar.is_text_format() {
            let mut name = String::from(self.name());
            ar.serialize_primitive(PrimitiveMut::String(&mut name), hints)?;
            if ar.is_reader() {
                *self = Game::from_name(&name)
                    .ok_or_else(|| ArchiveError::invalid_value("game", &name))?;
            }
        } else {
            let mut id = self.id();
            ar.serialize_primitive(PrimitiveMut::FourCC(&mut id), hints)?;
            if ar.is_reader() {
                *self = Game::from_id(id).ok_or(ArchiveError::UnknownGame(id))?;
            }
        }
        Ok(())
    }
}

impl DefaultValue for Game {}

// -----------------------------------------------------------------------------
// SerialVersion

/// The version context of one traversal.
///
/// Set once right after a backend is opened, then read by every nested field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialVersion {
    /// Engine schema revision, see [`ArchiveVersion`].
    pub archive: u16,
    /// Revision of the file's own content schema.
    pub file: u16,
    /// Edition tag.
    pub game: Game,
}

impl Default for SerialVersion {
    /// See [`SerialVersion::current`].
    #[inline]
    fn default() -> Self {
        Self::current()
    }
}

impl SerialVersion {
    /// Byte length of the raw binary header.
    pub const HEADER_LEN: usize = 8;

    #[inline]
    pub const fn new(archive: u16, file: u16, game: Game) -> Self {
        Self {
            archive,
            file,
            game,
        }
    }

    /// Current engine revision, file revision 0, unknown game.
    #[inline]
    pub const fn current() -> Self {
        Self::new(ArchiveVersion::CURRENT, 0, Game::Unknown)
    }

    /// Current engine revision with the given content revision and game.
    #[inline]
    pub const fn for_file(file: u16, game: Game) -> Self {
        Self::new(ArchiveVersion::CURRENT, file, game)
    }

    /// Whether the engine revision is older than `version`.
    #[inline]
    pub fn is_before(&self, version: ArchiveVersion) -> bool {
        self.archive < version as u16
    }

    /// Fails if the engine revision is newer than this engine understands.
    pub fn check_supported(&self) -> ArchiveResult<()> {
        if self.archive > ArchiveVersion::CURRENT {
            return Err(ArchiveError::UnsupportedVersion {
                found: self.archive,
                supported: ArchiveVersion::CURRENT,
            });
        }
        Ok(())
    }

    /// Writes the raw header used by container formats:
    /// `u16 archive`, `u16 file`, `FourCC game`, all big-endian.
    pub fn write_header(&self, buf: &mut BytesMut) {
        buf.put_u16(self.archive);
        buf.put_u16(self.file);
        buf.put_slice(self.game.id().as_bytes());
    }

    /// Reads a header written by [`write_header`](Self::write_header).
    pub fn read_header(buf: &mut Bytes) -> ArchiveResult<Self> {
        if buf.remaining() < Self::HEADER_LEN {
            return Err(ArchiveError::eof(Self::HEADER_LEN, buf.remaining()));
        }
        let archive = buf.get_u16();
        let file = buf.get_u16();
        let id = FourCC::from_u32(buf.get_u32());
        let game = Game::from_id(id).ok_or(ArchiveError::UnknownGame(id))?;
        Ok(Self::new(archive, file, game))
    }
}

impl fmt::Display for SerialVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "archive v{}, file v{}, {}",
            self.archive, self.file, self.game
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ArchiveVersion, Game, SerialVersion};
    use crate::error::ArchiveError;
    use bytes::BytesMut;

    #[test]
    fn game_ids_are_unique() {
        for game in Game::ALL {
            assert_eq!(Game::from_id(game.id()), Some(game));
            assert_eq!(Game::from_name(game.name()), Some(game));
        }
    }

    #[test]
    fn header_round_trip() {
        let version = SerialVersion::for_file(3, Game::Echoes);
        let mut buf = BytesMut::new();
        version.write_header(&mut buf);
        assert_eq!(buf.len(), SerialVersion::HEADER_LEN);
        assert_eq!(&buf[4..], b"MP2E");

        let mut bytes = buf.freeze();
        assert_eq!(SerialVersion::read_header(&mut bytes).unwrap(), version);
    }

    #[test]
    fn newer_archive_is_rejected() {
        let version = SerialVersion::new(ArchiveVersion::CURRENT + 1, 0, Game::Prime);
        assert!(matches!(
            version.check_supported(),
            Err(ArchiveError::UnsupportedVersion { .. })
        ));
        assert!(SerialVersion::new(0, 0, Game::Prime).is_before(ArchiveVersion::Refactor));
        assert!(!SerialVersion::current().is_before(ArchiveVersion::Refactor));
    }
}
