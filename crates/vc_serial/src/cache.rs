//! The resource cache container.
//!
//! ```text
//! "CACH"                      magic
//! u16 archive, u16 file       version header
//! FourCC game
//! u32 count
//! count * {
//!     AssetId id              u32 or u64, following the game
//!     u32 size
//!     [u8; size] payload      binary archive, inside an `EntryCache` scope
//! }
//! ```
//!
//! All integers are big-endian. The size prefix lets readers skip entries
//! they cannot interpret: reading always resumes at the end of the payload.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::{debug, trace, warn};

use crate::archive::Archive;
use crate::asset::{AssetId, FourCC};
use crate::binary::{BinaryReader, BinaryWriter};
use crate::error::{ArchiveError, ArchiveResult, len_u32};
use crate::flags::SerialHints;
use crate::version::SerialVersion;

pub const CACHE_MAGIC: FourCC = FourCC::new(*b"CACH");

/// Scope every entry payload is serialized in.
const ENTRY_SCOPE: &str = "EntryCache";

/// Offset of the entry count: magic, then version header.
const COUNT_OFFSET: usize = 4 + SerialVersion::HEADER_LEN;

// -----------------------------------------------------------------------------
// CacheWriter

/// Builds a cache container entry by entry.
pub struct CacheWriter {
    buf: BytesMut,
    version: SerialVersion,
    count: u32,
}

impl CacheWriter {
    pub fn new(version: SerialVersion) -> Self {
        let mut buf = BytesMut::with_capacity(COUNT_OFFSET + 4);
        buf.put_slice(CACHE_MAGIC.as_bytes());
        version.write_header(&mut buf);
        // patched by `finish`
        buf.put_u32(0);

        Self {
            buf,
            version,
            count: 0,
        }
    }

    #[inline]
    pub fn version(&self) -> SerialVersion {
        self.version
    }

    /// Number of entries written so far.
    #[inline]
    pub fn len(&self) -> u32 {
        self.count
    }

    /// Appends one entry whose payload is produced by `f`.
    ///
    /// Nothing is appended if `f` fails.
    pub fn write_entry<F>(&mut self, id: AssetId, f: F) -> ArchiveResult<()>
    where
        F: FnOnce(&mut Archive<'_>) -> ArchiveResult<()>,
    {
        let mut payload = BinaryWriter::new();
        {
            let mut ar = Archive::with_version(&mut payload, self.version);
            if ar.param_begin(ENTRY_SCOPE, SerialHints::empty())? {
                f(&mut ar)?;
                ar.param_end()?;
            }
        }
        let payload = payload.into_bytes();
        let size = len_u32(payload.len())?;

        let width = AssetId::width(self.version.game);
        let mut entry = BytesMut::with_capacity(width + 4 + payload.len());
        id.put(&mut entry, self.version.game)?;
        entry.put_u32(size);
        entry.put_slice(&payload);

        self.buf.put_slice(&entry);
        self.count += 1;
        Ok(())
    }

    /// Patches the entry count and returns the container.
    pub fn finish(mut self) -> Bytes {
        self.buf[COUNT_OFFSET..COUNT_OFFSET + 4].copy_from_slice(&self.count.to_be_bytes());
        self.buf.freeze()
    }
}

// -----------------------------------------------------------------------------
// read_cache

/// Reads a cache container, calling `f` once per entry with an archive
/// positioned inside the entry's payload.
///
/// `f` may leave the payload partially or entirely unread; the next entry is
/// read from where the payload ends regardless. Returns the container's
/// version context.
pub fn read_cache<F>(mut data: Bytes, mut f: F) -> ArchiveResult<SerialVersion>
where
    F: FnMut(AssetId, &mut Archive<'_>) -> ArchiveResult<()>,
{
    let magic = FourCC::from_u32(get_u32(&mut data)?);
    if magic != CACHE_MAGIC {
        return Err(ArchiveError::BadMagic {
            expected: CACHE_MAGIC,
            found: magic,
        });
    }

    let version = SerialVersion::read_header(&mut data)?;
    version.check_supported()?;
    let count = get_u32(&mut data)?;
    debug!("reading resource cache: {count} entries ({version})");

    for _ in 0..count {
        let id = AssetId::get(&mut data, version.game)?;
        let size = get_u32(&mut data)? as usize;
        if data.remaining() < size {
            return Err(ArchiveError::eof(size, data.remaining()));
        }

        let mut reader = BinaryReader::new(data.split_to(size));
        {
            let mut ar = Archive::with_version(&mut reader, version);
            if ar.param_begin(ENTRY_SCOPE, SerialHints::empty())? {
                f(id, &mut ar)?;
                ar.param_end()?;
            }
        }

        if reader.remaining() > 0 {
            trace!("skipped {} unread bytes of cache entry {id}", reader.remaining());
        }
    }

    if data.has_remaining() {
        warn!("{} trailing bytes after the last cache entry", data.remaining());
    }
    Ok(version)
}

#[inline]
fn get_u32(data: &mut Bytes) -> ArchiveResult<u32> {
    if data.remaining() < 4 {
        return Err(ArchiveError::eof(4, data.remaining()));
    }
    Ok(data.get_u32())
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use bytes::Bytes;

    use super::{CacheWriter, read_cache};
    use crate::{ArchiveError, AssetId, Game, SerialVersion};

    fn sample(game: Game) -> Bytes {
        let mut cache = CacheWriter::new(SerialVersion::for_file(1, game));
        cache
            .write_entry(AssetId::new(0x10), |ar| {
                let mut name = String::from("first");
                let mut deps = vec![AssetId::new(0x20), AssetId::new(0x30)];
                ar.field("Name", &mut name)?.field("Deps", &mut deps)?;
                Ok(())
            })
            .unwrap();
        cache
            .write_entry(AssetId::new(0x20), |ar| {
                let mut name = String::from("second");
                ar.field("Name", &mut name)?;
                Ok(())
            })
            .unwrap();
        assert_eq!(cache.len(), 2);
        cache.finish()
    }

    #[test]
    fn entries_round_trip() {
        let mut seen = Vec::new();
        let version = read_cache(sample(Game::Echoes), |id, ar| {
            let mut name = String::new();
            ar.field("Name", &mut name)?;
            seen.push((id, name));
            Ok(())
        })
        .unwrap();

        assert_eq!(version, SerialVersion::for_file(1, Game::Echoes));
        assert_eq!(
            seen,
            [
                (AssetId::new(0x10), String::from("first")),
                (AssetId::new(0x20), String::from("second")),
            ]
        );
    }

    #[test]
    fn unread_payloads_are_skipped() {
        let mut ids = Vec::new();
        read_cache(sample(Game::Corruption), |id, _ar| {
            ids.push(id);
            Ok(())
        })
        .unwrap();
        assert_eq!(ids, [AssetId::new(0x10), AssetId::new(0x20)]);
    }

    #[test]
    fn header_layout() {
        let data = sample(Game::Prime);
        assert_eq!(&data[..4], b"CACH");
        assert_eq!(&data[8..12], b"MPRM");
        assert_eq!(&data[12..16], &2_u32.to_be_bytes());
        // first entry id is 32 bits wide for this game
        assert_eq!(&data[16..20], &0x10_u32.to_be_bytes());
    }

    #[test]
    fn bad_magic_is_rejected() {
        let err = read_cache(Bytes::from_static(b"NOPE\0\0\0\0"), |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, ArchiveError::BadMagic { .. }));
    }

    #[test]
    fn truncated_entry_is_an_error() {
        let data = sample(Game::Prime);
        let truncated = data.slice(..data.len() - 3);
        let err = read_cache(truncated, |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, ArchiveError::UnexpectedEof { .. }));
    }
}
