use bytes::{BufMut, Bytes, BytesMut};

use crate::backend::ArchiveBackend;
use crate::error::{ArchiveError, ArchiveResult, len_u32};
use crate::flags::{ArchiveFlags, SerialHints};
use crate::primitive::PrimitiveMut;
use crate::version::{ArchiveVersion, SerialVersion};

/// Binary backend appending to an in-memory buffer.
pub struct BinaryWriter {
    buf: BytesMut,
    version: SerialVersion,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            version: SerialVersion::current(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBackend for BinaryWriter {
    #[inline]
    fn flags(&self) -> ArchiveFlags {
        ArchiveFlags::WRITER | ArchiveFlags::BINARY | ArchiveFlags::NO_SKIPPING
    }

    #[inline]
    fn set_version(&mut self, version: SerialVersion) {
        self.version = version;
    }

    #[inline]
    fn param_begin(&mut self, _name: &'static str, _hints: SerialHints) -> ArchiveResult<bool> {
        Ok(true)
    }

    #[inline]
    fn param_end(&mut self) -> ArchiveResult<()> {
        Ok(())
    }

    fn pre_serialize_pointer(&mut self, present: bool, _hints: SerialHints) -> ArchiveResult<bool> {
        self.buf.put_u8(u8::from(present));
        Ok(present)
    }

    fn serialize_primitive(
        &mut self,
        value: PrimitiveMut<'_>,
        _hints: SerialHints,
    ) -> ArchiveResult<()> {
        let buf = &mut self.buf;
        match value {
            PrimitiveMut::Bool(v) => buf.put_u8(u8::from(*v)),
            PrimitiveMut::I8(v) => buf.put_i8(*v),
            PrimitiveMut::U8(v) => buf.put_u8(*v),
            PrimitiveMut::I16(v) => buf.put_i16(*v),
            PrimitiveMut::U16(v) => buf.put_u16(*v),
            PrimitiveMut::I32(v) => buf.put_i32(*v),
            PrimitiveMut::U32(v) => buf.put_u32(*v),
            PrimitiveMut::I64(v) => buf.put_i64(*v),
            PrimitiveMut::U64(v) => buf.put_u64(*v),
            PrimitiveMut::F32(v) => buf.put_f32(*v),
            PrimitiveMut::F64(v) => buf.put_f64(*v),
            PrimitiveMut::String(v) => {
                buf.put_u32(len_u32(v.len())?);
                buf.put_slice(v.as_bytes());
            }
            PrimitiveMut::FourCC(v) => buf.put_slice(v.as_bytes()),
            PrimitiveMut::AssetId(v) => v.put(buf, self.version.game)?,
        }
        Ok(())
    }

    #[inline]
    fn serialize_bulk(&mut self, data: &mut [u8]) -> ArchiveResult<()> {
        self.buf.put_slice(data);
        Ok(())
    }

    fn serialize_array_size(&mut self, size: &mut u32) -> ArchiveResult<bool> {
        if self.version.is_before(ArchiveVersion::BinarySize32) {
            let short =
                u16::try_from(*size).map_err(|_| ArchiveError::LengthOverflow(*size as usize))?;
            self.buf.put_u16(short);
        } else {
            self.buf.put_u32(*size);
        }
        Ok(true)
    }
}
