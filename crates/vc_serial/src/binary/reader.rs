use alloc::string::String;

use bytes::{Buf, Bytes};

use crate::asset::{AssetId, FourCC};
use crate::backend::ArchiveBackend;
use crate::error::{ArchiveError, ArchiveResult};
use crate::flags::{ArchiveFlags, SerialHints};
use crate::primitive::PrimitiveMut;
use crate::version::{ArchiveVersion, SerialVersion};

/// Binary backend consuming an in-memory buffer.
pub struct BinaryReader {
    buf: Bytes,
    version: SerialVersion,
}

impl BinaryReader {
    pub fn new(buf: Bytes) -> Self {
        Self {
            buf,
            version: SerialVersion::current(),
        }
    }

    /// Bytes not consumed yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// The unconsumed tail.
    #[inline]
    pub fn into_remaining(self) -> Bytes {
        self.buf
    }

    #[inline]
    fn need(&self, needed: usize) -> ArchiveResult<()> {
        if self.buf.remaining() < needed {
            return Err(ArchiveError::eof(needed, self.buf.remaining()));
        }
        Ok(())
    }
}

macro_rules! read_fixed {
    ($self:ident, $target:ident, $get:ident, $ty:ty) => {{
        $self.need(size_of::<$ty>())?;
        *$target = $self.buf.$get();
    }};
}

impl ArchiveBackend for BinaryReader {
    #[inline]
    fn flags(&self) -> ArchiveFlags {
        ArchiveFlags::READER | ArchiveFlags::BINARY | ArchiveFlags::NO_SKIPPING
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

    fn pre_serialize_pointer(
        &mut self,
        _present: bool,
        _hints: SerialHints,
    ) -> ArchiveResult<bool> {
        self.need(1)?;
        Ok(self.buf.get_u8() != 0)
    }

    fn serialize_primitive(
        &mut self,
        value: PrimitiveMut<'_>,
        _hints: SerialHints,
    ) -> ArchiveResult<()> {
        match value {
            PrimitiveMut::Bool(v) => {
                self.need(1)?;
                *v = self.buf.get_u8() != 0;
            }
            PrimitiveMut::I8(v) => read_fixed!(self, v, get_i8, i8),
            PrimitiveMut::U8(v) => read_fixed!(self, v, get_u8, u8),
            PrimitiveMut::I16(v) => read_fixed!(self, v, get_i16, i16),
            PrimitiveMut::U16(v) => read_fixed!(self, v, get_u16, u16),
            PrimitiveMut::I32(v) => read_fixed!(self, v, get_i32, i32),
            PrimitiveMut::U32(v) => read_fixed!(self, v, get_u32, u32),
            PrimitiveMut::I64(v) => read_fixed!(self, v, get_i64, i64),
            PrimitiveMut::U64(v) => read_fixed!(self, v, get_u64, u64),
            PrimitiveMut::F32(v) => read_fixed!(self, v, get_f32, f32),
            PrimitiveMut::F64(v) => read_fixed!(self, v, get_f64, f64),
            PrimitiveMut::String(v) => {
                self.need(4)?;
                let len = self.buf.get_u32() as usize;
                self.need(len)?;
                let bytes = self.buf.split_to(len);
                *v = String::from_utf8(bytes.to_vec())?;
            }
            PrimitiveMut::FourCC(v) => {
                self.need(4)?;
                *v = FourCC::from_u32(self.buf.get_u32());
            }
            PrimitiveMut::AssetId(v) => *v = AssetId::get(&mut self.buf, self.version.game)?,
        }
        Ok(())
    }

    #[inline]
    fn check_bulk_len(&mut self, len: usize) -> ArchiveResult<()> {
        self.need(len)
    }

    fn serialize_bulk(&mut self, data: &mut [u8]) -> ArchiveResult<()> {
        self.need(data.len())?;
        self.buf.copy_to_slice(data);
        Ok(())
    }

    fn serialize_array_size(&mut self, size: &mut u32) -> ArchiveResult<bool> {
        if self.version.is_before(ArchiveVersion::BinarySize32) {
            self.need(2)?;
            *size = u32::from(self.buf.get_u16());
        } else {
            self.need(4)?;
            *size = self.buf.get_u32();
        }
        Ok(true)
    }
}
