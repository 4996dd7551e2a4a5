use alloc::string::String;

use crate::asset::{AssetId, FourCC};

/// A mutable view of one leaf value handed to a backend.
///
/// Writers read through the reference, readers overwrite it.
#[derive(Debug)]
pub enum PrimitiveMut<'a> {
    Bool(&'a mut bool),
    I8(&'a mut i8),
    U8(&'a mut u8),
    I16(&'a mut i16),
    U16(&'a mut u16),
    I32(&'a mut i32),
    U32(&'a mut u32),
    I64(&'a mut i64),
    U64(&'a mut u64),
    F32(&'a mut f32),
    F64(&'a mut f64),
    String(&'a mut String),
    FourCC(&'a mut FourCC),
    AssetId(&'a mut AssetId),
}

impl PrimitiveMut<'_> {
    /// Short name of the leaf kind, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            PrimitiveMut::Bool(_) => "bool",
            PrimitiveMut::I8(_) => "i8",
            PrimitiveMut::U8(_) => "u8",
            PrimitiveMut::I16(_) => "i16",
            PrimitiveMut::U16(_) => "u16",
            PrimitiveMut::I32(_) => "i32",
            PrimitiveMut::U32(_) => "u32",
            PrimitiveMut::I64(_) => "i64",
            PrimitiveMut::U64(_) => "u64",
            PrimitiveMut::F32(_) => "f32",
            PrimitiveMut::F64(_) => "f64",
            PrimitiveMut::String(_) => "string",
            PrimitiveMut::FourCC(_) => "FourCC",
            PrimitiveMut::AssetId(_) => "asset id",
        }
    }
}
