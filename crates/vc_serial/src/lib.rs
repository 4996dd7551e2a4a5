#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod archive;
mod asset;
mod backend;
mod containers;
mod enums;
mod error;
mod flags;
mod param;
mod param_stack;
mod pointer;
mod primitive;
mod serial;
mod version;

pub mod binary;
pub mod cache;
pub mod polymorphic;

#[cfg(feature = "xml")]
#[cfg_attr(docsrs, doc(cfg(feature = "xml")))]
pub mod xml;


// -----------------------------------------------------------------------------
// Exports

pub use archive::Archive;
pub use asset::{AssetId, FourCC};
pub use backend::ArchiveBackend;
pub use enums::{SerialEnum, serialize_enum};
pub use error::{ArchiveError, ArchiveResult};
pub use flags::{ArchiveFlags, SerialHints};
pub use param::{DefaultValue, Param};
pub use param_stack::{ParamStack, StackEntry};
pub use pointer::Pointee;
pub use polymorphic::{ArchiveConstructor, Polymorphic};
pub use primitive::PrimitiveMut;
pub use serial::{Serial, SerialCategory, Serialize};
pub use version::{ArchiveVersion, Game, SerialVersion};

#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::boxed::Box;
}
