use alloc::boxed::Box;
use alloc::string::{FromUtf8Error, String, ToString};

use thiserror::Error;

use crate::FourCC;

// -----------------------------------------------------------------------------
// Error

/// Structural and IO failures raised while opening or traversing an archive.
///
/// A failed traversal leaves the visited objects partially populated; callers
/// must discard them. Contract violations (unbalanced parameter stack,
/// duplicate map keys, discriminant mismatches...) are not reported here,
/// they panic.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("invalid magic: expected `{expected}`, found `{found}`")]
    BadMagic { expected: FourCC, found: FourCC },

    #[error("unsupported archive version {found}, newest supported is {supported}")]
    UnsupportedVersion { found: u16, supported: u16 },

    #[error("unknown game id `{0}`")]
    UnknownGame(FourCC),

    #[error("invalid {expected} value `{found}`")]
    InvalidValue { expected: &'static str, found: String },

    #[error("unknown discriminant {value} for `{ty}`")]
    UnknownDiscriminant { ty: &'static str, value: String },

    #[error("bulk data size mismatch: expected {expected} bytes, found {found}")]
    BulkSizeMismatch { expected: usize, found: usize },

    #[error("length {0} does not fit in 32 bits")]
    LengthOverflow(usize),

    #[error("invalid UTF-8 in string data")]
    InvalidUtf8(#[from] FromUtf8Error),

    #[error("malformed document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "xml")]
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[cfg(feature = "xml")]
    #[error("invalid hex data: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("{source} (at `{path}`)")]
    At {
        path: String,
        #[source]
        source: Box<ArchiveError>,
    },
}

/// Result alias used across the crate.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

impl ArchiveError {
    #[cold]
    pub(crate) fn invalid_value(expected: &'static str, found: impl ToString) -> Self {
        ArchiveError::InvalidValue {
            expected,
            found: found.to_string(),
        }
    }

    #[cold]
    pub(crate) fn eof(needed: usize, remaining: usize) -> Self {
        ArchiveError::UnexpectedEof { needed, remaining }
    }

    /// Returns the innermost error, looking through parameter path context.
    pub fn root_cause(&self) -> &ArchiveError {
        match self {
            ArchiveError::At { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Converts a collection length into the 32-bit count stored in archives.
#[inline]
pub(crate) fn len_u32(len: usize) -> ArchiveResult<u32> {
    u32::try_from(len).map_err(|_| ArchiveError::LengthOverflow(len))
}
