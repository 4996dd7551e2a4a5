use crate::error::ArchiveResult;
use crate::flags::{ArchiveFlags, SerialHints};
use crate::primitive::PrimitiveMut;
use crate::version::SerialVersion;

/// The contract every concrete encoding implements.
///
/// An [`Archive`](crate::Archive) drives a backend through nested scopes: one
/// [`param_begin`](Self::param_begin)/[`param_end`](Self::param_end) pair per
/// emitted parameter, leaf values in between. Writers and readers see the same
/// call sequence for the same schema revision.
///
/// ## Hook Semantics
///
/// - **`param_begin`** returns `Ok(false)` when a reader cannot find the scope.
///   The archive then initializes the field to its default and does not call
///   `param_end`. Writers always return `Ok(true)`.
/// - **`pre_serialize_pointer`** returns whether a pointee is present. Writers
///   record `present`, readers report what the stream says.
/// - **`check_bulk_len`** lets readers reject a stored byte count they
///   cannot satisfy, so corrupt lengths fail instead of allocating.
/// - **`serialize_array_size`** returns `Ok(false)` to let the archive store
///   the count as a `Size` attribute, which is the default.
pub trait ArchiveBackend {
    /// Mode of this backend. Must not change over its lifetime.
    fn flags(&self) -> ArchiveFlags;

    /// Called whenever the archive's version context changes.
    #[inline]
    fn set_version(&mut self, _version: SerialVersion) {}

    /// Opens the scope of parameter `name`.
    fn param_begin(&mut self, name: &'static str, hints: SerialHints) -> ArchiveResult<bool>;

    /// Closes the scope opened by the matching successful `param_begin`.
    fn param_end(&mut self) -> ArchiveResult<()>;

    /// Records or reports whether the pointee of the current scope exists.
    fn pre_serialize_pointer(&mut self, present: bool, hints: SerialHints) -> ArchiveResult<bool>;

    /// Writes or reads one leaf value in the current scope.
    fn serialize_primitive(
        &mut self,
        value: PrimitiveMut<'_>,
        hints: SerialHints,
    ) -> ArchiveResult<()>;

    /// Writes or reads `data.len()` raw bytes in the current scope.
    fn serialize_bulk(&mut self, data: &mut [u8]) -> ArchiveResult<()>;

    /// Checks that a reader can supply `len` bulk bytes before the
    /// archive allocates them.
    #[inline]
    fn check_bulk_len(&mut self, _len: usize) -> ArchiveResult<()> {
        Ok(())
    }

    /// Backend-specific storage of a container's element count.
    #[inline]
    fn serialize_array_size(&mut self, _size: &mut u32) -> ArchiveResult<bool> {
        Ok(false)
    }
}
