use core::fmt;
use core::ptr::NonNull;

use log::debug;

use crate::backend::ArchiveBackend;
use crate::error::ArchiveResult;
use crate::flags::{ArchiveFlags, SerialHints};
use crate::param::Param;
use crate::param_stack::ParamStack;
use crate::primitive::PrimitiveMut;
use crate::serial::Serial;
use crate::version::{Game, SerialVersion};

/// The serialization engine: one traversal over one backend.
///
/// An archive owns its parameter stack and version context, and borrows the
/// backend for its whole lifetime. It never owns the objects it visits.
///
/// # Examples
///
/// ```
/// use vc_serial::binary::{BinaryReader, BinaryWriter};
/// use vc_serial::{Archive, Game};
///
/// let mut values = vec![1_u32, 2, 3];
///
/// let mut writer = BinaryWriter::new();
/// {
///     let mut ar = Archive::open_writer(&mut writer, 1, Game::Prime).unwrap();
///     ar.field("Values", &mut values).unwrap();
/// }
///
/// let mut reader = BinaryReader::new(writer.into_bytes());
/// let mut ar = Archive::open_reader(&mut reader).unwrap();
/// assert_eq!(ar.game(), Game::Prime);
///
/// let mut loaded: Vec<u32> = Vec::new();
/// ar.field("Values", &mut loaded).unwrap();
/// assert_eq!(loaded, values);
/// ```
pub struct Archive<'a> {
    backend: &'a mut dyn ArchiveBackend,
    flags: ArchiveFlags,
    version: SerialVersion,
    stack: ParamStack,
}

impl<'a> Archive<'a> {
    /// Wraps `backend` with the current version context.
    ///
    /// Nothing is serialized; call [`serialize_version`](Self::serialize_version)
    /// or [`set_version`](Self::set_version) before submitting fields.
    pub fn new(backend: &'a mut dyn ArchiveBackend) -> Self {
        Self::with_version(backend, SerialVersion::current())
    }

    /// Wraps `backend` with an explicit version context.
    pub fn with_version(backend: &'a mut dyn ArchiveBackend, version: SerialVersion) -> Self {
        let flags = backend.flags();
        debug_assert!(
            flags.contains(ArchiveFlags::READER) != flags.contains(ArchiveFlags::WRITER),
            "backend must be either a reader or a writer: {flags:?}",
        );
        backend.set_version(version);
        Self {
            backend,
            flags,
            version,
            stack: ParamStack::new(),
        }
    }

    /// Opens a top-level document for writing: records the current engine
    /// revision, `file_version` and `game` as the first fields.
    pub fn open_writer(
        backend: &'a mut dyn ArchiveBackend,
        file_version: u16,
        game: Game,
    ) -> ArchiveResult<Self> {
        let mut ar = Self::with_version(backend, SerialVersion::for_file(file_version, game));
        ar.serialize_version()?;
        debug!("opened archive writer ({})", ar.version);
        Ok(ar)
    }

    /// Opens a top-level document for reading and recovers its version context.
    pub fn open_reader(backend: &'a mut dyn ArchiveBackend) -> ArchiveResult<Self> {
        let mut ar = Self::new(backend);
        ar.serialize_version()?;
        debug!("opened archive reader ({})", ar.version);
        Ok(ar)
    }

    // -------------------------------------------------------------------------
    // Version

    /// Replaces the version context. Call before submitting any field.
    pub fn set_version(&mut self, version: SerialVersion) {
        self.version = version;
        self.backend.set_version(version);
    }

    /// Writes or reads the version context as three attributes of the
    /// current scope: `ArchiveVer`, `FileVer` and `Game`.
    ///
    /// Readers adopt what they read, and fail if the engine revision is newer
    /// than this engine.
    pub fn serialize_version(&mut self) -> ArchiveResult<()> {
        let mut version = self.version;

        self.param(Param::new("ArchiveVer", &mut version.archive).hints(SerialHints::ATTRIBUTE))?
            .param(
                Param::new("FileVer", &mut version.file)
                    .hints(SerialHints::ATTRIBUTE | SerialHints::OPTIONAL)
                    .with_default(0),
            )?
            .param(
                Param::new("Game", &mut version.game)
                    .hints(SerialHints::ATTRIBUTE | SerialHints::OPTIONAL)
                    .with_default(Game::Unknown),
            )?;

        if self.is_reader() {
            version.check_supported()?;
            self.set_version(version);
        }
        Ok(())
    }

    #[inline]
    pub fn version(&self) -> SerialVersion {
        self.version
    }

    #[inline]
    pub fn archive_version(&self) -> u16 {
        self.version.archive
    }

    #[inline]
    pub fn file_version(&self) -> u16 {
        self.version.file
    }

    #[inline]
    pub fn game(&self) -> Game {
        self.version.game
    }

    // -------------------------------------------------------------------------
    // Mode

    #[inline]
    pub fn flags(&self) -> ArchiveFlags {
        self.flags
    }

    #[inline]
    pub fn is_reader(&self) -> bool {
        self.flags.contains(ArchiveFlags::READER)
    }

    #[inline]
    pub fn is_writer(&self) -> bool {
        self.flags.contains(ArchiveFlags::WRITER)
    }

    #[inline]
    pub fn is_text_format(&self) -> bool {
        self.flags.contains(ArchiveFlags::TEXT)
    }

    #[inline]
    pub fn is_binary_format(&self) -> bool {
        self.flags.contains(ArchiveFlags::BINARY)
    }

    /// Forces every parameter to be emitted, whatever its hints.
    ///
    /// Backends that never skip keep doing so when this is turned off.
    pub fn set_no_skipping(&mut self, enabled: bool) {
        self.flags = self.backend.flags();
        if enabled {
            self.flags |= ArchiveFlags::NO_SKIPPING;
        }
    }

    // -------------------------------------------------------------------------
    // Parameters

    /// Whether `param` is emitted by a writer or looked up by a reader.
    pub fn should_serialize<T: Serial>(&self, param: &Param<'_, T>) -> bool {
        if self.flags.contains(ArchiveFlags::NO_SKIPPING) {
            return true;
        }

        if self.is_writer() {
            let hints = param.hints;
            if hints.contains(SerialHints::NEVER_SAVE) {
                return false;
            }
            if hints.contains(SerialHints::OPTIONAL)
                && !hints.contains(SerialHints::ALWAYS_SAVE)
                && param.matches_default()
            {
                return false;
            }
        }

        true
    }

    /// Submits one field.
    ///
    /// Skipped fields and fields a reader cannot find are set to the
    /// parameter's default, when it has one.
    #[inline]
    pub fn param<T: Serial>(&mut self, param: Param<'_, T>) -> ArchiveResult<&mut Self> {
        self.param_serialized(param)?;
        Ok(self)
    }

    /// Like [`param`](Self::param), but reports whether the field was
    /// written, or found by a reader.
    pub fn param_serialized<T: Serial>(&mut self, mut param: Param<'_, T>) -> ArchiveResult<bool> {
        if self.should_serialize(&param) && self.backend.param_begin(param.name, param.hints)? {
            self.stack.push(param.name, &mut *param.value, param.hints);
            let result = param
                .value
                .serial_body(self, param.hints)
                .map_err(|err| self.stack.annotate(err));
            self.stack.pop(&*param.value);

            result?;
            self.backend.param_end()?;
            return Ok(true);
        }

        if self.is_reader() {
            param.init_to_default();
        }
        Ok(false)
    }

    /// Shorthand for a parameter without hints or default.
    #[inline]
    pub fn field<T: Serial>(
        &mut self,
        name: &'static str,
        value: &mut T,
    ) -> ArchiveResult<&mut Self> {
        self.param(Param::new(name, value))
    }

    /// Opens a scope with no value of its own, e.g. a map entry.
    ///
    /// Call [`param_end`](Self::param_end) only if this returned `true`.
    #[inline]
    pub fn param_begin(&mut self, name: &'static str, hints: SerialHints) -> ArchiveResult<bool> {
        self.backend.param_begin(name, hints)
    }

    #[inline]
    pub fn param_end(&mut self) -> ArchiveResult<()> {
        self.backend.param_end()
    }

    // -------------------------------------------------------------------------
    // Backend hooks

    #[inline]
    pub fn pre_serialize_pointer(
        &mut self,
        present: bool,
        hints: SerialHints,
    ) -> ArchiveResult<bool> {
        self.backend.pre_serialize_pointer(present, hints)
    }

    #[inline]
    pub fn serialize_primitive(
        &mut self,
        value: PrimitiveMut<'_>,
        hints: SerialHints,
    ) -> ArchiveResult<()> {
        self.backend.serialize_primitive(value, hints)
    }

    /// Fails unless the current scope can supply `len` bulk bytes.
    ///
    /// Readers call this before allocating the buffer for a stored length.
    #[inline]
    pub fn check_bulk_len(&mut self, len: usize) -> ArchiveResult<()> {
        self.backend.check_bulk_len(len)
    }

    /// Transfers `data` as one contiguous block.
    #[inline]
    pub fn serialize_bulk(&mut self, data: &mut [u8]) -> ArchiveResult<()> {
        self.backend.serialize_bulk(data)
    }

    /// Writes or reads a container's element count.
    ///
    /// Stored as a `Size` attribute unless the backend overrides it.
    pub fn serialize_array_size(&mut self, size: &mut u32) -> ArchiveResult<()> {
        if !self.backend.serialize_array_size(size)? {
            self.param(Param::new("Size", size).hints(SerialHints::ATTRIBUTE))?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Ancestors

    /// Address of the nearest enclosing value of type `T`.
    ///
    /// The value currently being serialized is never returned, even if it is
    /// a `T`. Dereferencing the pointer is up to the caller: the ancestor is
    /// mutably borrowed by the traversal while this value is visited.
    #[inline]
    pub fn find_parent_object<T: 'static>(&self) -> Option<NonNull<T>> {
        self.stack.find_parent::<T>()
    }

    /// The values currently being traversed.
    #[inline]
    pub fn stack(&self) -> &ParamStack {
        &self.stack
    }
}

impl fmt::Debug for Archive<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archive")
            .field("flags", &self.flags)
            .field("version", &self.version)
            .field("stack", &self.stack)
            .finish_non_exhaustive()
    }
}
