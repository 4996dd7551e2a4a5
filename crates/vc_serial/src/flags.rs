use bitflags::bitflags;

bitflags! {
    /// Per-parameter hints that steer elision and backend layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SerialHints: u32 {
        /// Integers are written in hex by text backends.
        const HEX_DISPLAY   = 1 << 0;
        /// Not written when the value matches the parameter's default.
        const OPTIONAL      = 1 << 1;
        /// Never written. Readers still initialize it to its default.
        const NEVER_SAVE    = 1 << 2;
        /// Always written, overrides `OPTIONAL`.
        const ALWAYS_SAVE   = 1 << 3;
        /// Stored as an attribute of the enclosing scope. Attributes cannot have children.
        const ATTRIBUTE     = 1 << 4;
        /// Readers match the scope by position instead of by name.
        const IGNORE_NAME   = 1 << 5;
    }
}

bitflags! {
    /// Mode of an archive backend.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ArchiveFlags: u32 {
        const READER        = 1 << 0;
        const WRITER        = 1 << 1;
        const TEXT          = 1 << 2;
        const BINARY        = 1 << 3;
        /// Parameters are never skipped, whatever their hints.
        const NO_SKIPPING   = 1 << 4;
    }
}
