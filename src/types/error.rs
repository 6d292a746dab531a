//! Error taxonomy for the datashape engine.
//!
//! Grounded on `facet-core`'s `types::error` module: hand-rolled enums with
//! manual `Display`/`core::error::Error` impls rather than a derive-macro
//! crate like `thiserror` — the teacher itself has no such dependency, and
//! this crate is small enough that the savings wouldn't be worth a new one.

use alloc::string::String;

/// Every error the datashape engine can report.
///
/// Mirrors the taxonomy in spec §6.4/§7 one-for-one. There is no shared
/// "context" object the way the C original (`ndt_context_t`) has one: a
/// `Result<T, Error>` returned from every fallible call *is* the context,
/// and `?` propagates it without the caller needing to remember to check a
/// side channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Allocation failed. In practice unreachable in safe Rust (the global
    /// allocator aborts on OOM instead of returning a null you could
    /// recover from), but kept as a variant because term constructors are
    /// specified to be able to report it, and a custom allocator or arena
    /// could make it reachable again.
    Memory,
    /// Semantically invalid input: duplicate categorical entries, negative
    /// shape, arithmetic overflow, malformed offset table, pad mismatch.
    Value(String),
    /// Invariant violated between nested constructors (e.g. a fixed
    /// dimension wrapping a var dimension).
    Type(String),
    /// A logical index was out of bounds.
    Index {
        /// The index that was requested.
        index: i64,
        /// The valid length at the time of the request.
        len: i64,
    },
    /// Incompatible attribute combination (e.g. both `align` and `pack`).
    InvalidArgument(String),
    /// An otherwise-valid substitution/match branch this crate does not
    /// (yet) implement.
    NotImplemented(String),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Memory => write!(f, "allocation failed"),
            Error::Value(msg) => write!(f, "invalid value: {msg}"),
            Error::Type(msg) => write!(f, "type error: {msg}"),
            Error::Index { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::NotImplemented(msg) => write!(f, "not implemented: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    /// Shorthand for [`Error::Value`].
    pub fn value(msg: impl Into<String>) -> Self {
        Error::Value(msg.into())
    }

    /// Shorthand for [`Error::Type`].
    pub fn type_err(msg: impl Into<String>) -> Self {
        Error::Type(msg.into())
    }

    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Shorthand for [`Error::NotImplemented`].
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Error::NotImplemented(msg.into())
    }
}

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
