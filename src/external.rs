//! Interfaces a host crate implements to connect this term algebra to a
//! concrete syntax, a pretty-printer, a buffer protocol, or a binary wire
//! format (spec §6). None of these are implemented here; the concrete
//! syntax parser, renderer, buffer-protocol codec and binary serializer
//! are explicitly out of scope. Only the seams they plug into are defined.

use crate::error::Result;
use crate::term::Term;

/// Parses a concrete-syntax string into a [`Term`]. A host crate (not this
/// one) owns the grammar and implements this trait.
pub trait TypeParser {
    /// Parse `input` into a term, or report a syntax/semantic error.
    fn parse(&self, input: &str) -> Result<Term>;
}

/// Renders a [`Term`] back to its concrete syntax. The inverse of
/// [`TypeParser`]; a host crate owns the actual formatting rules.
pub trait TypeRenderer {
    /// Render `term` as the host's concrete syntax.
    fn render(&self, term: &Term) -> Result<alloc::string::String>;
}

/// Describes a [`Term`]'s memory layout in a form a foreign buffer
/// protocol (e.g. the Python buffer protocol, Arrow's C data interface)
/// can consume. A host crate implements the actual struct/format-string
/// emission; this only names the seam.
pub trait BufferDescriptor {
    /// Byte layout descriptor type the host format expects.
    type Descriptor;

    /// Produce the descriptor for `term`, failing if `term` is abstract
    /// (no concrete layout to describe).
    fn describe(&self, term: &Term) -> Result<Self::Descriptor>;
}

/// Serializes a [`Term`] to and from a host-defined binary wire format.
/// This crate defines no wire format of its own; a host crate implements
/// both directions against whatever format it needs (its own bincode-style
/// encoding, an existing IDL, etc.).
pub trait TermCodec {
    /// Serialized representation produced by [`Self::encode`].
    type Encoded;

    /// Encode `term` into the host's wire format.
    fn encode(&self, term: &Term) -> Result<Self::Encoded>;

    /// Decode a previously encoded term back out.
    fn decode(&self, encoded: &Self::Encoded) -> Result<Term>;
}
