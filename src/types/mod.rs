//! Small shared building blocks used throughout the term algebra.

// Homemade bitflags (kept from the teacher almost verbatim; see TypeFlags in
// `crate::flags`).
mod bitflags;

// Error types
pub mod error;
