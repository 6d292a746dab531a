#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

extern crate alloc;

// Homemade bitflags macro and the error taxonomy.
mod types;
pub use types::error;

/// Concrete-vs-abstract access classification.
pub mod access;
/// Per-term bit flags.
pub mod flags;
/// Size/alignment/stride arithmetic.
pub mod layout;
/// Shared offset tables backing ragged `VarDim`s.
pub mod offset_table;
/// Scalar dtype kinds.
pub mod scalar;

/// The term representation itself: `Term`, `Tag`, and their constructors.
pub mod term;

/// Bindings produced by matching and consumed by substitution.
pub mod symtable;
/// Structural pattern matching.
pub mod matcher;
/// Unification of two terms.
pub mod unify;
/// Replaying bindings back into a pattern.
pub mod subst;
/// Shallow/deep copy and ragged-to-contiguous conversion.
pub mod copy;
/// C/Fortran contiguity checks and conversion.
pub mod contiguity;
/// Ragged-row index resolution through a slice stack.
pub mod varindex;
/// Typechecking a call against a `Function` signature.
pub mod apply;

/// Interfaces a host crate implements (parsing, rendering, buffer
/// protocol, wire format); nothing in this module is implemented here.
pub mod external;

/// The process-wide nominal typedef registry.
#[cfg(feature = "std")]
pub mod registry;

pub use term::Term;
