//! Bindings produced while matching a polymorphic pattern against a
//! candidate term (spec §4.4).

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::term::Term;

/// What a single ellipsis capture remembers about the dimensions it
/// absorbed (spec §4.4 "named ellipses capture their matched prefix").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EllipsisCapture {
    /// Captured leading dimensions were all `FixedDim`s with known shapes.
    FixedSeq(Vec<i64>),
    /// Captured leading dimensions were `VarDim`s; shapes are per-row and
    /// not known until a concrete instance is walked. `dim` is the
    /// outermost absorbed `VarDim` term (`None` if zero dimensions were
    /// absorbed); `linear_index` is where `copy_contiguous_dtype` should
    /// start walking it from when rebuilding a concrete substitution.
    VarSeq {
        /// The outermost absorbed `VarDim` term, if any were absorbed.
        dim: Option<Term>,
        /// Starting linear index into `dim`'s ragged rows.
        linear_index: i64,
        /// Number of dimensions absorbed.
        count: usize,
    },
    /// Captured leading dimensions were `Array`s (unknown count up front).
    ArraySeq(usize),
}

/// A single binding discovered during matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A `SymbolicDim` name bound to a concrete shape.
    Shape(i64),
    /// A `Typevar` name bound to a concrete (or still-abstract) term.
    Type(Term),
    /// A named ellipsis bound to what it captured.
    Ellipsis(EllipsisCapture),
}

/// The bindings accumulated for one successful match (spec §4.4).
///
/// Backed by a `BTreeMap` rather than a hash map: bindings are small in
/// number and deterministic iteration order makes golden-output tests and
/// debug printing reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    bindings: BTreeMap<Box<str>, Binding>,
}

impl SymbolTable {
    /// An empty table.
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Bind `name` to `value`. If `name` is already bound, the new binding
    /// must be consistent (`==`) with the existing one, matching spec
    /// §4.4's "repeated names must agree" rule; otherwise the caller should
    /// treat this as a match failure, not a panic, so we return whether the
    /// insertion was consistent.
    #[must_use]
    pub fn bind(&mut self, name: &str, value: Binding) -> bool {
        match self.bindings.get(name) {
            Some(existing) => *existing == value,
            None => {
                self.bindings.insert(name.into(), value);
                true
            }
        }
    }

    /// Look up a previously recorded binding.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Iterate over all bindings, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Merge `other` into `self`, failing if any shared name disagrees.
    #[must_use]
    pub fn merge(mut self, other: SymbolTable) -> Option<SymbolTable> {
        for (name, binding) in other.bindings {
            if !self.bind(&name, binding) {
                return None;
            }
        }
        Some(self)
    }
}
