//! Dimension constructor payloads (spec §3.2 dimension constructors).

use crate::offset_table::OffsetTable;
use crate::term::Term;
use alloc::boxed::Box;
use alloc::vec::Vec;

/// `FixedDim(shape, step, ...)`: a statically known extent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedDimPayload {
    /// Number of elements, `>= 0`.
    pub shape: i64,
    /// Stride between elements, in units of the inner type's itemsize.
    pub step: i64,
    /// Element type.
    pub inner: Term,
}

/// One `(start, stop, step)` slice applied on top of a `VarDim`'s raw list
/// bounds (spec §4.3). `start`/`stop` use Python-slice clamp semantics and
/// may be `None` to mean "from/to the natural end".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceSpec {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: i64,
}

impl SliceSpec {
    /// The identity slice: the whole range, forward.
    pub const FULL: SliceSpec = SliceSpec {
        start: None,
        stop: None,
        step: 1,
    };
}

/// `VarDim(offsets, slices)`: a ragged dimension.
///
/// `offsets` is `None` for the abstract form (spec §3.2 "abstract form has
/// no offsets"); present and shared via [`OffsetTable`] for the concrete
/// form. `slices` is the stack of slices applied since the table was built
/// (top of stack = most recently applied), used by [`crate::varindex`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarDimPayload {
    pub offsets: Option<OffsetTable>,
    pub slices: Vec<SliceSpec>,
    pub inner: Term,
}

/// `VarDimElem(index)`: a `VarDim` projected to a single index; the
/// resulting term has `shape == 1` along this dimension (spec §3.2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarDimElemPayload {
    pub index: i64,
    /// The `VarDim` (or nested `VarDimElem`) being projected.
    pub inner: Term,
}

/// `SymbolicDim(name)`: shape parameterized by a named variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolicDimPayload {
    pub name: Box<str>,
    pub inner: Term,
}

/// `EllipsisDim(name?)`: absorbs zero or more leading dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EllipsisDimPayload {
    pub name: Option<Box<str>>,
    pub inner: Term,
}

/// `Array`: a flexible (runtime-sized), always pointer-bearing array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayPayload {
    pub inner: Term,
}
