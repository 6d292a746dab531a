//! The term algebra itself: [`Term`], a cheaply-cloned handle onto an
//! immutable, structurally-hashed node tree (spec §3, §4.1).
//!
//! Grounded on `facet-core`'s `Shape`: a small fixed header (layout, flags)
//! wrapping a payload that varies by kind. We replace its vtable-based
//! `Def`/type-erasure machinery (built for reflecting arbitrary foreign Rust
//! types) with a closed `Tag` enum, since every datashape term is one of a
//! fixed set of constructors.

pub mod composite;
pub mod dim;

use crate::access::Access;
use crate::error::{Error, Result};
use crate::flags::TypeFlags;
use crate::layout::ConcreteLayout;
use crate::scalar::{BytesKind, CharKind, FixedBytesKind, FixedStringKind, ScalarKind};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

pub use composite::{
    ConstrPayload, FieldLayoutRequest, FunctionPayload, ModulePayload, NominalPayload,
    RecordField, RecordPayload, RefPayload, TupleField, TuplePayload, TypevarPayload,
    UnionPayload, init_concrete_fields,
};
pub use dim::{
    ArrayPayload, EllipsisDimPayload, FixedDimPayload, SliceSpec, SymbolicDimPayload,
    VarDimElemPayload, VarDimPayload,
};
pub use composite::CategoricalPayload;

/// A dimension chain may nest at most this many levels deep.
pub const NDT_MAX_DIM: u8 = 16;

/// Every constructor a term can carry (spec §3.2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    FixedDim(FixedDimPayload),
    VarDim(VarDimPayload),
    VarDimElem(VarDimElemPayload),
    SymbolicDim(SymbolicDimPayload),
    EllipsisDim(EllipsisDimPayload),
    Array(ArrayPayload),
    Tuple(TuplePayload),
    Record(RecordPayload),
    Union(UnionPayload),
    Function(FunctionPayload),
    Ref(RefPayload),
    Constr(ConstrPayload),
    Nominal(NominalPayload),
    Categorical(CategoricalPayload),
    Typevar(TypevarPayload),
    Module(ModulePayload),
    Scalar(ScalarKind),
    FixedString(FixedStringKind),
    FixedBytes(FixedBytesKind),
    Char(CharKind),
    Bytes(BytesKind),
}

/// The boxed node a [`Term`] points to. Never mutated after construction;
/// every field is derived once, at construction time, from the node's
/// children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TermNode {
    tag: Tag,
    access: Access,
    flags: TypeFlags,
    ndim: u8,
    layout: Option<ConcreteLayout>,
}

/// A reference-counted, immutable datashape term (spec §3.4).
///
/// `Clone` is an `Arc` bump, not a deep copy. Two `Term`s compare and hash
/// equal exactly when their node trees are structurally identical — `Term`
/// derives `PartialEq`/`Eq`/`Hash` straight through the `Arc`, which Rust
/// forwards to `TermNode`'s own (value-based) impls rather than comparing
/// pointers (spec §4.8).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term(Arc<TermNode>);

impl Term {
    fn new(tag: Tag, access: Access, flags: TypeFlags, ndim: u8, layout: Option<ConcreteLayout>) -> Term {
        Term(Arc::new(TermNode {
            tag,
            access,
            flags,
            ndim,
            layout,
        }))
    }

    /// The constructor this term carries.
    pub fn tag(&self) -> &Tag {
        &self.0.tag
    }

    /// Whether this term's layout is fully determined.
    pub fn access(&self) -> Access {
        self.0.access
    }

    /// Structural property bits for this term and its subtree.
    pub fn flags(&self) -> TypeFlags {
        self.0.flags
    }

    /// Depth of the leading dimension chain (`0` for a non-dimension term).
    pub fn ndim(&self) -> u8 {
        self.0.ndim
    }

    /// Byte size, if [`Access::Concrete`].
    pub fn datasize(&self) -> Option<i64> {
        self.0.layout.map(|l| l.datasize)
    }

    /// Byte alignment, if [`Access::Concrete`].
    pub fn align(&self) -> Option<i64> {
        self.0.layout.map(|l| l.align)
    }

    /// The concrete layout, if any.
    pub fn layout(&self) -> Option<ConcreteLayout> {
        self.0.layout
    }

    fn ellipsis_in_chain(&self) -> bool {
        self.flags().contains(TypeFlags::ELLIPSIS_IN_SUBTREE)
    }

    fn dim_ndim(inner: &Term) -> Result<u8> {
        inner
            .ndim()
            .checked_add(1)
            .filter(|n| *n <= NDT_MAX_DIM)
            .ok_or_else(|| Error::value("dimension chain exceeds the maximum nesting depth"))
    }

    // ---- scalars ----------------------------------------------------

    /// A concrete scalar, or a kind abstraction used as a match pattern
    /// (spec §3.2). Never fails: every `ScalarKind` is a valid term.
    ///
    /// Concrete, non-kind scalars (`int64`, `float32`, and so on) are
    /// process-wide singletons under the `std` feature: this is an `Arc`
    /// clone of a lazily-built static, not a fresh allocation.
    #[cfg(feature = "std")]
    pub fn scalar(kind: ScalarKind) -> Term {
        match crate::scalar::interned::get(kind) {
            Some(t) => t.clone(),
            None => Term::build_scalar(kind),
        }
    }

    /// A concrete scalar, or a kind abstraction used as a match pattern
    /// (spec §3.2). Never fails: every `ScalarKind` is a valid term.
    #[cfg(not(feature = "std"))]
    pub fn scalar(kind: ScalarKind) -> Term {
        Term::build_scalar(kind)
    }

    pub(crate) fn build_scalar(kind: ScalarKind) -> Term {
        let access = if kind.is_kind() || matches!(kind, ScalarKind::String) {
            Access::Abstract
        } else {
            Access::Concrete
        };
        let layout = if access.is_concrete() {
            let (size, align) = kind.layout();
            Some(ConcreteLayout { datasize: size, align })
        } else {
            None
        };
        Term::new(Tag::Scalar(kind), access, TypeFlags::empty(), 0, layout)
    }

    /// `FixedString(size, encoding)`.
    pub fn fixed_string(kind: FixedStringKind) -> Result<Term> {
        if kind.size < 0 {
            return Err(Error::value("fixed string size must be non-negative"));
        }
        let unit = kind.encoding.unit_size();
        let datasize = crate::layout::checked_mul_i64(kind.size, unit)?;
        let layout = ConcreteLayout::new(datasize, unit.max(1))?;
        Term::sized_scalar(Tag::FixedString(kind), layout, TypeFlags::CONTAINS_CHAR)
    }

    /// `FixedBytes(size, align)`.
    pub fn fixed_bytes(kind: FixedBytesKind) -> Result<Term> {
        let layout = ConcreteLayout::new(kind.size, kind.align)?;
        Term::sized_scalar(Tag::FixedBytes(kind), layout, TypeFlags::empty())
    }

    /// `Char(encoding)`.
    pub fn char_scalar(kind: CharKind) -> Term {
        let unit = kind.encoding.unit_size();
        let layout = ConcreteLayout {
            datasize: unit,
            align: unit.max(1),
        };
        Term::new(
            Tag::Char(kind),
            Access::Concrete,
            TypeFlags::CONTAINS_CHAR,
            0,
            Some(layout),
        )
    }

    /// `Bytes(target_align)`: dynamically sized, always abstract.
    pub fn bytes(kind: BytesKind) -> Result<Term> {
        if kind.target_align <= 0 || !kind.target_align.is_power_of_two() {
            return Err(Error::value("bytes target alignment must be a positive power of two"));
        }
        Ok(Term::new(Tag::Bytes(kind), Access::Abstract, TypeFlags::empty(), 0, None))
    }

    fn sized_scalar(tag: Tag, layout: ConcreteLayout, flags: TypeFlags) -> Result<Term> {
        Ok(Term::new(tag, Access::Concrete, flags, 0, Some(layout)))
    }

    // ---- dimensions ---------------------------------------------------

    /// `FixedDim(shape, step, inner)`. `step` defaults to the inner type's
    /// natural (C-contiguous) stride when `None`.
    pub fn fixed_dim(shape: i64, step: Option<i64>, inner: Term) -> Result<Term> {
        if shape < 0 {
            return Err(Error::value("fixed dimension shape must be non-negative"));
        }
        if matches!(inner.tag(), Tag::VarDim(_) | Tag::VarDimElem(_) | Tag::Array(_)) {
            return Err(Error::type_err(
                "a fixed dimension cannot wrap a var dimension or a flexible array",
            ));
        }
        let ndim = Term::dim_ndim(&inner)?;
        let layout = match (inner.align(), inner.datasize()) {
            (Some(inner_align), Some(inner_datasize)) => {
                let itemsize = crate::layout::round_up_i64(inner_datasize, inner_align)?;
                let step = match step {
                    Some(s) => s,
                    None => crate::layout::natural_step(itemsize, inner_datasize, 1, shape)?,
                };
                let datasize = crate::layout::fixed_dim_datasize(shape, step, itemsize, inner_datasize)?;
                Some(ConcreteLayout::new(datasize, inner_align)?)
            }
            _ => {
                if step.is_none() {
                    return Err(Error::invalid_argument(
                        "an abstract fixed dimension needs an explicit step",
                    ));
                }
                None
            }
        };
        let flags = inner.flags();
        let access = if layout.is_some() { Access::Concrete } else { Access::Abstract };
        Ok(Term::new(
            Tag::FixedDim(FixedDimPayload {
                shape,
                step: step.unwrap_or(0),
                inner,
            }),
            access,
            flags,
            ndim,
            layout,
        ))
    }

    /// `VarDim(offsets, slices, inner)`.
    pub fn var_dim(offsets: Option<crate::offset_table::OffsetTable>, slices: Vec<SliceSpec>, inner: Term) -> Result<Term> {
        if matches!(inner.tag(), Tag::FixedDim(_) | Tag::SymbolicDim(_) | Tag::Array(_)) {
            return Err(Error::type_err(
                "a var dimension cannot wrap a fixed dimension, a symbolic dimension, or a flexible array",
            ));
        }
        let ndim = Term::dim_ndim(&inner)?;
        let access = if offsets.is_some() && inner.access().is_concrete() {
            Access::Concrete
        } else {
            Access::Abstract
        };
        let flags = inner.flags();
        Ok(Term::new(
            Tag::VarDim(VarDimPayload { offsets, slices, inner }),
            access,
            flags,
            ndim,
            None,
        ))
    }

    /// `VarDimElem(index, inner)`: projects a `VarDim` to a single row.
    pub fn var_dim_elem(index: i64, inner: Term) -> Result<Term> {
        if !matches!(inner.tag(), Tag::VarDim(_) | Tag::VarDimElem(_)) {
            return Err(Error::type_err("VarDimElem must wrap a VarDim"));
        }
        let ndim = inner.ndim();
        let access = inner.access();
        let flags = inner.flags();
        Ok(Term::new(
            Tag::VarDimElem(VarDimElemPayload { index, inner }),
            access,
            flags,
            ndim,
            None,
        ))
    }

    /// `SymbolicDim(name, inner)`: always abstract.
    pub fn symbolic_dim(name: impl Into<Box<str>>, inner: Term) -> Result<Term> {
        let ndim = Term::dim_ndim(&inner)?;
        let flags = inner.flags();
        Ok(Term::new(
            Tag::SymbolicDim(SymbolicDimPayload { name: name.into(), inner }),
            Access::Abstract,
            flags,
            ndim,
            None,
        ))
    }

    /// `EllipsisDim(name?, inner)`. At most one ellipsis may appear in a
    /// single dimension chain (spec §4.1).
    pub fn ellipsis_dim(name: Option<impl Into<Box<str>>>, inner: Term) -> Result<Term> {
        if inner.ellipsis_in_chain() {
            return Err(Error::type_err("a dimension chain may contain at most one ellipsis"));
        }
        let ndim = Term::dim_ndim(&inner)?;
        let flags = inner.flags().union(TypeFlags::ELLIPSIS_IN_SUBTREE);
        Ok(Term::new(
            Tag::EllipsisDim(EllipsisDimPayload {
                name: name.map(Into::into),
                inner,
            }),
            Access::Abstract,
            flags,
            ndim,
            None,
        ))
    }

    /// `Array(inner)`: a flexible, always pointer-bearing array. Cannot
    /// wrap a type that already contains a `Ref` (spec §4.1).
    pub fn array(inner: Term) -> Result<Term> {
        if inner.flags().contains(TypeFlags::CONTAINS_REFERENCE) {
            return Err(Error::type_err("an array cannot contain a reference type"));
        }
        let ndim = Term::dim_ndim(&inner)?;
        let flags = inner.flags().union(TypeFlags::CONTAINS_POINTER);
        Ok(Term::new(Tag::Array(ArrayPayload { inner }), Access::Abstract, flags, ndim, None))
    }

    // ---- composites -----------------------------------------------------

    /// `Tuple(field-types, ...)`.
    pub fn tuple(fields: Vec<Term>, requests: Vec<FieldLayoutRequest>, align_request: Option<i64>, variadic: bool) -> Result<Term> {
        let (placed, size, align) = init_concrete_fields(&fields, &requests, align_request)?;
        let all_concrete = fields.iter().all(|t| t.access().is_concrete());
        let flags = fields.iter().fold(TypeFlags::empty(), |f, t| f.union(t.flags()));
        let layout = all_concrete.then(|| ConcreteLayout { datasize: size, align });
        let built: Vec<TupleField> = fields
            .into_iter()
            .zip(placed)
            .map(|(ty, (offset, align, pad))| TupleField { ty, offset, align, pad })
            .collect();
        Ok(Term::new(
            Tag::Tuple(TuplePayload { fields: built, variadic }),
            if all_concrete { Access::Concrete } else { Access::Abstract },
            flags,
            0,
            layout,
        ))
    }

    /// `Record(field-names, field-types, ...)`.
    pub fn record(
        names: Vec<Box<str>>,
        fields: Vec<Term>,
        requests: Vec<FieldLayoutRequest>,
        align_request: Option<i64>,
        variadic: bool,
    ) -> Result<Term> {
        if names.len() != fields.len() {
            return Err(Error::invalid_argument("record field names/types length mismatch"));
        }
        let (placed, size, align) = init_concrete_fields(&fields, &requests, align_request)?;
        let all_concrete = fields.iter().all(|t| t.access().is_concrete());
        let flags = fields.iter().fold(TypeFlags::empty(), |f, t| f.union(t.flags()));
        let layout = all_concrete.then(|| ConcreteLayout { datasize: size, align });
        let built: Vec<RecordField> = names
            .into_iter()
            .zip(fields)
            .zip(placed)
            .map(|((name, ty), (offset, align, pad))| RecordField { name, ty, offset, align, pad })
            .collect();
        Ok(Term::new(
            Tag::Record(RecordPayload { fields: built, variadic }),
            if all_concrete { Access::Concrete } else { Access::Abstract },
            flags,
            0,
            layout,
        ))
    }

    /// `Union(tag-names, member-types)`.
    pub fn union(tags: Vec<Box<str>>, members: Vec<Term>) -> Result<Term> {
        if tags.len() != members.len() {
            return Err(Error::invalid_argument("union tags/members length mismatch"));
        }
        if tags.is_empty() || tags.len() > 255 {
            return Err(Error::value("a union must have between 1 and 255 members"));
        }
        if members.iter().any(|m| m.flags().contains(TypeFlags::CONTAINS_REFERENCE)) {
            return Err(Error::type_err("a union member cannot contain a reference type"));
        }
        let all_concrete = members.iter().all(|t| t.access().is_concrete());
        let flags = members.iter().fold(TypeFlags::empty(), |f, t| f.union(t.flags()));
        let layout = if all_concrete {
            let max_datasize = members.iter().filter_map(|m| m.datasize()).max().unwrap_or(0);
            let datasize = crate::layout::checked_add_i64(1, max_datasize)?;
            Some(ConcreteLayout::new(datasize, 1)?)
        } else {
            None
        };
        Ok(Term::new(
            Tag::Union(UnionPayload { tags, members }),
            if all_concrete { Access::Concrete } else { Access::Abstract },
            flags,
            0,
            layout,
        ))
    }

    /// `Function(inputs, outputs, elemwise)`. A function taking no
    /// arguments cannot bind type variables from anything, so its outputs
    /// must already be concrete (spec §4.1).
    pub fn function(inputs: Vec<Term>, outputs: Vec<Term>, elemwise: bool) -> Result<Term> {
        if inputs.is_empty() && outputs.iter().any(|o| o.access().is_abstract()) {
            return Err(Error::type_err("a zero-input function's outputs must be concrete"));
        }
        let flags = inputs
            .iter()
            .chain(outputs.iter())
            .fold(TypeFlags::empty(), |f, t| f.union(t.flags()));
        Ok(Term::new(
            Tag::Function(FunctionPayload { inputs, outputs, elemwise }),
            Access::Abstract,
            flags,
            0,
            None,
        ))
    }

    /// `Ref(inner)`: a host pointer. Always concrete, regardless of
    /// `inner`'s own access.
    pub fn ref_(inner: Term) -> Term {
        let flags = inner.flags().union(TypeFlags::CONTAINS_REFERENCE).union(TypeFlags::CONTAINS_POINTER);
        let layout = ConcreteLayout { datasize: 8, align: 8 };
        Term::new(Tag::Ref(RefPayload { inner }), Access::Concrete, flags, 0, Some(layout))
    }

    /// `Constr(name, inner)`: a transparent nominal wrapper.
    pub fn constr(name: impl Into<Box<str>>, inner: Term) -> Term {
        let access = inner.access();
        let flags = inner.flags();
        let layout = inner.layout();
        Term::new(Tag::Constr(ConstrPayload { name: name.into(), inner }), access, flags, 0, layout)
    }

    /// `Nominal(name, inner, methods)`. Registration with the process-wide
    /// typedef registry (spec §3.3/§3.4) happens separately, in
    /// [`crate::registry`]; this only builds the term.
    pub fn nominal(name: impl Into<Box<str>>, inner: Term, methods: Vec<Box<str>>) -> Term {
        let access = inner.access();
        let flags = inner.flags();
        let layout = inner.layout();
        Term::new(
            Tag::Nominal(NominalPayload { name: name.into(), inner, methods }),
            access,
            flags,
            0,
            layout,
        )
    }

    /// `Categorical(values)`. Stored as a 4-byte index into the sorted,
    /// deduplicated value table.
    pub fn categorical(values: Vec<String>) -> Result<Term> {
        let payload = CategoricalPayload::new(values)?;
        let layout = ConcreteLayout { datasize: 4, align: 4 };
        Ok(Term::new(Tag::Categorical(payload), Access::Concrete, TypeFlags::empty(), 0, Some(layout)))
    }

    /// `Typevar(name)`: always abstract.
    pub fn typevar(name: impl Into<Box<str>>) -> Term {
        Term::new(Tag::Typevar(TypevarPayload { name: name.into() }), Access::Abstract, TypeFlags::empty(), 0, None)
    }

    /// `Module(name, inner)`. Modules cannot nest (spec §3.1).
    pub fn module(name: impl Into<Box<str>>, inner: Term) -> Result<Term> {
        if matches!(inner.tag(), Tag::Module(_)) {
            return Err(Error::type_err("modules cannot nest"));
        }
        let access = inner.access();
        let flags = inner.flags();
        let layout = inner.layout();
        Ok(Term::new(Tag::Module(ModulePayload { name: name.into(), inner }), access, flags, 0, layout))
    }
}
