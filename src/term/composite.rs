//! Composite constructor payloads and field-layout assembly (spec §3.2
//! composite constructors, §4.1 `init_concrete_fields`).

use crate::access::Access;
use crate::error::{Error, Result};
use crate::layout::round_up_i64;
use crate::term::Term;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

/// One positional field of a [`TuplePayload`], with its computed layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleField {
    pub ty: Term,
    /// Byte offset within the tuple (concrete tuples only; `0` otherwise).
    pub offset: i64,
    /// Alignment this field was placed at.
    pub align: i64,
    /// Padding bytes following this field, before the next field's offset.
    pub pad: i64,
}

/// `Tuple(field-types, ...)`: a positional heterogeneous record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TuplePayload {
    pub fields: Vec<TupleField>,
    /// If true, extra trailing fields of any type are accepted when this
    /// tuple is used as a match pattern.
    pub variadic: bool,
}

/// One named field of a [`RecordPayload`], with its computed layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordField {
    pub name: Box<str>,
    pub ty: Term,
    pub offset: i64,
    pub align: i64,
    pub pad: i64,
}

/// `Record(field-names, field-types, ...)`: a named heterogeneous record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordPayload {
    pub fields: Vec<RecordField>,
    pub variadic: bool,
}

/// Per-field layout request: an explicit override of alignment, packing, or
/// expected padding, as accepted by concrete-syntax attributes
/// `align=N`/`pack=N`/`pad=N` (spec §4.1, §6.1).
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldLayoutRequest {
    pub align: Option<i64>,
    pub pack: Option<i64>,
    pub pad: Option<i64>,
}

/// Shared offset/align/pad assembly for [`TuplePayload`]/[`RecordPayload`]
/// construction (spec §4.1 `init_concrete_fields`).
///
/// `field_types` and `requests` must be the same length. Returns the
/// computed `(offset, align, pad)` triples in field order, plus the tuple's
/// own final `(datasize, align)`. All fields must be concrete, or the whole
/// assembly is abstract (in which case offsets/pads/size are all `0` and
/// the caller should not report a concrete layout).
pub fn init_concrete_fields(
    field_types: &[Term],
    requests: &[FieldLayoutRequest],
    tuple_align_request: Option<i64>,
) -> Result<(Vec<(i64, i64, i64)>, i64, i64)> {
    assert_eq!(field_types.len(), requests.len());

    if field_types.iter().any(|t| t.access() == Access::Abstract) {
        let zeros = core::iter::repeat((0, 1, 0)).take(field_types.len()).collect();
        return Ok((zeros, 0, 1));
    }

    if requests
        .iter()
        .any(|r| r.align.is_some() && r.pack.is_some())
    {
        return Err(Error::invalid_argument(
            "a field cannot specify both `align` and `pack`",
        ));
    }

    let mut maxalign: i64 = tuple_align_request.unwrap_or(1);
    let mut running: i64 = 0;
    // (offset, align, datasize) per field, pads filled in below once every
    // offset (and the final rounded-up size) is known.
    let mut placed: Vec<(i64, i64, i64)> = Vec::with_capacity(field_types.len());

    for (ty, req) in field_types.iter().zip(requests.iter()) {
        let natural_align = ty.align().unwrap_or(1);
        let field_align = req.pack.or(req.align).unwrap_or(natural_align);
        if field_align <= 0 || !field_align.is_power_of_two() {
            return Err(Error::value("field alignment must be a positive power of two"));
        }
        maxalign = maxalign.max(field_align);

        let offset = round_up_i64(running, field_align)?;
        let datasize = ty.datasize().unwrap_or(0);
        running = offset
            .checked_add(datasize)
            .ok_or_else(|| Error::value("integer overflow computing field offset"))?;

        placed.push((offset, field_align, datasize));
    }

    let final_size = round_up_i64(running, maxalign)?;

    let mut out = Vec::with_capacity(placed.len());
    for (i, (offset, align, datasize)) in placed.iter().enumerate() {
        let end = offset + datasize;
        let next_offset = placed.get(i + 1).map(|(o, _, _)| *o).unwrap_or(final_size);
        let pad = next_offset - end;
        if pad < 0 {
            return Err(Error::value("computed negative padding"));
        }
        if let Some(explicit) = requests[i].pad {
            if explicit != pad {
                return Err(Error::value("declared pad does not match computed pad"));
            }
        }
        out.push((*offset, *align, pad));
    }

    Ok((out, final_size, maxalign))
}

/// `Union(tag-names, member-types)`: a tagged sum (spec §3.2). Layout is
/// `1 + max(member.datasize)`, alignment `1` (a leading tag byte).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionPayload {
    pub tags: Vec<Box<str>>,
    pub members: Vec<Term>,
}

/// `Function(arg-types, ...)`: a polymorphic function signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionPayload {
    pub inputs: Vec<Term>,
    pub outputs: Vec<Term>,
    /// `true` if this signature broadcasts over its ellipsis (applies
    /// elementwise to whatever leading dimensions the ellipsis captures).
    pub elemwise: bool,
}

/// `Ref(inner)`: pointer-typed; size is the host pointer size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefPayload {
    pub inner: Term,
}

/// `Constr(name, inner)`: a nominal wrapper with no registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstrPayload {
    pub name: Box<str>,
    pub inner: Term,
}

/// `Nominal(name, inner, methods)`: looked up from the global typedef
/// registry (spec §3.3, §3.4); `inner` must structurally match the
/// registered body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NominalPayload {
    pub name: Box<str>,
    pub inner: Term,
    pub methods: Vec<Box<str>>,
}

/// `Categorical(sorted unique values)` (spec §3.2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoricalPayload {
    pub values: Vec<String>,
}

impl CategoricalPayload {
    /// Build from raw values, validating sortedness/uniqueness is the
    /// caller's job via [`crate::term::Term::categorical`]; this just
    /// checks for duplicates (spec §8 "Categorical with duplicate entries
    /// -> ValueError").
    pub fn new(mut values: Vec<String>) -> Result<Self> {
        values.sort();
        for w in values.windows(2) {
            if w[0] == w[1] {
                return Err(Error::value("categorical values must be unique"));
            }
        }
        Ok(CategoricalPayload { values })
    }
}

/// `Typevar(name)`: a type variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypevarPayload {
    pub name: Box<str>,
}

/// `Module(name, inner)`: a top-level namespace. Cannot be nested (spec
/// §3.1 "Modules cannot nest"), enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModulePayload {
    pub name: Box<str>,
    pub inner: Term,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;
    use crate::term::Term;

    #[test]
    fn record_scenario_2() {
        // "{a: int32, b: float64}" -> offset=[0,8], align=[4,8], pad=[4,0],
        // datasize=16, align=8 (spec §8 scenario 2)
        let a = Term::scalar(ScalarKind::Int32);
        let b = Term::scalar(ScalarKind::Float64);
        let fields = [a, b];
        let requests = [FieldLayoutRequest::default(); 2];
        let (laid_out, size, align) = init_concrete_fields(&fields, &requests, None).unwrap();
        assert_eq!(laid_out[0], (0, 4, 4));
        assert_eq!(laid_out[1], (8, 8, 0));
        assert_eq!(size, 16);
        assert_eq!(align, 8);
    }

    #[test]
    fn pad_mismatch_is_value_error() {
        let a = Term::scalar(ScalarKind::Int32);
        let b = Term::scalar(ScalarKind::Float64);
        let fields = [a, b];
        let mut requests = [FieldLayoutRequest::default(); 2];
        requests[0].pad = Some(99);
        assert!(init_concrete_fields(&fields, &requests, None).is_err());
    }

    #[test]
    fn align_and_pack_conflict_is_invalid_argument() {
        let a = Term::scalar(ScalarKind::Int32);
        let fields = [a];
        let mut requests = [FieldLayoutRequest::default(); 1];
        requests[0].align = Some(4);
        requests[0].pack = Some(1);
        let err = init_concrete_fields(&fields, &requests, None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
