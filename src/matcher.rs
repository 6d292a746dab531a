//! Structural pattern matching against a (possibly polymorphic) datashape
//! pattern, producing the bindings it implies (spec §4.4).
//!
//! A mismatch is not an error: `match_type` returns `Ok(None)` for it and
//! reserves `Err` for malformed input (e.g. a pattern/candidate pair whose
//! shapes cannot even be compared). This mirrors the way
//! [`crate::unify::unify`] and [`crate::subst::substitute`] distinguish "no"
//! from "couldn't tell".

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::Result;
use crate::scalar::{ScalarFamily, ScalarKind};
use crate::symtable::{Binding, EllipsisCapture, SymbolTable};
use crate::term::dim::EllipsisDimPayload;
use crate::term::{Tag, Term};

/// Match `pattern` against `candidate`, returning the bindings the match
/// implies, or `None` if they do not structurally agree.
pub fn match_type(pattern: &Term, candidate: &Term) -> Result<Option<SymbolTable>> {
    match_with(pattern, candidate, SymbolTable::new())
}

fn match_with(pattern: &Term, candidate: &Term, st: SymbolTable) -> Result<Option<SymbolTable>> {
    match pattern.tag() {
        Tag::Typevar(tv) => bind_one(st, &tv.name, Binding::Type(candidate.clone())),

        Tag::EllipsisDim(e) => match_ellipsis(e, candidate, st),

        Tag::FixedDim(p) => match candidate.tag() {
            Tag::FixedDim(c) if p.shape == c.shape => match_with(&p.inner, &c.inner, st),
            _ => Ok(None),
        },

        Tag::SymbolicDim(p) => match candidate.tag() {
            Tag::FixedDim(c) => match bind_one(st, &p.name, Binding::Shape(c.shape))? {
                Some(st) => match_with(&p.inner, &c.inner, st),
                None => Ok(None),
            },
            _ => Ok(None),
        },

        Tag::VarDim(p) => match candidate.tag() {
            Tag::VarDim(c) => match_with(&p.inner, &c.inner, st),
            _ => Ok(None),
        },

        Tag::VarDimElem(p) => match candidate.tag() {
            Tag::VarDimElem(c) if p.index == c.index => match_with(&p.inner, &c.inner, st),
            _ => Ok(None),
        },

        Tag::Array(p) => match candidate.tag() {
            Tag::Array(c) => match_with(&p.inner, &c.inner, st),
            _ => Ok(None),
        },

        Tag::Scalar(kind) => match_scalar(*kind, candidate, st),

        Tag::FixedString(p) => match candidate.tag() {
            Tag::FixedString(c) if p == c => Ok(Some(st)),
            _ => Ok(None),
        },
        Tag::FixedBytes(p) => match candidate.tag() {
            Tag::FixedBytes(c) if p == c => Ok(Some(st)),
            _ => Ok(None),
        },
        Tag::Char(p) => match candidate.tag() {
            Tag::Char(c) if p == c => Ok(Some(st)),
            _ => Ok(None),
        },
        Tag::Bytes(p) => match candidate.tag() {
            Tag::Bytes(c) if p == c => Ok(Some(st)),
            _ => Ok(None),
        },

        Tag::Tuple(p) => match candidate.tag() {
            Tag::Tuple(c) => match_fields(p.fields.iter().map(|f| &f.ty), &c.fields, p.variadic, st),
            _ => Ok(None),
        },

        Tag::Record(p) => match candidate.tag() {
            Tag::Record(c) => {
                if !p.variadic && p.fields.len() != c.fields.len() {
                    return Ok(None);
                }
                if p.fields.len() > c.fields.len() {
                    return Ok(None);
                }
                let mut cur = st;
                for (pf, cf) in p.fields.iter().zip(c.fields.iter()) {
                    if pf.name != cf.name {
                        return Ok(None);
                    }
                    match match_with(&pf.ty, &cf.ty, cur)? {
                        Some(s) => cur = s,
                        None => return Ok(None),
                    }
                }
                Ok(Some(cur))
            }
            _ => Ok(None),
        },

        Tag::Union(p) => match candidate.tag() {
            Tag::Union(c) if p.tags == c.tags => {
                let mut cur = st;
                for (pm, cm) in p.members.iter().zip(c.members.iter()) {
                    match match_with(pm, cm, cur)? {
                        Some(s) => cur = s,
                        None => return Ok(None),
                    }
                }
                Ok(Some(cur))
            }
            _ => Ok(None),
        },

        Tag::Function(p) => match candidate.tag() {
            Tag::Function(c) if p.inputs.len() == c.inputs.len() && p.outputs.len() == c.outputs.len() => {
                let mut cur = st;
                for (pt, ct) in p.inputs.iter().chain(p.outputs.iter()).zip(c.inputs.iter().chain(c.outputs.iter())) {
                    match match_with(pt, ct, cur)? {
                        Some(s) => cur = s,
                        None => return Ok(None),
                    }
                }
                Ok(Some(cur))
            }
            _ => Ok(None),
        },

        Tag::Ref(p) => match candidate.tag() {
            Tag::Ref(c) => match_with(&p.inner, &c.inner, st),
            _ => Ok(None),
        },

        Tag::Constr(p) => match candidate.tag() {
            Tag::Constr(c) if p.name == c.name => match_with(&p.inner, &c.inner, st),
            _ => Ok(None),
        },

        Tag::Nominal(p) => match candidate.tag() {
            Tag::Nominal(c) if p.name == c.name => match_with(&p.inner, &c.inner, st),
            _ => Ok(None),
        },

        Tag::Module(p) => match candidate.tag() {
            Tag::Module(c) if p.name == c.name => match_with(&p.inner, &c.inner, st),
            _ => Ok(None),
        },

        Tag::Categorical(p) => match candidate.tag() {
            Tag::Categorical(c) if p.values == c.values => Ok(Some(st)),
            _ => Ok(None),
        },
    }
}

fn bind_one(mut st: SymbolTable, name: &str, binding: Binding) -> Result<Option<SymbolTable>> {
    Ok(if st.bind(name, binding) { Some(st) } else { None })
}

fn match_scalar(kind: ScalarKind, candidate: &Term, st: SymbolTable) -> Result<Option<SymbolTable>> {
    let Tag::Scalar(c) = candidate.tag() else {
        return Ok(None);
    };
    let ok = match kind {
        ScalarKind::AnyKind => true,
        ScalarKind::ScalarKind => !c.is_kind(),
        ScalarKind::SignedKind => c.family() == Some(ScalarFamily::Signed),
        ScalarKind::UnsignedKind => c.family() == Some(ScalarFamily::Unsigned),
        ScalarKind::FloatKind => c.family() == Some(ScalarFamily::Float),
        ScalarKind::ComplexKind => c.family() == Some(ScalarFamily::Complex),
        exact => exact == *c,
    };
    Ok(ok.then_some(st))
}

fn match_fields<'a>(
    pattern_fields: impl Iterator<Item = &'a Term>,
    candidate_fields: &[crate::term::composite::TupleField],
    variadic: bool,
    st: SymbolTable,
) -> Result<Option<SymbolTable>> {
    let pattern_fields: Vec<&Term> = pattern_fields.collect();
    if !variadic && pattern_fields.len() != candidate_fields.len() {
        return Ok(None);
    }
    if pattern_fields.len() > candidate_fields.len() {
        return Ok(None);
    }
    let mut cur = st;
    for (pt, cf) in pattern_fields.iter().zip(candidate_fields.iter()) {
        match match_with(pt, &cf.ty, cur)? {
            Some(s) => cur = s,
            None => return Ok(None),
        }
    }
    Ok(Some(cur))
}

/// Kind of dimension absorbed while matching an ellipsis, used only to
/// decide which [`EllipsisCapture`] variant to record.
fn match_ellipsis(e: &EllipsisDimPayload, candidate: &Term, st: SymbolTable) -> Result<Option<SymbolTable>> {
    let remaining_ndim = e.inner.ndim() as i32;
    let total_ndim = candidate.ndim() as i32;
    let absorb = total_ndim - remaining_ndim;
    if absorb < 0 {
        return Ok(None);
    }
    let absorb = absorb as usize;

    let mut cur = candidate.clone();
    let mut fixed_shapes = Vec::with_capacity(absorb);
    let mut uniform_kind: Option<u8> = None;
    let mut outer_var_dim: Option<Term> = None;
    for i in 0..absorb {
        if i == 0 && matches!(cur.tag(), Tag::VarDim(_)) {
            outer_var_dim = Some(cur.clone());
        }
        let (next, seen) = match cur.tag() {
            Tag::FixedDim(p) => {
                fixed_shapes.push(p.shape);
                (p.inner.clone(), 0u8)
            }
            Tag::VarDim(p) => (p.inner.clone(), 1u8),
            Tag::Array(p) => (p.inner.clone(), 2u8),
            Tag::SymbolicDim(p) => (p.inner.clone(), 3u8),
            _ => return Ok(None),
        };
        uniform_kind = Some(match uniform_kind {
            None => seen,
            Some(prev) if prev == seen => prev,
            Some(_) => u8::MAX,
        });
        cur = next;
    }

    let mut st = st;
    if let Some(name) = &e.name {
        let capture = match uniform_kind {
            Some(0) => EllipsisCapture::FixedSeq(fixed_shapes),
            Some(2) => EllipsisCapture::ArraySeq(absorb),
            _ => EllipsisCapture::VarSeq { dim: outer_var_dim, linear_index: 0, count: absorb },
        };
        match bind_one(st, name, Binding::Ellipsis(capture))? {
            Some(s) => st = s,
            None => return Ok(None),
        }
    }
    match_with(&e.inner, &cur, st)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offset_table::OffsetTable;

    #[test]
    fn scenario_4_binds_shape_variables() {
        // "N * M * float64" vs "3 * 4 * float64" (spec §8 scenario 4)
        let pattern = Term::symbolic_dim(
            "N",
            Term::symbolic_dim("M", Term::scalar(ScalarKind::Float64)).unwrap(),
        )
        .unwrap();
        let candidate = Term::fixed_dim(
            3,
            None,
            Term::fixed_dim(4, None, Term::scalar(ScalarKind::Float64)).unwrap(),
        )
        .unwrap();
        let st = match_type(&pattern, &candidate).unwrap().unwrap();
        assert_eq!(st.get("N"), Some(&Binding::Shape(3)));
        assert_eq!(st.get("M"), Some(&Binding::Shape(4)));
    }

    #[test]
    fn named_ellipsis_captures_fixed_prefix() {
        // "...batch * N * float64" vs "2 * 3 * 4 * float64" (spec §8 scenario 5)
        let pattern = Term::ellipsis_dim(
            Some("batch"),
            Term::symbolic_dim("N", Term::scalar(ScalarKind::Float64)).unwrap(),
        )
        .unwrap();
        let candidate = Term::fixed_dim(
            2,
            None,
            Term::fixed_dim(
                3,
                None,
                Term::fixed_dim(4, None, Term::scalar(ScalarKind::Float64)).unwrap(),
            )
            .unwrap(),
        )
        .unwrap();
        let st = match_type(&pattern, &candidate).unwrap().unwrap();
        assert_eq!(
            st.get("batch"),
            Some(&Binding::Ellipsis(EllipsisCapture::FixedSeq(alloc::vec![2, 3])))
        );
        assert_eq!(st.get("N"), Some(&Binding::Shape(4)));
    }

    #[test]
    fn mismatched_shape_fails() {
        let pattern = Term::fixed_dim(3, None, Term::scalar(ScalarKind::Int32)).unwrap();
        let candidate = Term::fixed_dim(4, None, Term::scalar(ScalarKind::Int32)).unwrap();
        assert!(match_type(&pattern, &candidate).unwrap().is_none());
    }

    #[test]
    fn kind_abstraction_matches_family() {
        let pattern = Term::scalar(ScalarKind::FloatKind);
        let candidate = Term::scalar(ScalarKind::Float32);
        assert!(match_type(&pattern, &candidate).unwrap().is_some());
        let wrong = Term::scalar(ScalarKind::Int32);
        assert!(match_type(&pattern, &wrong).unwrap().is_none());
    }

    #[test]
    fn var_dim_matches_var_dim_not_fixed() {
        let offsets = OffsetTable::new(alloc::vec![0, 2]).unwrap();
        let pattern = Term::var_dim(None, Vec::new(), Term::scalar(ScalarKind::Int32)).unwrap();
        let candidate = Term::var_dim(Some(offsets), Vec::new(), Term::scalar(ScalarKind::Int32)).unwrap();
        assert!(match_type(&pattern, &candidate).unwrap().is_some());

        let fixed_candidate = Term::fixed_dim(2, None, Term::scalar(ScalarKind::Int32)).unwrap();
        assert!(match_type(&pattern, &fixed_candidate).unwrap().is_none());
    }

    #[test]
    fn nominal_match_recurses_into_inner() {
        let pattern = Term::nominal("Point", Term::typevar("T"), Vec::new());
        let matching = Term::nominal("Point", Term::scalar(ScalarKind::Float64), Vec::new());
        let st = match_type(&pattern, &matching).unwrap().unwrap();
        assert_eq!(st.get("T"), Some(&Binding::Type(Term::scalar(ScalarKind::Float64))));

        let wrong_name = Term::nominal("Other", Term::scalar(ScalarKind::Float64), Vec::new());
        assert!(match_type(&pattern, &wrong_name).unwrap().is_none());
    }
}
