//! Unification of two (possibly polymorphic) terms into their most
//! specific common term (spec §4.5).
//!
//! Unlike [`crate::matcher::match_type`], which checks a fixed pattern
//! against a candidate, `unify` treats both sides symmetrically: either may
//! contain type variables, and the result is the term that both could have
//! come from.

use alloc::vec::Vec;

use crate::error::Result;
use crate::scalar::ScalarKind;
use crate::term::{Tag, Term};

/// Unify `a` and `b`, returning their most specific common term, or `None`
/// if they are structurally incompatible.
pub fn unify(a: &Term, b: &Term) -> Result<Option<Term>> {
    if a == b {
        return Ok(Some(a.clone()));
    }

    match (a.tag(), b.tag()) {
        (Tag::Typevar(_), _) => Ok(Some(b.clone())),
        (_, Tag::Typevar(_)) => Ok(Some(a.clone())),

        (Tag::Scalar(ka), Tag::Scalar(kb)) => Ok(unify_scalar(*ka, *kb).map(Term::scalar)),

        (Tag::FixedDim(pa), Tag::FixedDim(pb)) if pa.shape == pb.shape => {
            match unify(&pa.inner, &pb.inner)? {
                Some(inner) => Ok(Some(Term::fixed_dim(pa.shape, Some(pa.step), inner)?)),
                None => Ok(None),
            }
        }

        (Tag::SymbolicDim(pa), Tag::FixedDim(pb)) => match unify(&pa.inner, &pb.inner)? {
            Some(inner) => Ok(Some(Term::fixed_dim(pb.shape, Some(pb.step), inner)?)),
            None => Ok(None),
        },
        (Tag::FixedDim(pa), Tag::SymbolicDim(pb)) => match unify(&pa.inner, &pb.inner)? {
            Some(inner) => Ok(Some(Term::fixed_dim(pa.shape, Some(pa.step), inner)?)),
            None => Ok(None),
        },
        (Tag::SymbolicDim(pa), Tag::SymbolicDim(pb)) if pa.name == pb.name => {
            match unify(&pa.inner, &pb.inner)? {
                Some(inner) => Term::symbolic_dim(pa.name.clone(), inner).map(Some),
                None => Ok(None),
            }
        }

        (Tag::VarDim(pa), Tag::VarDim(pb)) => match unify(&pa.inner, &pb.inner)? {
            Some(inner) => {
                let offsets = pa.offsets.clone().or_else(|| pb.offsets.clone());
                Ok(Some(Term::var_dim(offsets, Vec::new(), inner)?))
            }
            None => Ok(None),
        },

        (Tag::Array(pa), Tag::Array(pb)) => match unify(&pa.inner, &pb.inner)? {
            Some(inner) => Ok(Some(Term::array(inner)?)),
            None => Ok(None),
        },

        (Tag::Ref(pa), Tag::Ref(pb)) => match unify(&pa.inner, &pb.inner)? {
            Some(inner) => Ok(Some(Term::ref_(inner))),
            None => Ok(None),
        },

        (Tag::Constr(pa), Tag::Constr(pb)) if pa.name == pb.name => {
            match unify(&pa.inner, &pb.inner)? {
                Some(inner) => Ok(Some(Term::constr(pa.name.clone(), inner))),
                None => Ok(None),
            }
        }

        (Tag::Module(pa), Tag::Module(pb)) if pa.name == pb.name => {
            match unify(&pa.inner, &pb.inner)? {
                Some(inner) => Term::module(pa.name.clone(), inner).map(Some),
                None => Ok(None),
            }
        }

        (Tag::Tuple(pa), Tag::Tuple(pb)) if pa.fields.len() == pb.fields.len() => {
            let mut unified = Vec::with_capacity(pa.fields.len());
            for (fa, fb) in pa.fields.iter().zip(pb.fields.iter()) {
                match unify(&fa.ty, &fb.ty)? {
                    Some(t) => unified.push(t),
                    None => return Ok(None),
                }
            }
            let requests = alloc::vec![crate::term::FieldLayoutRequest::default(); unified.len()];
            Term::tuple(unified, requests, None, pa.variadic && pb.variadic).map(Some)
        }

        (Tag::Record(pa), Tag::Record(pb)) if pa.fields.len() == pb.fields.len() => {
            let mut names = Vec::with_capacity(pa.fields.len());
            let mut unified = Vec::with_capacity(pa.fields.len());
            for (fa, fb) in pa.fields.iter().zip(pb.fields.iter()) {
                if fa.name != fb.name {
                    return Ok(None);
                }
                match unify(&fa.ty, &fb.ty)? {
                    Some(t) => unified.push(t),
                    None => return Ok(None),
                }
                names.push(fa.name.clone());
            }
            let requests = alloc::vec![crate::term::FieldLayoutRequest::default(); unified.len()];
            Term::record(names, unified, requests, None, pa.variadic && pb.variadic).map(Some)
        }

        _ => Ok(None),
    }
}

fn unify_scalar(a: ScalarKind, b: ScalarKind) -> Option<ScalarKind> {
    if let Some(widened) = a.widen_with(b) {
        return Some(widened);
    }
    if a.is_kind() != b.is_kind() {
        let (kind, concrete) = if a.is_kind() { (a, b) } else { (b, a) };
        if kind_accepts(kind, concrete) {
            return Some(concrete);
        }
    }
    None
}

fn kind_accepts(kind: ScalarKind, concrete: ScalarKind) -> bool {
    match kind {
        ScalarKind::AnyKind => true,
        ScalarKind::ScalarKind => !concrete.is_kind(),
        ScalarKind::SignedKind => concrete.family() == Some(crate::scalar::ScalarFamily::Signed),
        ScalarKind::UnsignedKind => concrete.family() == Some(crate::scalar::ScalarFamily::Unsigned),
        ScalarKind::FloatKind => concrete.family() == Some(crate::scalar::ScalarFamily::Float),
        ScalarKind::ComplexKind => concrete.family() == Some(crate::scalar::ScalarFamily::Complex),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_scalars_unify_to_themselves() {
        let t = Term::scalar(ScalarKind::Int32);
        assert_eq!(unify(&t, &t).unwrap(), Some(t));
    }

    #[test]
    fn widening_picks_larger_width() {
        let a = Term::scalar(ScalarKind::Int8);
        let b = Term::scalar(ScalarKind::Int32);
        assert_eq!(unify(&a, &b).unwrap(), Some(Term::scalar(ScalarKind::Int32)));
    }

    #[test]
    fn kind_abstraction_unifies_to_concrete() {
        let a = Term::scalar(ScalarKind::FloatKind);
        let b = Term::scalar(ScalarKind::Float64);
        assert_eq!(unify(&a, &b).unwrap(), Some(Term::scalar(ScalarKind::Float64)));
    }

    #[test]
    fn mismatched_families_fail() {
        let a = Term::scalar(ScalarKind::Int32);
        let b = Term::scalar(ScalarKind::Float32);
        assert_eq!(unify(&a, &b).unwrap(), None);
    }

    #[test]
    fn fixed_dims_require_equal_shape() {
        let a = Term::fixed_dim(3, None, Term::scalar(ScalarKind::Int32)).unwrap();
        let b = Term::fixed_dim(4, None, Term::scalar(ScalarKind::Int32)).unwrap();
        assert_eq!(unify(&a, &b).unwrap(), None);
    }
}
