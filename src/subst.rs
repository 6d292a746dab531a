//! Replaying a [`SymbolTable`]'s bindings back into a pattern term (spec
//! §4.6).
//!
//! This is the other half of matching: `match_type` discovers bindings,
//! `substitute` applies them to (typically) a different term that shares
//! the same variable names — e.g. a function's output type, once its
//! input type has been matched.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::symtable::{Binding, EllipsisCapture, SymbolTable};
use crate::term::{FieldLayoutRequest, Tag, Term};

/// Substitute every bound variable in `t` with its binding from `tbl`.
/// Unbound variables are left untouched. If `require_concrete` is set and
/// the result still contains an abstract subterm, returns
/// [`Error::Type`] (spec §4.6 "substitution used to finalize a type must
/// not leave any variable unresolved").
pub fn substitute(t: &Term, tbl: &SymbolTable, require_concrete: bool) -> Result<Term> {
    let result = subst_rec(t, tbl)?;
    if require_concrete && result.access().is_abstract() {
        return Err(Error::type_err("substitution left the result abstract"));
    }
    Ok(result)
}

fn subst_rec(t: &Term, tbl: &SymbolTable) -> Result<Term> {
    match t.tag() {
        Tag::Typevar(tv) => match tbl.get(&tv.name) {
            Some(Binding::Type(bound)) => Ok(bound.clone()),
            _ => Ok(t.clone()),
        },

        Tag::SymbolicDim(p) => {
            let inner = subst_rec(&p.inner, tbl)?;
            match tbl.get(&p.name) {
                Some(Binding::Shape(shape)) => Term::fixed_dim(*shape, None, inner),
                _ => Term::symbolic_dim(p.name.clone(), inner),
            }
        }

        Tag::EllipsisDim(p) => {
            let inner = subst_rec(&p.inner, tbl)?;
            match p.name.as_ref().and_then(|n| tbl.get(n)) {
                Some(Binding::Ellipsis(EllipsisCapture::FixedSeq(shapes))) => {
                    let mut cur = inner;
                    for shape in shapes.iter().rev() {
                        cur = Term::fixed_dim(*shape, None, cur)?;
                    }
                    Ok(cur)
                }
                Some(Binding::Ellipsis(EllipsisCapture::VarSeq { dim, linear_index, .. })) => match dim {
                    Some(dim) => crate::copy::copy_contiguous_dtype(dim, &inner, *linear_index),
                    None => Ok(inner),
                },
                Some(Binding::Ellipsis(EllipsisCapture::ArraySeq(n))) => {
                    let mut cur = inner;
                    for _ in 0..*n {
                        cur = Term::array(cur)?;
                    }
                    Ok(cur)
                }
                _ => Term::ellipsis_dim(p.name.clone(), inner),
            }
        }

        Tag::FixedDim(p) => {
            let inner = subst_rec(&p.inner, tbl)?;
            Term::fixed_dim(p.shape, Some(p.step), inner)
        }

        Tag::VarDim(p) => {
            let inner = subst_rec(&p.inner, tbl)?;
            Term::var_dim(p.offsets.clone(), p.slices.clone(), inner)
        }

        Tag::VarDimElem(p) => {
            let inner = subst_rec(&p.inner, tbl)?;
            Term::var_dim_elem(p.index, inner)
        }

        Tag::Array(p) => {
            let inner = subst_rec(&p.inner, tbl)?;
            Term::array(inner)
        }

        Tag::Tuple(p) => {
            let fields = p
                .fields
                .iter()
                .map(|f| subst_rec(&f.ty, tbl))
                .collect::<Result<Vec<_>>>()?;
            let requests = alloc::vec![FieldLayoutRequest::default(); fields.len()];
            Term::tuple(fields, requests, None, p.variadic)
        }

        Tag::Record(p) => {
            let mut names: Vec<Box<str>> = Vec::with_capacity(p.fields.len());
            let mut fields = Vec::with_capacity(p.fields.len());
            for f in &p.fields {
                names.push(f.name.clone());
                fields.push(subst_rec(&f.ty, tbl)?);
            }
            let requests = alloc::vec![FieldLayoutRequest::default(); fields.len()];
            Term::record(names, fields, requests, None, p.variadic)
        }

        Tag::Union(p) => {
            let members = p
                .members
                .iter()
                .map(|m| subst_rec(m, tbl))
                .collect::<Result<Vec<_>>>()?;
            Term::union(p.tags.clone(), members)
        }

        Tag::Function(p) => {
            let inputs = p
                .inputs
                .iter()
                .map(|i| subst_rec(i, tbl))
                .collect::<Result<Vec<_>>>()?;
            let outputs = p
                .outputs
                .iter()
                .map(|o| subst_rec(o, tbl))
                .collect::<Result<Vec<_>>>()?;
            Term::function(inputs, outputs, p.elemwise)
        }

        Tag::Ref(p) => Ok(Term::ref_(subst_rec(&p.inner, tbl)?)),

        Tag::Constr(p) => Ok(Term::constr(p.name.clone(), subst_rec(&p.inner, tbl)?)),

        Tag::Nominal(p) => Ok(Term::nominal(p.name.clone(), subst_rec(&p.inner, tbl)?, p.methods.clone())),

        Tag::Module(p) => Term::module(p.name.clone(), subst_rec(&p.inner, tbl)?),

        Tag::Scalar(_)
        | Tag::FixedString(_)
        | Tag::FixedBytes(_)
        | Tag::Char(_)
        | Tag::Bytes(_)
        | Tag::Categorical(_) => Ok(t.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;

    #[test]
    fn binds_symbolic_dim_to_fixed() {
        let pattern = Term::symbolic_dim("N", Term::scalar(ScalarKind::Float64)).unwrap();
        let mut tbl = SymbolTable::new();
        assert!(tbl.bind("N", Binding::Shape(7)));
        let result = substitute(&pattern, &tbl, true).unwrap();
        assert_eq!(result, Term::fixed_dim(7, None, Term::scalar(ScalarKind::Float64)).unwrap());
    }

    #[test]
    fn unbound_typevar_stays_abstract_and_require_concrete_fails() {
        let pattern = Term::typevar("T");
        let tbl = SymbolTable::new();
        assert!(substitute(&pattern, &tbl, true).is_err());
        assert_eq!(substitute(&pattern, &tbl, false).unwrap(), pattern);
    }

    #[test]
    fn ellipsis_expands_fixed_capture() {
        let pattern = Term::ellipsis_dim(Some("batch"), Term::scalar(ScalarKind::Int32)).unwrap();
        let mut tbl = SymbolTable::new();
        assert!(tbl.bind(
            "batch",
            Binding::Ellipsis(EllipsisCapture::FixedSeq(alloc::vec![2, 3]))
        ));
        let result = substitute(&pattern, &tbl, true).unwrap();
        let expected = Term::fixed_dim(2, None, Term::fixed_dim(3, None, Term::scalar(ScalarKind::Int32)).unwrap()).unwrap();
        assert_eq!(result, expected);
    }
}
