//! Copying terms (spec §4.7).
//!
//! `shallow_copy` is just `Term::clone`: bumping the `Arc` refcount is both
//! correct and the cheapest possible "copy", since terms are immutable.
//! `deep_copy` rebuilds every node instead, for callers that need a
//! genuinely independent tree (e.g. before mutating a host-side cache keyed
//! by node identity). The C original's `copy.c` had a use-after-free in its
//! `EllipsisDim` case from a name pointer copied as an alias rather than
//! owned; that class of bug cannot occur here; `Box<str>` is always owned,
//! so every recursive copy step below just clones it.

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::offset_table::OffsetTable;
use crate::term::{FieldLayoutRequest, Tag, Term};

/// A cheap, refcount-sharing copy.
pub fn shallow_copy(t: &Term) -> Term {
    t.clone()
}

/// Rebuild `t` node by node, so the result shares no `Arc` allocations
/// with the original (other than leaves reached through constructors that
/// themselves intern, e.g. nothing in this crate today, but kept for
/// parity with hosts that add interning later).
pub fn deep_copy(t: &Term) -> Result<Term> {
    match t.tag() {
        Tag::FixedDim(p) => Term::fixed_dim(p.shape, Some(p.step), deep_copy(&p.inner)?),
        Tag::VarDim(p) => Term::var_dim(p.offsets.clone(), p.slices.clone(), deep_copy(&p.inner)?),
        Tag::VarDimElem(p) => Term::var_dim_elem(p.index, deep_copy(&p.inner)?),
        Tag::SymbolicDim(p) => Term::symbolic_dim(p.name.clone(), deep_copy(&p.inner)?),
        Tag::EllipsisDim(p) => Term::ellipsis_dim(p.name.clone(), deep_copy(&p.inner)?),
        Tag::Array(p) => Term::array(deep_copy(&p.inner)?),
        Tag::Tuple(p) => {
            let fields = p
                .fields
                .iter()
                .map(|f| deep_copy(&f.ty))
                .collect::<Result<Vec<_>>>()?;
            let requests = alloc::vec![FieldLayoutRequest::default(); fields.len()];
            Term::tuple(fields, requests, None, p.variadic)
        }
        Tag::Record(p) => {
            let mut names = Vec::with_capacity(p.fields.len());
            let mut fields = Vec::with_capacity(p.fields.len());
            for f in &p.fields {
                names.push(f.name.clone());
                fields.push(deep_copy(&f.ty)?);
            }
            let requests = alloc::vec![FieldLayoutRequest::default(); fields.len()];
            Term::record(names, fields, requests, None, p.variadic)
        }
        Tag::Union(p) => {
            let members = p
                .members
                .iter()
                .map(deep_copy)
                .collect::<Result<Vec<_>>>()?;
            Term::union(p.tags.clone(), members)
        }
        Tag::Function(p) => {
            let inputs = p.inputs.iter().map(deep_copy).collect::<Result<Vec<_>>>()?;
            let outputs = p.outputs.iter().map(deep_copy).collect::<Result<Vec<_>>>()?;
            Term::function(inputs, outputs, p.elemwise)
        }
        Tag::Ref(p) => Ok(Term::ref_(deep_copy(&p.inner)?)),
        Tag::Constr(p) => Ok(Term::constr(p.name.clone(), deep_copy(&p.inner)?)),
        Tag::Nominal(p) => Ok(Term::nominal(p.name.clone(), deep_copy(&p.inner)?, p.methods.clone())),
        Tag::Module(p) => Term::module(p.name.clone(), deep_copy(&p.inner)?),
        Tag::Scalar(k) => Ok(Term::scalar(*k)),
        Tag::FixedString(k) => Term::fixed_string(*k),
        Tag::FixedBytes(k) => Term::fixed_bytes(*k),
        Tag::Char(k) => Ok(Term::char_scalar(*k)),
        Tag::Bytes(k) => Term::bytes(*k),
        Tag::Categorical(p) => Term::categorical(p.values.clone()),
        Tag::Typevar(p) => Ok(Term::typevar(p.name.clone())),
    }
}

/// Walk `t`'s existing ragged structure starting at `linear_index`,
/// re-deriving it as a fresh contiguous chain carrying `dtype` as its
/// leaf type (spec §4.7 "copying a ragged buffer into contiguous
/// storage"). A `VarDimElem` subindex fixes a single element (`shape = 1`)
/// and is collapsed away entirely: the rebuilt chain emits no `VarDim`
/// node for that depth.
pub fn copy_contiguous_dtype(t: &Term, dtype: &Term, linear_index: i64) -> Result<Term> {
    match t.tag() {
        Tag::FixedDim(_) => fixed_copy_contiguous(t, dtype),
        Tag::VarDim(_) | Tag::VarDimElem(_) => var_copy_contiguous(t, dtype, linear_index),
        _ => Ok(dtype.clone()),
    }
}

fn fixed_copy_contiguous(t: &Term, dtype: &Term) -> Result<Term> {
    match t.tag() {
        Tag::FixedDim(p) => {
            let inner = fixed_copy_contiguous(&p.inner, dtype)?;
            Term::fixed_dim(p.shape, None, inner)
        }
        _ => Ok(dtype.clone()),
    }
}

fn var_copy_contiguous(t: &Term, dtype: &Term, linear_index: i64) -> Result<Term> {
    let maxdim = t.ndim() as usize;
    let mut lengths: Vec<Vec<i64>> = alloc::vec![Vec::new(); maxdim + 1];
    let mut active = alloc::vec![false; maxdim + 1];
    collect_var_shapes(&mut lengths, &mut active, 1, linear_index, t)?;

    let mut cur = dtype.clone();
    for depth in (1..=maxdim).rev() {
        if !active[depth] {
            continue;
        }
        let offsets = OffsetTable::new(prefix_sums(&lengths[depth])?)?;
        cur = Term::var_dim(Some(offsets), Vec::new(), cur)?;
    }
    Ok(cur)
}

/// Recursively measure, at every depth of the var-dim chain starting at
/// `t`, the length of every list visited while walking from
/// `linear_index` (spec §4.7's two-pass `var_copy_shapes`/offset-table
/// build, collapsed here into a single accumulation pass since `Vec`
/// doesn't need a preallocated size up front).
fn collect_var_shapes(lengths: &mut [Vec<i64>], active: &mut [bool], depth: usize, linear_index: i64, t: &Term) -> Result<()> {
    if t.ndim() == 0 {
        return Ok(());
    }

    let (start, step, mut shape) = crate::varindex::var_indices(t, linear_index)?;
    let inner = crate::varindex::resolve_var_dim(t)
        .map(|(_, _, inner)| inner)
        .ok_or_else(|| Error::type_err("expected a concrete VarDim or VarDimElem in a var-dim chain"))?;

    active[depth] = true;
    let k = if let Tag::VarDimElem(p) = t.tag() {
        let idx = get_index(shape, p.index)?;
        shape = 1;
        active[depth] = false;
        idx
    } else {
        0
    };
    lengths[depth].push(shape);

    for i in k..crate::layout::checked_add_i64(k, shape)? {
        let offset = crate::layout::checked_mul_i64(i, step)?;
        let next = crate::layout::checked_add_i64(start, offset)?;
        collect_var_shapes(lengths, active, depth + 1, next, inner)?;
    }
    Ok(())
}

/// Resolve a (possibly negative) element index against `shape`, per
/// Python indexing rules.
fn get_index(shape: i64, index: i64) -> Result<i64> {
    let resolved = if index < 0 { index + shape } else { index };
    if resolved < 0 || resolved >= shape {
        return Err(Error::Index { index, len: shape });
    }
    Ok(resolved)
}

fn prefix_sums(lengths: &[i64]) -> Result<Vec<i32>> {
    let mut offsets = Vec::with_capacity(lengths.len() + 1);
    offsets.push(0i32);
    let mut acc: i64 = 0;
    for &len in lengths {
        if len < 0 {
            return Err(Error::value("list length must be non-negative"));
        }
        acc = crate::layout::checked_add_i64(acc, len)?;
        if acc > i32::MAX as i64 {
            return Err(Error::value("offset table exceeds i32 range"));
        }
        offsets.push(acc as i32);
    }
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;

    #[test]
    fn shallow_copy_shares_the_arc() {
        let t = Term::fixed_dim(3, None, Term::scalar(ScalarKind::Int32)).unwrap();
        let copy = shallow_copy(&t);
        assert_eq!(t, copy);
    }

    #[test]
    fn deep_copy_is_structurally_equal() {
        let t = Term::record(
            alloc::vec![alloc::boxed::Box::from("a")],
            alloc::vec![Term::scalar(ScalarKind::Int32)],
            alloc::vec![FieldLayoutRequest::default()],
            None,
            false,
        )
        .unwrap();
        assert_eq!(deep_copy(&t).unwrap(), t);
    }

    #[test]
    fn copy_contiguous_rebuilds_var_dim_chain_with_new_dtype() {
        // "var * var * float32" (spec §8 scenario 3): outer has one list
        // of length 2, inner lists have lengths 3 and 2.
        let outer = OffsetTable::new(alloc::vec![0, 2]).unwrap();
        let inner = OffsetTable::new(alloc::vec![0, 3, 5]).unwrap();
        let source = Term::var_dim(
            Some(outer),
            Vec::new(),
            Term::var_dim(Some(inner), Vec::new(), Term::scalar(ScalarKind::Float32)).unwrap(),
        )
        .unwrap();

        let new_dtype = Term::scalar(ScalarKind::Float64);
        let copy = copy_contiguous_dtype(&source, &new_dtype, 0).unwrap();
        assert_eq!(copy.access(), crate::access::Access::Concrete);

        let Tag::VarDim(outer_p) = copy.tag() else { panic!("expected VarDim") };
        assert_eq!(outer_p.offsets.as_ref().unwrap().as_slice(), &[0, 2]);
        let Tag::VarDim(inner_p) = outer_p.inner.tag() else { panic!("expected VarDim") };
        assert_eq!(inner_p.offsets.as_ref().unwrap().as_slice(), &[0, 3, 5]);
        assert_eq!(inner_p.inner, new_dtype);
    }

    #[test]
    fn copy_contiguous_collapses_var_dim_elem() {
        // "var * var * float32" with the outer row projected to index 0
        // (a VarDimElem): the outer depth collapses away entirely.
        let outer = OffsetTable::new(alloc::vec![0, 2]).unwrap();
        let inner = OffsetTable::new(alloc::vec![0, 3, 5]).unwrap();
        let var = Term::var_dim(
            Some(outer),
            Vec::new(),
            Term::var_dim(Some(inner), Vec::new(), Term::scalar(ScalarKind::Float32)).unwrap(),
        )
        .unwrap();
        let elem = Term::var_dim_elem(0, var).unwrap();

        let new_dtype = Term::scalar(ScalarKind::Float64);
        let copy = copy_contiguous_dtype(&elem, &new_dtype, 0).unwrap();
        let Tag::VarDim(p) = copy.tag() else { panic!("expected a single remaining VarDim level") };
        assert_eq!(p.offsets.as_ref().unwrap().as_slice(), &[0, 3]);
        assert_eq!(p.inner, new_dtype);
    }
}
