//! Contiguity checks and Fortran-order conversion over `FixedDim`/`VarDim`
//! chains (spec §4.2).

use alloc::vec::Vec;

use crate::error::Result;
use crate::layout::checked_mul_i64;
use crate::term::{Tag, Term};

/// Collect a term's leading `FixedDim` chain as `(shape, step)` pairs, in
/// outer-to-inner order, along with the non-dimension term the chain
/// bottoms out at.
fn fixed_chain(t: &Term) -> (Vec<(i64, i64)>, Term) {
    let mut dims = Vec::new();
    let mut cur = t.clone();
    while let Tag::FixedDim(p) = cur.tag() {
        dims.push((p.shape, p.step));
        cur = p.inner.clone();
    }
    (dims, cur)
}

/// `true` if every `FixedDim` in `t`'s chain uses the natural C
/// (row-major) stride: the innermost dimension steps by `1`, and each
/// dimension going outward steps by the product of the shapes inside it.
pub fn is_c_contiguous(t: &Term) -> bool {
    let (dims, leaf) = fixed_chain(t);
    if leaf.access().is_abstract() {
        return false;
    }
    let mut expected: i64 = 1;
    for (shape, step) in dims.iter().rev() {
        if *step != expected {
            return false;
        }
        expected = match expected.checked_mul(*shape) {
            Some(v) => v,
            None => return false,
        };
    }
    true
}

/// `true` if every `FixedDim` in `t`'s chain uses the natural Fortran
/// (column-major) stride: the outermost (leftmost) dimension steps by
/// `1`, and each dimension going inward steps by the product of the
/// shapes outside it.
pub fn is_f_contiguous(t: &Term) -> bool {
    let (dims, leaf) = fixed_chain(t);
    if leaf.access().is_abstract() {
        return false;
    }
    let mut expected: i64 = 1;
    for (shape, step) in dims.iter() {
        if *step != expected {
            return false;
        }
        expected = match expected.checked_mul(*shape) {
            Some(v) => v,
            None => return false,
        };
    }
    true
}

/// `true` if every `VarDim` in `t`'s chain has an offset table and has not
/// been reduced by a slice (spec §4.2 "a sliced var dimension is never
/// contiguous").
pub fn is_var_contiguous(t: &Term) -> bool {
    match t.tag() {
        Tag::VarDim(p) => p.offsets.is_some() && p.slices.is_empty() && is_var_contiguous(&p.inner),
        Tag::FixedDim(p) => is_var_contiguous(&p.inner),
        _ => t.access().is_concrete(),
    }
}

/// Rebuild `t`'s `FixedDim` chain with Fortran (column-major) strides,
/// keeping every shape the same (spec §4.2).
pub fn to_fortran(t: &Term) -> Result<Term> {
    let (dims, leaf) = fixed_chain(t);
    if dims.is_empty() {
        return Ok(t.clone());
    }
    let mut steps = Vec::with_capacity(dims.len());
    let mut acc: i64 = 1;
    for (shape, _) in &dims {
        steps.push(acc);
        acc = checked_mul_i64(acc, *shape)?;
    }
    let mut cur = leaf;
    for ((shape, _), step) in dims.iter().zip(steps.iter()).rev() {
        cur = Term::fixed_dim(*shape, Some(*step), cur)?;
    }
    Ok(cur)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;

    #[test]
    fn c_contiguous_chain() {
        let t = Term::fixed_dim(10, None, Term::fixed_dim(2, None, Term::scalar(ScalarKind::Int64)).unwrap()).unwrap();
        assert!(is_c_contiguous(&t));
        assert!(!is_f_contiguous(&t));
    }

    #[test]
    fn to_fortran_then_is_f_contiguous() {
        let t = Term::fixed_dim(10, None, Term::fixed_dim(2, None, Term::scalar(ScalarKind::Int64)).unwrap()).unwrap();
        let f = to_fortran(&t).unwrap();
        assert!(is_f_contiguous(&f));
        assert!(!is_c_contiguous(&f));
    }

    #[test]
    fn sliced_var_dim_is_not_contiguous() {
        use crate::offset_table::OffsetTable;
        use crate::term::SliceSpec;
        let offsets = OffsetTable::new(alloc::vec![0, 2]).unwrap();
        let plain = Term::var_dim(Some(offsets.clone()), Vec::new(), Term::scalar(ScalarKind::Float32)).unwrap();
        assert!(is_var_contiguous(&plain));

        let sliced = Term::var_dim(Some(offsets), alloc::vec![SliceSpec::FULL], Term::scalar(ScalarKind::Float32)).unwrap();
        assert!(!is_var_contiguous(&sliced));
    }
}
