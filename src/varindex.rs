//! Resolving a `VarDim` row index, adjusted by its slice stack, to a
//! `(start, step, shape)` triple describing which elements of that row are
//! visible (spec §4.3).

use crate::error::{Error, Result};
use crate::offset_table::OffsetTable;
use crate::term::dim::SliceSpec;
use crate::term::{Tag, Term};

/// Walk `t` (a `VarDim`, possibly wrapped in one or more `VarDimElem`
/// projections) down to the `VarDim` carrying the actual offsets/slices, and
/// return those together with its element type.
pub(crate) fn resolve_var_dim(t: &Term) -> Option<(&OffsetTable, &[SliceSpec], &Term)> {
    match t.tag() {
        Tag::VarDim(p) => p.offsets.as_ref().map(|o| (o, p.slices.as_slice(), &p.inner)),
        Tag::VarDimElem(p) => resolve_var_dim(&p.inner),
        _ => None,
    }
}

/// For `t` (a concrete `VarDim` or `VarDimElem`) and raw row `index`,
/// compute `offsets[index]`/`offsets[index+1]` and then fold the slice
/// stack (applied top-to-bottom, with Python-slice clamp semantics) into a
/// `(start, step, shape)` triple describing the visible element range of
/// that row, per `ndt_var_indices`.
pub fn var_indices(t: &Term, index: i64) -> Result<(i64, i64, i64)> {
    let (offsets, slices, _inner) =
        resolve_var_dim(t).ok_or_else(|| Error::type_err("var_indices requires a concrete VarDim or VarDimElem"))?;
    let (list_start, list_stop) = offsets.list_bounds(index)?;

    let mut start: i64 = 0;
    let mut step: i64 = 1;
    let mut shape = list_stop - list_start;

    for spec in slices {
        let (adj_start, adj_shape) = slice_adjust_indices(shape, spec.start, spec.stop, spec.step)?;
        let scaled = crate::layout::checked_mul_i64(adj_start, step)?;
        start = crate::layout::checked_add_i64(start, scaled)?;
        step = crate::layout::checked_mul_i64(step, spec.step)?;
        shape = adj_shape;
    }

    start = crate::layout::checked_add_i64(start, list_start)?;
    Ok((start, step, shape))
}

/// Python `slice.indices()`-style clamp: given a sequence of `length` and a
/// `(start, stop, step)` possibly containing open ends, returns the clamped
/// start together with the number of elements the slice selects.
fn slice_adjust_indices(length: i64, start: Option<i64>, stop: Option<i64>, step: i64) -> Result<(i64, i64)> {
    if step == 0 {
        return Err(Error::value("slice step cannot be zero"));
    }

    let clamp = |v: i64| -> i64 {
        if v < 0 {
            let v = v + length;
            if v < 0 {
                if step < 0 {
                    -1
                } else {
                    0
                }
            } else {
                v
            }
        } else if v >= length {
            if step < 0 {
                length - 1
            } else {
                length
            }
        } else {
            v
        }
    };

    let start = match start {
        Some(s) => clamp(s),
        None => {
            if step < 0 {
                length - 1
            } else {
                0
            }
        }
    };
    let stop = match stop {
        Some(s) => clamp(s),
        None => {
            if step < 0 {
                -1
            } else {
                length
            }
        }
    };

    let shape = if step < 0 {
        if stop < start {
            (start - stop - 1) / (-step) + 1
        } else {
            0
        }
    } else if start < stop {
        (stop - start - 1) / step + 1
    } else {
        0
    };

    Ok((start, shape))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;
    use alloc::vec::Vec;

    #[test]
    fn unsliced_lookup_matches_offset_table() {
        let offsets = OffsetTable::new(alloc::vec![0, 3, 5]).unwrap();
        let t = Term::var_dim(Some(offsets), Vec::new(), Term::scalar(ScalarKind::Float32)).unwrap();
        assert_eq!(var_indices(&t, 0).unwrap(), (0, 1, 3));
        assert_eq!(var_indices(&t, 1).unwrap(), (3, 1, 2));
    }

    #[test]
    fn sliced_row_selects_inner_subrange() {
        // one row of 5 elements, sliced [1:4) -> 3 elements starting at 1
        let offsets = OffsetTable::new(alloc::vec![0, 5]).unwrap();
        let spec = SliceSpec { start: Some(1), stop: Some(4), step: 1 };
        let t = Term::var_dim(Some(offsets), alloc::vec![spec], Term::scalar(ScalarKind::Float32)).unwrap();
        assert_eq!(var_indices(&t, 0).unwrap(), (1, 1, 3));
    }

    #[test]
    fn reversed_slice_walks_row_backward() {
        // one row of 4 elements, reversed entirely
        let offsets = OffsetTable::new(alloc::vec![0, 4]).unwrap();
        let spec = SliceSpec { start: None, stop: None, step: -1 };
        let t = Term::var_dim(Some(offsets), alloc::vec![spec], Term::scalar(ScalarKind::Float32)).unwrap();
        assert_eq!(var_indices(&t, 0).unwrap(), (3, -1, 4));
    }

    #[test]
    fn second_row_offset_is_preserved_after_slicing() {
        // two rows (lengths 3 and 2); slice [1:] within each row.
        let offsets = OffsetTable::new(alloc::vec![0, 3, 5]).unwrap();
        let spec = SliceSpec { start: Some(1), stop: None, step: 1 };
        let t = Term::var_dim(Some(offsets), alloc::vec![spec], Term::scalar(ScalarKind::Float32)).unwrap();
        assert_eq!(var_indices(&t, 0).unwrap(), (1, 1, 2));
        assert_eq!(var_indices(&t, 1).unwrap(), (4, 1, 1));
    }
}
