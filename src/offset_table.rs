//! Shared offset tables for `VarDim` (spec §3.3, §5 "Offset tables must
//! remain shareable independently of the parent term").

use crate::error::{Error, Result};
use alloc::sync::Arc;
use alloc::vec::Vec;

/// A ragged dimension's prefix-sum extents: `nitems + 1` non-decreasing
/// `i32` offsets, shared (refcounted) across every `VarDim` term built from
/// the same ragged data so reslicing is cheap (spec §3.3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OffsetTable(Arc<[i32]>);

impl OffsetTable {
    /// Build and validate an offset table. Per spec §3.1 it must have at
    /// least 2 entries and be non-decreasing (each list's extent,
    /// `offsets[i+1] - offsets[i]`, must be non-negative).
    pub fn new(offsets: Vec<i32>) -> Result<Self> {
        if offsets.len() < 2 {
            return Err(Error::value("offset table must have at least 2 entries"));
        }
        for w in offsets.windows(2) {
            if w[1] < w[0] {
                return Err(Error::value("offset table must be non-decreasing"));
            }
        }
        Ok(OffsetTable(Arc::from(offsets)))
    }

    /// Number of ragged lists this table describes (`len() - 1`).
    pub fn nitems(&self) -> usize {
        self.0.len() - 1
    }

    /// Raw offsets slice.
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// `(start, stop)` for list `i`, or an [`Error::Index`] if out of range.
    pub fn list_bounds(&self, i: i64) -> Result<(i64, i64)> {
        let n = self.nitems() as i64;
        if i < 0 || i >= n {
            return Err(Error::Index { index: i, len: n });
        }
        let idx = i as usize;
        Ok((self.0[idx] as i64, self.0[idx + 1] as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn rejects_short_tables() {
        assert!(OffsetTable::new(vec![0]).is_err());
    }

    #[test]
    fn rejects_decreasing_tables() {
        assert!(OffsetTable::new(vec![0, 3, 2]).is_err());
    }

    #[test]
    fn list_bounds_scenario_3() {
        // "var * var * float32" outer offsets [0, 2] -> 1 list of length 2.
        let outer = OffsetTable::new(vec![0, 2]).unwrap();
        assert_eq!(outer.nitems(), 1);
        assert_eq!(outer.list_bounds(0).unwrap(), (0, 2));
        assert!(outer.list_bounds(1).is_err());

        // inner offsets [0, 3, 5] -> 2 lists of lengths 3 and 2.
        let inner = OffsetTable::new(vec![0, 3, 5]).unwrap();
        assert_eq!(inner.nitems(), 2);
        assert_eq!(inner.list_bounds(0).unwrap(), (0, 3));
        assert_eq!(inner.list_bounds(1).unwrap(), (3, 5));
    }

    #[test]
    fn sharing_is_cheap_clone() {
        let t = OffsetTable::new(vec![0, 2, 5]).unwrap();
        let t2 = t.clone();
        assert_eq!(t, t2);
    }
}
