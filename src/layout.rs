//! Size/alignment/stride derivation for concrete types (spec §4.1, §9
//! "Overflow discipline").
//!
//! The scalar size/align pair reuses `core::alloc::Layout` directly —
//! exactly the way the teacher's `ShapeLayout::Sized(core::alloc::Layout)`
//! does for reflected Rust types (`types/shape/shape_layout.rs`). We extend
//! it with a per-dimension `step` (stride, in elements) and `itemsize`
//! that `Layout` has no room for, since a datashape dimension needs both.

use crate::error::{Error, Result};
use core::alloc::Layout;

/// Concrete byte layout of a term: size and alignment, both checked to be
/// consistent (`align` a power of two, `size` a multiple of `align` is
/// enforced by [`core::alloc::Layout`] itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConcreteLayout {
    /// Byte size. Zero for empty types (e.g. a `0 * int64` fixed dim).
    pub datasize: i64,
    /// Byte alignment, a power of two.
    pub align: i64,
}

impl ConcreteLayout {
    /// The trivial 1-byte-aligned, zero-size layout (e.g. `Tuple` with no
    /// fields, or the payload of `Bool` before rounding).
    pub const ZERO: ConcreteLayout = ConcreteLayout {
        datasize: 0,
        align: 1,
    };

    /// Build a layout directly from `size`/`align`, validating both.
    pub fn new(datasize: i64, align: i64) -> Result<Self> {
        if datasize < 0 {
            return Err(Error::value("datasize must be non-negative"));
        }
        if align <= 0 || !align.is_power_of_two() {
            return Err(Error::value("align must be a positive power of two"));
        }
        Ok(ConcreteLayout { datasize, align })
    }

    /// Build from a scalar Rust type, via `core::alloc::Layout::new::<T>()`.
    pub fn of<T>() -> Self {
        let layout = Layout::new::<T>();
        ConcreteLayout {
            datasize: layout.size() as i64,
            align: layout.align() as i64,
        }
    }

    /// Convert to `core::alloc::Layout`, for interop with allocator APIs.
    pub fn to_std_layout(self) -> Result<Layout> {
        Layout::from_size_align(self.datasize as usize, self.align as usize)
            .map_err(|_| Error::value("layout has invalid size/align combination"))
    }
}

/// Checked `a + b` on `i64`, reported as [`Error::Value`] on overflow.
#[inline]
pub fn checked_add_i64(a: i64, b: i64) -> Result<i64> {
    a.checked_add(b)
        .ok_or_else(|| Error::value("integer overflow in size/stride addition"))
}

/// Checked `a * b` on `i64`, reported as [`Error::Value`] on overflow.
#[inline]
pub fn checked_mul_i64(a: i64, b: i64) -> Result<i64> {
    a.checked_mul(b)
        .ok_or_else(|| Error::value("integer overflow in size/stride multiplication"))
}

/// Checked `(a - 1) * b`, the recurring "count minus one times stride" shape
/// used by [`fixed_dim_datasize`].
#[inline]
fn checked_sub1_mul_i64(a: i64, b: i64) -> Result<i64> {
    let a_minus_one = a
        .checked_sub(1)
        .ok_or_else(|| Error::value("integer underflow computing dimension extent"))?;
    checked_mul_i64(a_minus_one, b)
}

/// Round `value` up to the next multiple of `align` (`align` must be a
/// power of two). Used by [`crate::composite::init_concrete_fields`] for
/// per-field offsets and the final padded size.
#[inline]
pub fn round_up_i64(value: i64, align: i64) -> Result<i64> {
    debug_assert!(align > 0 && align.is_power_of_two());
    let mask = align - 1;
    let biased = checked_add_i64(value, mask)?;
    Ok(biased & !mask)
}

/// Derive a `FixedDim`'s `datasize` from its shape, signed `step` (in
/// elements of the inner type) and the inner layout's `itemsize` (spec
/// §4.1 "FixedDim stride derivation").
///
/// `datasize = (shape - 1) * |step| * itemsize + inner.datasize`, with
/// `shape == 0` giving a `datasize` of `0` regardless of `step`.
pub fn fixed_dim_datasize(shape: i64, step: i64, itemsize: i64, inner_datasize: i64) -> Result<i64> {
    if shape == 0 {
        return Ok(0);
    }
    let extent = checked_sub1_mul_i64(shape, step.unsigned_abs() as i64)?;
    let extent_bytes = checked_mul_i64(extent, itemsize)?;
    checked_add_i64(extent_bytes, inner_datasize)
}

/// Derive the natural (C-contiguous) step of a `FixedDim` wrapping an inner
/// type of the given itemsize/datasize, when no explicit step was supplied
/// (spec §4.1): `shape * step_of_inner` if the inner `itemsize == 0`
/// (inner type is zero-sized, e.g. a nested empty tuple), else
/// `inner.datasize / inner.itemsize`.
pub fn natural_step(inner_itemsize: i64, inner_datasize: i64, inner_step_if_zero_itemsize: i64, shape: i64) -> Result<i64> {
    if inner_itemsize == 0 {
        checked_mul_i64(shape, inner_step_if_zero_itemsize)
    } else {
        Ok(inner_datasize / inner_itemsize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_up_basic() {
        assert_eq!(round_up_i64(0, 8).unwrap(), 0);
        assert_eq!(round_up_i64(1, 8).unwrap(), 8);
        assert_eq!(round_up_i64(8, 8).unwrap(), 8);
        assert_eq!(round_up_i64(9, 8).unwrap(), 16);
        assert_eq!(round_up_i64(4, 8).unwrap(), 8);
    }

    #[test]
    fn fixed_dim_datasize_scalar_chain() {
        // "10 * 2 * int64" -> datasize 160, align 8 (spec §8 scenario 1)
        let int64_size = 8;
        let inner = fixed_dim_datasize(2, 1, int64_size, int64_size).unwrap();
        assert_eq!(inner, 16);
        let outer = fixed_dim_datasize(10, 2, int64_size, inner).unwrap();
        assert_eq!(outer, 160);
    }

    #[test]
    fn overflow_reported_as_value_error() {
        let err = checked_mul_i64(i64::MAX, 2).unwrap_err();
        assert!(matches!(err, Error::Value(_)));
    }

    #[test]
    fn zero_shape_has_zero_datasize() {
        assert_eq!(fixed_dim_datasize(0, 1, 8, 8).unwrap(), 0);
    }
}
