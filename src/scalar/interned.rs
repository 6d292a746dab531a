//! Static singletons for the concrete scalar terms (spec §3.4, §9
//! "Interning of static scalars").
//!
//! Grounded on `facet-core`'s const singleton shapes for primitive types:
//! rather than rebuilding the same `Term` node on every `Term::scalar`
//! call, each concrete kind gets one `Arc`-backed instance, built on first
//! use and reused for the life of the process.

use std::sync::LazyLock;

use crate::scalar::ScalarKind;
use crate::term::Term;

macro_rules! interned_scalar {
    ($name:ident, $kind:expr) => {
        static $name: LazyLock<Term> = LazyLock::new(|| Term::build_scalar($kind));
    };
}

interned_scalar!(BOOL, ScalarKind::Bool);
interned_scalar!(INT8, ScalarKind::Int8);
interned_scalar!(INT16, ScalarKind::Int16);
interned_scalar!(INT32, ScalarKind::Int32);
interned_scalar!(INT64, ScalarKind::Int64);
interned_scalar!(UINT8, ScalarKind::Uint8);
interned_scalar!(UINT16, ScalarKind::Uint16);
interned_scalar!(UINT32, ScalarKind::Uint32);
interned_scalar!(UINT64, ScalarKind::Uint64);
interned_scalar!(BFLOAT16, ScalarKind::BFloat16);
interned_scalar!(FLOAT16, ScalarKind::Float16);
interned_scalar!(FLOAT32, ScalarKind::Float32);
interned_scalar!(FLOAT64, ScalarKind::Float64);
interned_scalar!(BCOMPLEX32, ScalarKind::BComplex32);
interned_scalar!(COMPLEX32, ScalarKind::Complex32);
interned_scalar!(COMPLEX64, ScalarKind::Complex64);
interned_scalar!(COMPLEX128, ScalarKind::Complex128);

/// The interned singleton for `kind`, or `None` if `kind` is a kind
/// abstraction or `String` (dynamically sized, never a fixed-layout
/// singleton).
pub fn get(kind: ScalarKind) -> Option<&'static Term> {
    Some(match kind {
        ScalarKind::Bool => &*BOOL,
        ScalarKind::Int8 => &*INT8,
        ScalarKind::Int16 => &*INT16,
        ScalarKind::Int32 => &*INT32,
        ScalarKind::Int64 => &*INT64,
        ScalarKind::Uint8 => &*UINT8,
        ScalarKind::Uint16 => &*UINT16,
        ScalarKind::Uint32 => &*UINT32,
        ScalarKind::Uint64 => &*UINT64,
        ScalarKind::BFloat16 => &*BFLOAT16,
        ScalarKind::Float16 => &*FLOAT16,
        ScalarKind::Float32 => &*FLOAT32,
        ScalarKind::Float64 => &*FLOAT64,
        ScalarKind::BComplex32 => &*BCOMPLEX32,
        ScalarKind::Complex32 => &*COMPLEX32,
        ScalarKind::Complex64 => &*COMPLEX64,
        ScalarKind::Complex128 => &*COMPLEX128,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lookups_return_the_same_static() {
        let a = get(ScalarKind::Int64).unwrap();
        let b = get(ScalarKind::Int64).unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(Term::scalar(ScalarKind::Int64), Term::scalar(ScalarKind::Int64));
    }

    #[test]
    fn kind_abstractions_are_not_interned() {
        assert!(get(ScalarKind::AnyKind).is_none());
        assert!(get(ScalarKind::String).is_none());
    }
}
