//! Scalar dtype kinds (spec §3.2) and their static interning (spec §3.4,
//! §9 "Interning of static scalars").
//!
//! The enum shape is grounded on the teacher's `ScalarType` (`src/scalar.rs`
//! in `facet-core`) — a flat, exhaustively-documented enum of known
//! primitive kinds — generalized here to datashape's scalar set (signed/
//! unsigned widths, floats, complexes, kind abstractions) instead of
//! reflected Rust primitive types.

/// Process-wide singletons for the concrete scalar terms, built once behind
/// `std::sync::LazyLock` so repeated lookups of e.g. `int64` don't each
/// allocate a fresh node.
#[cfg(feature = "std")]
pub mod interned;

/// A concrete scalar dtype, or an abstract "kind" that matches a family of
/// concrete scalars (spec §3.2, used by the unifier's kind-widening rule
/// in §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ScalarKind {
    /// `bool`.
    Bool,
    /// Signed 8/16/32/64-bit integers.
    Int8,
    Int16,
    Int32,
    Int64,
    /// Unsigned 8/16/32/64-bit integers.
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    /// Half-precision brain float.
    BFloat16,
    /// IEEE-754 binary16/32/64.
    Float16,
    Float32,
    Float64,
    /// Complex numbers built from two `bfloat16` lanes.
    BComplex32,
    /// Complex numbers built from two float{16,32,64} lanes.
    Complex32,
    Complex64,
    Complex128,
    /// Variable-length UTF-8 string.
    String,

    // Kind abstractions — match any concrete scalar in the named family,
    // used as patterns (never appear as the dtype of a value-bearing term
    // produced by `substitute(.., require_concrete = true)`).
    /// Matches any scalar.
    AnyKind,
    /// Matches any numeric scalar (signed, unsigned, float, or complex).
    ScalarKind,
    /// Matches any signed integer.
    SignedKind,
    /// Matches any unsigned integer.
    UnsignedKind,
    /// Matches any floating-point scalar.
    FloatKind,
    /// Matches any complex scalar.
    ComplexKind,
}

impl ScalarKind {
    /// `true` for the abstract kind-matching variants (never a concrete
    /// layout).
    pub const fn is_kind(self) -> bool {
        matches!(
            self,
            ScalarKind::AnyKind
                | ScalarKind::ScalarKind
                | ScalarKind::SignedKind
                | ScalarKind::UnsignedKind
                | ScalarKind::FloatKind
                | ScalarKind::ComplexKind
        )
    }

    /// Byte size and alignment of a concrete scalar. Panics (a programmer
    /// error, not a user-facing one) if called on a kind abstraction —
    /// callers must check [`Self::is_kind`] first.
    pub const fn layout(self) -> (i64, i64) {
        match self {
            ScalarKind::Bool | ScalarKind::Int8 | ScalarKind::Uint8 => (1, 1),
            ScalarKind::Int16 | ScalarKind::Uint16 | ScalarKind::BFloat16 | ScalarKind::Float16 => {
                (2, 2)
            }
            ScalarKind::Int32 | ScalarKind::Uint32 | ScalarKind::Float32 => (4, 4),
            ScalarKind::Int64 | ScalarKind::Uint64 | ScalarKind::Float64 => (8, 8),
            ScalarKind::BComplex32 => (4, 2),
            ScalarKind::Complex32 => (4, 2),
            ScalarKind::Complex64 => (8, 4),
            ScalarKind::Complex128 => (16, 8),
            ScalarKind::String => (0, 1), // dynamically sized, abstract in practice
            _ => panic!("ScalarKind::layout called on a kind abstraction"),
        }
    }

    /// Signed-ness/float-ness family, used by the unifier's "same class,
    /// widen to larger width" rule (spec §4.5).
    pub const fn family(self) -> Option<ScalarFamily> {
        use ScalarFamily::*;
        Some(match self {
            ScalarKind::Int8 | ScalarKind::Int16 | ScalarKind::Int32 | ScalarKind::Int64 => Signed,
            ScalarKind::Uint8 | ScalarKind::Uint16 | ScalarKind::Uint32 | ScalarKind::Uint64 => {
                Unsigned
            }
            ScalarKind::BFloat16 | ScalarKind::Float16 | ScalarKind::Float32 | ScalarKind::Float64 => {
                Float
            }
            ScalarKind::BComplex32
            | ScalarKind::Complex32
            | ScalarKind::Complex64
            | ScalarKind::Complex128 => Complex,
            _ => return None,
        })
    }

    /// The family's member with a strictly larger width, for unification's
    /// "widen to the larger width" rule, or `None` if `self` is already the
    /// widest (or has no family).
    pub const fn widen_with(self, other: ScalarKind) -> Option<ScalarKind> {
        let (Some(fa), Some(fb)) = (self.family(), other.family()) else {
            return None;
        };
        if fa as u8 != fb as u8 {
            return None;
        }
        let (_, aw) = self.layout();
        let (_, bw) = other.layout();
        if aw >= bw { Some(self) } else { Some(other) }
    }
}

/// Signed/unsigned/float/complex family tag, used by [`ScalarKind::widen_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarFamily {
    Signed,
    Unsigned,
    Float,
    Complex,
}

/// A fixed-size encoded string: `FixedString(size, encoding)` (spec §3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedStringKind {
    /// Number of code units (not bytes) the string holds.
    pub size: i64,
    /// Text encoding of the fixed string.
    pub encoding: Encoding,
}

/// `FixedBytes(size, align)` (spec §3.2): an opaque fixed-size byte blob
/// with a caller-specified alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedBytesKind {
    /// Size in bytes.
    pub size: i64,
    /// Requested alignment (must be a power of two).
    pub align: i64,
}

/// `Char(encoding)` (spec §3.2): a single encoded character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharKind {
    /// Encoding of the character.
    pub encoding: Encoding,
}

/// `Bytes(target_align)` (spec §3.2): a dynamically-sized byte blob with a
/// target alignment hint for the buffer it will eventually back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BytesKind {
    /// Target alignment hint.
    pub target_align: i64,
}

/// Text encodings accepted by [`FixedStringKind`]/[`CharKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Ascii,
    Utf8,
    Utf16,
    Utf32,
}

impl Encoding {
    /// Bytes per code unit.
    pub const fn unit_size(self) -> i64 {
        match self {
            Encoding::Ascii => 1,
            Encoding::Utf8 => 1,
            Encoding::Utf16 => 2,
            Encoding::Utf32 => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_picks_larger_width() {
        assert_eq!(
            ScalarKind::Int8.widen_with(ScalarKind::Int32),
            Some(ScalarKind::Int32)
        );
        assert_eq!(
            ScalarKind::Float64.widen_with(ScalarKind::Float32),
            Some(ScalarKind::Float64)
        );
    }

    #[test]
    fn widen_rejects_mixed_family() {
        assert_eq!(ScalarKind::Int32.widen_with(ScalarKind::Uint32), None);
        assert_eq!(ScalarKind::Int32.widen_with(ScalarKind::Float32), None);
    }

    #[test]
    fn int64_layout_matches_spec_scenario() {
        assert_eq!(ScalarKind::Int64.layout(), (8, 8));
        assert_eq!(ScalarKind::Float64.layout(), (8, 8));
        assert_eq!(ScalarKind::Int32.layout(), (4, 4));
    }
}
