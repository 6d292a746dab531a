//! Concrete-vs-abstract access classification (spec §3.1, §3.4).

/// Whether a term has a fully determined memory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// No layout: shape/type variables remain, or the dimension is a
    /// ragged `var` dimension without a concrete offset table.
    Abstract,
    /// Size and alignment are known.
    Concrete,
}

impl Access {
    /// `true` for [`Access::Concrete`].
    #[inline]
    pub const fn is_concrete(self) -> bool {
        matches!(self, Access::Concrete)
    }

    /// `true` for [`Access::Abstract`].
    #[inline]
    pub const fn is_abstract(self) -> bool {
        matches!(self, Access::Abstract)
    }

    /// The access of a term built from two child accesses: concrete only if
    /// both children are concrete.
    #[inline]
    pub const fn meet(self, other: Access) -> Access {
        match (self, other) {
            (Access::Concrete, Access::Concrete) => Access::Concrete,
            _ => Access::Abstract,
        }
    }
}
