//! Interned symbol identities.

use std::fmt;

/// The canonical identity of an interned name.
///
/// Two symbols are equal exactly when they were interned from the same
/// (possibly truncated) name in the same [`SymbolTable`](crate::SymbolTable).
/// Comparing symbols is a `u32` comparison; no string is touched.
///
/// ```
/// use monad_mem::SymbolTable;
///
/// let mut table = SymbolTable::default();
/// let a = table.intern("car").unwrap();
/// let b = table.intern("car").unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a symbol from a raw table index.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw id as a table index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#sym{}", self.0)
    }
}
