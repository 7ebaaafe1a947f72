//! Fixed-capacity symbol table.
//!
//! The table assigns each distinct name a [`Symbol`] in first-seen order and
//! hands the same symbol back for every later request with that name. It
//! never forgets a name until [`SymbolTable::clear`].
//!
//! # Design
//!
//! - All name bytes live in one `String` buffer; each entry is a
//!   `(start, len)` range into it, so interning never allocates per name.
//! - Names longer than `max_len` characters are **truncated** to their first
//!   `max_len` characters before lookup. Two long names sharing that prefix
//!   therefore intern to the same symbol.
//! - Lookup is a linear scan over the entries. With the `hashed-lookup`
//!   feature a hashbrown index is kept alongside; ids are identical either way.
//!
//! # Examples
//!
//! ```
//! use monad_mem::SymbolTable;
//!
//! let mut table = SymbolTable::new(2, 64);
//! let x = table.intern("x").unwrap();
//! let y = table.intern("y").unwrap();
//!
//! assert_ne!(x, y);
//! assert_eq!(table.intern("x"), Ok(x));
//! assert!(table.intern("z").is_err());
//! assert_eq!(table.resolve(y), Some("y"));
//! ```

use crate::symbol::Symbol;
use std::fmt;

#[cfg(feature = "hashed-lookup")]
use hashbrown::HashMap;

/// Reference sizing: number of distinct names.
pub const DEFAULT_SYMBOL_CAPACITY: usize = 1000;

/// Reference sizing: characters kept per name.
pub const DEFAULT_MAX_SYMBOL_LENGTH: usize = 64;

/// Error returned when a new name arrives and every entry is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolTableFull {
    /// Number of names the table was created with.
    pub capacity: usize,
}

impl fmt::Display for SymbolTableFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol table full: {} names interned", self.capacity)
    }
}

impl std::error::Error for SymbolTableFull {}

/// Interner with a hard limit on entries and on name length.
pub struct SymbolTable {
    /// Concatenated name bytes.
    buffer: String,

    /// `(start, len)` of each entry in `buffer`, indexed by symbol id.
    entries: Vec<(u32, u32)>,

    capacity: usize,
    max_len: usize,

    #[cfg(feature = "hashed-lookup")]
    index: HashMap<Box<str>, Symbol>,
}

impl SymbolTable {
    /// Creates an empty table holding at most `capacity` names of at most
    /// `max_len` characters each.
    #[must_use]
    pub fn new(capacity: usize, max_len: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity.saturating_mul(8)),
            entries: Vec::with_capacity(capacity),
            capacity,
            max_len,
            #[cfg(feature = "hashed-lookup")]
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Returns `name` cut to its first `max_len` characters.
    #[must_use]
    pub fn truncate<'a>(&self, name: &'a str) -> &'a str {
        match name.char_indices().nth(self.max_len) {
            Some((end, _)) => &name[..end],
            None => name,
        }
    }

    /// Interns `name`, returning its symbol.
    ///
    /// Known names (after truncation) return their existing symbol even when
    /// the table is full.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolTableFull`] if `name` is new and no entry is free.
    pub fn intern(&mut self, name: &str) -> Result<Symbol, SymbolTableFull> {
        let name = self.truncate(name);
        if let Some(sym) = self.find(name) {
            return Ok(sym);
        }
        if self.entries.len() >= self.capacity {
            return Err(SymbolTableFull {
                capacity: self.capacity,
            });
        }

        let sym = Symbol::new(self.entries.len() as u32);
        let start = self.buffer.len() as u32;
        self.buffer.push_str(name);
        self.entries.push((start, name.len() as u32));

        #[cfg(feature = "hashed-lookup")]
        self.index.insert(name.into(), sym);

        Ok(sym)
    }

    /// Returns the symbol for `name` if it has been interned, without
    /// adding it.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.find(self.truncate(name))
    }

    #[cfg(not(feature = "hashed-lookup"))]
    fn find(&self, name: &str) -> Option<Symbol> {
        (0..self.entries.len())
            .find(|&i| self.entry(i) == name)
            .map(|i| Symbol::new(i as u32))
    }

    #[cfg(feature = "hashed-lookup")]
    fn find(&self, name: &str) -> Option<Symbol> {
        self.index.get(name).copied()
    }

    fn entry(&self, i: usize) -> &str {
        let (start, len) = self.entries[i];
        &self.buffer[start as usize..(start + len) as usize]
    }

    /// Returns the canonical text of `sym`, or `None` for an id this table
    /// never issued.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        (sym.as_usize() < self.entries.len()).then(|| self.entry(sym.as_usize()))
    }

    /// Number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no name has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of names.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Maximum characters kept per name.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Forgets every name. Previously issued symbols become invalid.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.entries.clear();
        #[cfg(feature = "hashed-lookup")]
        self.index.clear();
    }

    /// Iterates over `(symbol, name)` pairs in interning order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> + '_ {
        (0..self.entries.len()).map(|i| (Symbol::new(i as u32), self.entry(i)))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL_CAPACITY, DEFAULT_MAX_SYMBOL_LENGTH)
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("max_len", &self.max_len)
            .finish()
    }
}
