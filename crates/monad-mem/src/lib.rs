//! MONADLISP memory infrastructure
//!
//! Everything the interpreter owns lives in fixed-capacity tables that are
//! only ever appended to and are cleared as a whole on re-initialization:
//!
//! - **[`FixedArena`]**: slab of `T` addressed by typed [`Handle`]s
//! - **[`SymbolTable`]**: interner mapping names to stable [`Symbol`] ids
//!
//! Exhaustion is reported as a value ([`ArenaFull`], [`SymbolTableFull`]),
//! never as a panic, so callers can degrade instead of aborting.

pub mod arena;
pub mod interner;
pub mod symbol;

pub use arena::{ArenaFull, ArenaStats, FixedArena, Handle};
pub use interner::{
    DEFAULT_MAX_SYMBOL_LENGTH, DEFAULT_SYMBOL_CAPACITY, SymbolTable, SymbolTableFull,
};
pub use symbol::Symbol;
