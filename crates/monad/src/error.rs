//! Error types for the MONADLISP evaluator.
//!
//! Evaluation never aborts on these: the evaluator records them as
//! diagnostics on the [`Interpreter`](crate::Interpreter) and yields `()` so
//! the surrounding program keeps running. Two families share the type:
//!
//! - **Evaluation errors**: undefined variables, bad applications, malformed
//!   special forms and runaway recursion.
//! - **Resource exhaustion**: one of the fixed-capacity tables ran out.
//!   [`Error::is_resource_exhaustion`] tells them apart.
//!
//! Reader failures are a separate type, [`monad_syntax::ParseError`].

use crate::value::Kind;
use std::fmt;

/// Diagnostics produced while evaluating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A symbol with no binding in the environment chain.
    UndefinedVariable {
        /// The symbol's text.
        name: String,
    },

    /// The head of an application evaluated to `()`.
    ApplyNil,

    /// The head of an application is neither a closure nor a builtin.
    NotAProcedure {
        /// What the head evaluated to.
        kind: Kind,
    },

    /// A special form with the wrong shape.
    MalformedSpecialForm {
        /// The form's keyword.
        form: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Evaluation nested deeper than the configured limit.
    RecursionLimit {
        /// The limit that was hit.
        depth: usize,
    },

    /// The object heap has no free slot.
    HeapExhausted {
        /// Heap size in objects.
        capacity: usize,
    },

    /// The symbol table cannot take another name.
    SymbolTableFull {
        /// Table size in names.
        capacity: usize,
    },

    /// No environment frame is left for a closure call.
    EnvironmentPoolExhausted {
        /// Pool size in frames.
        capacity: usize,
    },

    /// A frame cannot hold another binding.
    FrameFull {
        /// Bindings per frame.
        capacity: usize,
    },

    /// An environment handle the pool never issued, for example one kept
    /// across [`Interpreter::reset`](crate::Interpreter::reset).
    UnknownEnvironment {
        /// The handle's slot index.
        index: usize,
    },
}

impl Error {
    /// Returns true for the fixed-capacity exhaustion variants.
    #[must_use]
    pub const fn is_resource_exhaustion(&self) -> bool {
        matches!(
            self,
            Error::HeapExhausted { .. }
                | Error::SymbolTableFull { .. }
                | Error::EnvironmentPoolExhausted { .. }
                | Error::FrameFull { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UndefinedVariable { name } => write!(f, "Undefined variable: {name}"),
            Error::ApplyNil => write!(f, "Cannot apply nil"),
            Error::NotAProcedure { kind } => write!(f, "Not a function: {kind}"),
            Error::MalformedSpecialForm { form, reason } => write!(f, "{form}: {reason}"),
            Error::RecursionLimit { depth } => {
                write!(f, "Recursion limit exceeded: depth {depth}")
            }
            Error::HeapExhausted { capacity } => {
                write!(f, "Out of memory: heap of {capacity} objects is full")
            }
            Error::SymbolTableFull { capacity } => {
                write!(f, "Out of memory: symbol table of {capacity} names is full")
            }
            Error::EnvironmentPoolExhausted { capacity } => {
                write!(f, "Out of memory: all {capacity} environments are in use")
            }
            Error::FrameFull { capacity } => {
                write!(f, "Out of memory: environment frame holds {capacity} bindings")
            }
            Error::UnknownEnvironment { index } => write!(f, "Unknown environment: {index}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<monad_mem::SymbolTableFull> for Error {
    fn from(err: monad_mem::SymbolTableFull) -> Self {
        Error::SymbolTableFull {
            capacity: err.capacity,
        }
    }
}

impl From<monad_mem::ArenaFull> for Error {
    fn from(err: monad_mem::ArenaFull) -> Self {
        Error::HeapExhausted {
            capacity: err.capacity,
        }
    }
}

/// Result type for fallible interpreter internals.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::UndefinedVariable { name: "x".into() }.to_string(),
            "Undefined variable: x"
        );
        assert_eq!(Error::ApplyNil.to_string(), "Cannot apply nil");
        assert_eq!(
            Error::NotAProcedure { kind: Kind::Integer }.to_string(),
            "Not a function: integer"
        );
        assert_eq!(
            Error::MalformedSpecialForm {
                form: "define",
                reason: "first argument must be a symbol",
            }
            .to_string(),
            "define: first argument must be a symbol"
        );
    }

    #[test]
    fn test_resource_classification() {
        assert!(Error::HeapExhausted { capacity: 1 }.is_resource_exhaustion());
        assert!(Error::FrameFull { capacity: 1 }.is_resource_exhaustion());
        assert!(!Error::ApplyNil.is_resource_exhaustion());
        assert!(!Error::RecursionLimit { depth: 4 }.is_resource_exhaustion());
        assert!(!Error::UnknownEnvironment { index: 9 }.is_resource_exhaustion());
    }

    #[test]
    fn test_from_leaf_errors() {
        let err: Error = monad_mem::ArenaFull { capacity: 8 }.into();
        assert_eq!(err, Error::HeapExhausted { capacity: 8 });
        let err: Error = monad_mem::SymbolTableFull { capacity: 3 }.into();
        assert_eq!(err, Error::SymbolTableFull { capacity: 3 });
    }
}
