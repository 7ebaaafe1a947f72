//! MONADLISP: a small Lisp for a bare-metal shell.
//!
//! The interpreter runs in fixed-capacity memory. It provides:
//!
//! - **Object heap** of tagged objects addressed by handles, never reclaimed
//! - **Symbol interning** so names compare as integers
//! - **Environment chain** of scope frames drawn from a fixed pool
//! - **Reader** building expressions straight into the heap
//! - **Evaluator** with `quote`, `define`, `lambda`, `if` and closures
//! - **Primitives** `+ - * = cons car cdr list` and a printer
//!
//! # Architecture
//!
//! Every table lives in one [`Interpreter`] value; there is no global state.
//! Output goes through a [`Sink`], so the same core drives a kernel console
//! or a terminal. When a table fills up the interpreter degrades instead of
//! aborting: the affected value becomes `()`, the definition is dropped or
//! the call returns `()`, and an [`Error`] is recorded for the caller to
//! report.
//!
//! # Example
//!
//! ```rust
//! use monad::Interpreter;
//!
//! let mut interp = Interpreter::default();
//! let value = interp
//!     .eval_str("(define twice (lambda (f x) (f (f x)))) (twice (lambda (n) (* n 3)) 7)")
//!     .unwrap();
//!
//! assert_eq!(interp.display(value), "63");
//! assert!(interp.diagnostics().is_empty());
//! ```

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
mod eval;
pub mod heap;
pub mod interpreter;
mod printer;
pub mod sink;
pub mod value;

// Re-export commonly used types
pub use config::Config;
pub use env::{EnvRef, Environments, Frame};
pub use error::{Error, Result};
pub use heap::Heap;
pub use interpreter::{Interpreter, Stats};
pub use sink::{IoSink, Sink};
pub use value::{Builtin, BuiltinFn, Closure, Kind, ObjRef, Object, Value};

pub use monad_syntax::{ParseError, ParseErrorKind, Position};
