//! MONADLISP syntax: the S-expression reader
//!
//! The reader is a single-pass recursive-descent parser over text. It does
//! not know how the interpreter lays out its objects: every node is created
//! through the [`Builder`] trait, so the same grammar can build arena
//! objects, an owned [`Datum`] tree, or nothing at all.
//!
//! # Modules
//!
//! - [`position`] - 1-indexed line/column tracking
//! - [`error`] - parse error kinds and the error type
//! - [`builder`] - the node construction interface
//! - [`parser`] - the grammar
//! - [`datum`] - an owned tree implementing [`Builder`]
//!
//! # Examples
//!
//! ```
//! use monad_syntax::{Datum, DatumBuilder, parse};
//!
//! let datum = parse("'(a . 1)", &mut DatumBuilder).unwrap();
//! assert_eq!(datum.to_string(), "(quote (a . 1))");
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod datum;
pub mod error;
pub mod parser;
pub mod position;

pub use builder::Builder;
pub use datum::{Datum, DatumBuilder};
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use parser::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_LIST_ELEMENTS, Parser, parse};
pub use position::Position;
