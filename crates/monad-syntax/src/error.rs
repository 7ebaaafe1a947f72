//! Reader error types.
//!
//! The reader stops at the first error. Every error carries the position of
//! the character it failed on (or the end of input) and a short message.

use crate::position::Position;
use std::fmt;

/// Categories of reader failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Input ended inside an expression.
    ///
    /// ```text
    /// '
    ///  ^ Unexpected end of input
    /// ```
    UnexpectedEof,

    /// A character that cannot start or continue an expression.
    ///
    /// ```text
    /// (+ 1 @)
    ///      ^ Unexpected character '@'
    /// ```
    UnexpectedChar,

    /// A malformed or out-of-range integer literal.
    ///
    /// ```text
    /// 99999999999
    ///           ^ Number too large
    /// ```
    InvalidNumber,

    /// A symbol longer than the configured maximum.
    SymbolTooLong,

    /// A list that is never closed, a stray `)`, or a dotted tail that is
    /// not followed by `)`.
    UnmatchedParen,

    /// The [`Builder`](crate::Builder) refused to create a node, or a list
    /// literal has more elements than the reader accepts.
    AllocFailed,

    /// The input holds nothing but whitespace and comments.
    EmptyInput,

    /// Lists and quotes nested deeper than the reader accepts.
    ///
    /// ```text
    /// ((((((...
    ///      ^ Nesting too deep
    /// ```
    TooDeep,
}

impl ParseErrorKind {
    /// Default message for this kind.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnexpectedEof => "Unexpected end of input",
            Self::UnexpectedChar => "Unexpected character",
            Self::InvalidNumber => "Invalid number format",
            Self::SymbolTooLong => "Symbol exceeds maximum length",
            Self::UnmatchedParen => "Unmatched '('",
            Self::AllocFailed => "Allocation failed",
            Self::EmptyInput => "Empty input",
            Self::TooDeep => "Nesting too deep",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A reader failure at a specific position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,

    /// Where it went wrong.
    pub position: Position,

    /// Human-readable detail.
    pub message: String,
}

impl ParseError {
    /// Creates an error with the kind's default message.
    #[must_use]
    pub fn new(kind: ParseErrorKind, position: Position) -> Self {
        Self::with_message(kind, position, kind.description())
    }

    /// Creates an error with a specific message.
    #[must_use]
    pub fn with_message(
        kind: ParseErrorKind,
        position: Position,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Result type for reader operations.
pub type ParseResult<T> = Result<T, ParseError>;
