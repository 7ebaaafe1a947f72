//! Source positions for diagnostics.

use std::fmt;

/// A 1-indexed line/column location in reader input.
///
/// Columns count characters, not bytes. A newline moves to column 1 of the
/// next line.
///
/// ```
/// use monad_syntax::Position;
///
/// let pos = Position::new(2, 7);
/// assert_eq!(pos.to_string(), "Line 2, column 7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,

    /// Column number in characters (1-indexed)
    pub column: usize,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The first character of the input.
    #[must_use]
    pub const fn start() -> Self {
        Self::new(1, 1)
    }

    /// Returns the position after consuming `ch` from here.
    #[must_use]
    pub const fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self::new(self.line + 1, 1)
        } else {
            Self::new(self.line, self.column + 1)
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}, column {}", self.line, self.column)
    }
}
