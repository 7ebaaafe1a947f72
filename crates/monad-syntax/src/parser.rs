//! Recursive-descent S-expression reader.
//!
//! # Grammar
//!
//! ```text
//! expr    := list | quoted | integer | boolean | symbol
//! list    := '(' expr* ')' | '(' expr+ '.' expr ')'
//! quoted  := '\'' expr                      ; read as (quote expr)
//! integer := ('+' | '-')? digit+            ; sign only if a digit follows,
//!                                           ; ends at the last digit
//! boolean := '#t' | '#f'                    ; must be followed by a delimiter
//! symbol  := start (start | digit)*         ; `nil` reads as the empty list
//! start   := letter | one of + - * / = > < ? ! _ & | % ^ ~
//! ```
//!
//! Whitespace and `;` line comments may appear between any two tokens.
//! Lists and quotes nest at most [`DEFAULT_MAX_DEPTH`] levels deep unless
//! [`Parser::max_depth`] says otherwise.
//!
//! # Examples
//!
//! ```
//! use monad_syntax::{DatumBuilder, Parser};
//!
//! let mut parser = Parser::new("(define x 1) ; first\n x");
//! let first = parser.parse(&mut DatumBuilder).unwrap();
//! assert_eq!(first.to_string(), "(define x 1)");
//! assert!(parser.has_more());
//! assert_eq!(parser.parse(&mut DatumBuilder).unwrap().to_string(), "x");
//! assert!(!parser.has_more());
//! ```

use crate::builder::Builder;
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::position::Position;
use monad_mem::DEFAULT_MAX_SYMBOL_LENGTH;

/// Reference sizing: elements accepted in one list literal.
pub const DEFAULT_MAX_LIST_ELEMENTS: usize = 256;

/// Lists and quotes open at once before the reader gives up.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Largest integer magnitude the reader accepts.
const MAX_MAGNITUDE: u32 = i32::MAX as u32;

fn is_symbol_start(ch: char) -> bool {
    ch.is_ascii_alphabetic()
        || matches!(
            ch,
            '+' | '-' | '*' | '/' | '=' | '>' | '<' | '?' | '!' | '_' | '&' | '|' | '%' | '^' | '~'
        )
}

fn is_symbol_char(ch: char) -> bool {
    is_symbol_start(ch) || ch.is_ascii_digit()
}

fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_delimiter(ch: Option<char>) -> bool {
    match ch {
        None => true,
        Some(ch) => is_space(ch) || matches!(ch, '(' | ')' | '\'' | ';'),
    }
}

/// Reader state over one input string.
///
/// A parser can be asked for several expressions in turn; each call to
/// [`parse`](Self::parse) consumes exactly one.
pub struct Parser<'input> {
    input: &'input str,

    /// Byte offset of the next unread character.
    offset: usize,

    /// Position of the next unread character.
    position: Position,

    /// Lists and quotes currently open.
    depth: usize,

    max_symbol_length: usize,
    max_list_elements: usize,
    max_depth: usize,
}

impl<'input> Parser<'input> {
    /// Creates a parser with the reference limits.
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            offset: 0,
            position: Position::start(),
            depth: 0,
            max_symbol_length: DEFAULT_MAX_SYMBOL_LENGTH,
            max_list_elements: DEFAULT_MAX_LIST_ELEMENTS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the longest symbol (in characters) the reader accepts.
    #[must_use]
    pub fn max_symbol_length(mut self, max: usize) -> Self {
        self.max_symbol_length = max;
        self
    }

    /// Sets how many elements one list literal may hold.
    #[must_use]
    pub fn max_list_elements(mut self, max: usize) -> Self {
        self.max_list_elements = max;
        self
    }

    /// Sets how many lists and quotes may be open at once.
    #[must_use]
    pub fn max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }

    /// Position of the next unread character.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Reads one expression.
    ///
    /// # Errors
    ///
    /// Returns [`ParseErrorKind::EmptyInput`] if only whitespace and comments
    /// remain, otherwise the first grammar or construction error.
    pub fn parse<B: Builder>(&mut self, builder: &mut B) -> ParseResult<B::Node> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(self.error(ParseErrorKind::EmptyInput));
        }
        self.parse_expr(builder)
    }

    /// Reads every remaining expression.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error. Input with no expressions at all
    /// yields an empty vector, not [`ParseErrorKind::EmptyInput`].
    pub fn parse_all<B: Builder>(&mut self, builder: &mut B) -> ParseResult<Vec<B::Node>> {
        let mut nodes = Vec::new();
        while self.has_more() {
            nodes.push(self.parse_expr(builder)?);
        }
        Ok(nodes)
    }

    /// Returns true if another expression follows. Skips whitespace and
    /// comments as a side effect.
    pub fn has_more(&mut self) -> bool {
        self.skip_whitespace();
        self.peek().is_some()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.offset..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        self.input[self.offset..].chars().nth(1)
    }

    fn peek3(&self) -> Option<char> {
        self.input[self.offset..].chars().nth(2)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        self.position = self.position.advance(ch);
        Some(ch)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.position)
    }

    fn error_msg(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::with_message(kind, self.position, message)
    }

    fn bad_hash(&self) -> ParseError {
        self.error_msg(ParseErrorKind::UnexpectedChar, "Unexpected character '#'")
    }

    fn alloc_failed(&self) -> ParseError {
        self.error(ParseErrorKind::AllocFailed)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if is_space(ch) {
                self.bump();
            } else if ch == ';' {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn parse_expr<B: Builder>(&mut self, builder: &mut B) -> ParseResult<B::Node> {
        self.skip_whitespace();

        let Some(ch) = self.peek() else {
            return Err(self.error(ParseErrorKind::UnexpectedEof));
        };

        match ch {
            '(' | '\'' => self.parse_nested(builder),
            ')' => Err(self.error_msg(ParseErrorKind::UnmatchedParen, "Unexpected ')'")),
            '#' => self.parse_boolean(builder),
            '0'..='9' => self.parse_integer(builder),
            '+' | '-' if self.peek2().is_some_and(|c| c.is_ascii_digit()) => {
                self.parse_integer(builder)
            }
            ch if is_symbol_start(ch) => self.parse_symbol(builder),
            ch => Err(self.error_msg(
                ParseErrorKind::UnexpectedChar,
                format!("Unexpected character '{ch}'"),
            )),
        }
    }

    /// Reads a list or a quote one level further down.
    fn parse_nested<B: Builder>(&mut self, builder: &mut B) -> ParseResult<B::Node> {
        if self.depth >= self.max_depth {
            return Err(self.error(ParseErrorKind::TooDeep));
        }
        self.depth += 1;
        let node = if self.peek() == Some('(') {
            self.parse_list(builder)
        } else {
            self.parse_quote(builder)
        };
        self.depth -= 1;
        node
    }

    fn parse_list<B: Builder>(&mut self, builder: &mut B) -> ParseResult<B::Node> {
        self.bump(); // '('
        let mut elements = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnmatchedParen)),
                Some(')') => {
                    self.bump();
                    let tail = builder.nil();
                    return self.fold_list(builder, elements, tail);
                }
                Some('.') if !elements.is_empty() => {
                    self.bump();
                    let tail = self.parse_expr(builder)?;
                    self.skip_whitespace();
                    if self.peek() != Some(')') {
                        return Err(self.error_msg(
                            ParseErrorKind::UnmatchedParen,
                            "Expected ')' after dotted pair",
                        ));
                    }
                    self.bump();
                    return self.fold_list(builder, elements, tail);
                }
                Some(_) => {
                    if elements.len() >= self.max_list_elements {
                        return Err(self.error_msg(ParseErrorKind::AllocFailed, "List too long"));
                    }
                    elements.push(self.parse_expr(builder)?);
                }
            }
        }
    }

    /// Builds `(e0 e1 ... . tail)` from the right so no pair is ever patched.
    fn fold_list<B: Builder>(
        &self,
        builder: &mut B,
        elements: Vec<B::Node>,
        tail: B::Node,
    ) -> ParseResult<B::Node> {
        elements
            .into_iter()
            .rev()
            .try_fold(tail, |cdr, car| builder.cons(car, cdr))
            .ok_or_else(|| self.alloc_failed())
    }

    fn parse_quote<B: Builder>(&mut self, builder: &mut B) -> ParseResult<B::Node> {
        self.bump(); // '\''
        let quoted = self.parse_expr(builder)?;

        let quote = builder.symbol("quote").ok_or_else(|| self.alloc_failed())?;
        let nil = builder.nil();
        let rest = builder.cons(quoted, nil).ok_or_else(|| self.alloc_failed())?;
        builder.cons(quote, rest).ok_or_else(|| self.alloc_failed())
    }

    fn parse_boolean<B: Builder>(&mut self, builder: &mut B) -> ParseResult<B::Node> {
        let value = match self.peek2() {
            Some('t') => true,
            Some('f') => false,
            _ => return Err(self.bad_hash()),
        };
        if !is_delimiter(self.peek3()) {
            return Err(self.bad_hash());
        }
        self.bump();
        self.bump();
        Ok(builder.boolean(value))
    }

    fn parse_integer<B: Builder>(&mut self, builder: &mut B) -> ParseResult<B::Node> {
        let negative = match self.peek() {
            Some('-') => {
                self.bump();
                true
            }
            Some('+') => {
                self.bump();
                false
            }
            _ => false,
        };

        let mut magnitude: u32 = 0;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            magnitude = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add(digit))
                .filter(|&m| m <= MAX_MAGNITUDE)
                .ok_or_else(|| self.error_msg(ParseErrorKind::InvalidNumber, "Number too large"))?;
            self.bump();
        }

        // magnitude <= i32::MAX, so the cast and the negation are exact.
        let value = if negative {
            -(magnitude as i32)
        } else {
            magnitude as i32
        };
        builder.integer(value).ok_or_else(|| self.alloc_failed())
    }

    fn parse_symbol<B: Builder>(&mut self, builder: &mut B) -> ParseResult<B::Node> {
        let start = self.offset;
        let mut length = 0;

        while self.peek().is_some_and(is_symbol_char) {
            if length == self.max_symbol_length {
                return Err(self.error(ParseErrorKind::SymbolTooLong));
            }
            self.bump();
            length += 1;
        }

        let name = &self.input[start..self.offset];
        if name == "nil" {
            return Ok(builder.nil());
        }
        builder.symbol(name).ok_or_else(|| self.alloc_failed())
    }
}

/// Reads the first expression of `input` with the reference limits.
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn parse<B: Builder>(input: &str, builder: &mut B) -> ParseResult<B::Node> {
    Parser::new(input).parse(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::{Datum, DatumBuilder};

    fn read(source: &str) -> ParseResult<Datum> {
        parse(source, &mut DatumBuilder)
    }

    fn read_str(source: &str) -> String {
        read(source).unwrap().to_string()
    }

    fn kind(source: &str) -> ParseErrorKind {
        read(source).unwrap_err().kind
    }

    /// Builder that fails after a fixed number of fallible constructions.
    struct Budget(usize);

    impl Builder for Budget {
        type Node = ();

        fn nil(&mut self) {}

        fn boolean(&mut self, _value: bool) {}

        fn integer(&mut self, _value: i32) -> Option<()> {
            self.spend()
        }

        fn symbol(&mut self, _name: &str) -> Option<()> {
            self.spend()
        }

        fn cons(&mut self, _car: (), _cdr: ()) -> Option<()> {
            self.spend()
        }
    }

    impl Budget {
        fn spend(&mut self) -> Option<()> {
            self.0 = self.0.checked_sub(1)?;
            Some(())
        }
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(read("42").unwrap(), Datum::Int(42));
        assert_eq!(read("-7").unwrap(), Datum::Int(-7));
        assert_eq!(read("+15").unwrap(), Datum::Int(15));
        assert_eq!(read("0").unwrap(), Datum::Int(0));
        assert_eq!(read("2147483647").unwrap(), Datum::Int(i32::MAX));
        assert_eq!(read("-2147483647").unwrap(), Datum::Int(-i32::MAX));
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let err = read("2147483648").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber);
        assert_eq!(err.message, "Number too large");
        assert_eq!(err.position, Position::new(1, 10));
    }

    #[test]
    fn test_integer_ends_at_last_digit() {
        assert_eq!(read_str("(12abc)"), "(12 abc)");
        assert_eq!(read_str("(1. 2)"), "(1 . 2)");

        let mut parser = Parser::new("12abc");
        assert_eq!(parser.parse(&mut DatumBuilder).unwrap(), Datum::Int(12));
        assert_eq!(parser.position(), Position::new(1, 3));
        assert_eq!(
            parser.parse(&mut DatumBuilder).unwrap(),
            Datum::Symbol("abc".into())
        );
    }

    #[test]
    fn test_sign_without_digit_is_symbol() {
        assert_eq!(read("-").unwrap(), Datum::Symbol("-".into()));
        assert_eq!(read("+a").unwrap(), Datum::Symbol("+a".into()));
        assert_eq!(read("->x").unwrap(), Datum::Symbol("->x".into()));
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(read_str("lambda"), "lambda");
        assert_eq!(read_str("set-car!"), "set-car!");
        assert_eq!(read_str("a1b2"), "a1b2");
        assert_eq!(read_str("<=>"), "<=>");
    }

    #[test]
    fn test_reserved_literals() {
        assert_eq!(read("nil").unwrap(), Datum::Nil);
        assert_eq!(read("#t").unwrap(), Datum::Bool(true));
        assert_eq!(read("#f").unwrap(), Datum::Bool(false));
        assert_eq!(read("nilly").unwrap(), Datum::Symbol("nilly".into()));
        assert_eq!(read_str("(#t #f)"), "(#t #f)");
    }

    #[test]
    fn test_bad_hash_literal() {
        assert_eq!(kind("#x"), ParseErrorKind::UnexpectedChar);
        assert_eq!(kind("#true"), ParseErrorKind::UnexpectedChar);
        assert_eq!(kind("#"), ParseErrorKind::UnexpectedChar);
    }

    #[test]
    fn test_symbol_length_limit() {
        let ok = "a".repeat(DEFAULT_MAX_SYMBOL_LENGTH);
        assert_eq!(read(&ok).unwrap(), Datum::Symbol(ok.clone()));

        let long = "a".repeat(DEFAULT_MAX_SYMBOL_LENGTH + 1);
        let err = read(&long).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::SymbolTooLong);
        assert_eq!(err.position, Position::new(1, DEFAULT_MAX_SYMBOL_LENGTH + 1));
    }

    #[test]
    fn test_configured_symbol_limit() {
        let err = Parser::new("abcd")
            .max_symbol_length(3)
            .parse(&mut DatumBuilder)
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::SymbolTooLong);
    }

    #[test]
    fn test_parse_lists() {
        assert_eq!(read("()").unwrap(), Datum::Nil);
        assert_eq!(read_str("(1 2 3)"), "(1 2 3)");
        assert_eq!(read_str("( a  ( b c ) d )"), "(a (b c) d)");
        assert_eq!(read_str("(())"), "(())");
    }

    #[test]
    fn test_dotted_pairs() {
        let pair = read("(1 . 2)").unwrap();
        assert_eq!(
            pair,
            Datum::Pair(Box::new(Datum::Int(1)), Box::new(Datum::Int(2)))
        );
        assert_eq!(pair.to_string(), "(1 . 2)");
        assert_eq!(read_str("(1 2 . 3)"), "(1 2 . 3)");
        assert_eq!(read_str("(a . (b c))"), "(a b c)");
    }

    #[test]
    fn test_dotted_pair_errors() {
        let err = read("(1 . 2 3)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
        assert_eq!(err.message, "Expected ')' after dotted pair");
        assert_eq!(kind("(. 2)"), ParseErrorKind::UnexpectedChar);
        assert_eq!(kind("(1 . )"), ParseErrorKind::UnmatchedParen);
        assert_eq!(kind("(1 ."), ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_quote_shorthand() {
        assert_eq!(read("'(a b)").unwrap(), read("(quote (a b))").unwrap());
        assert_eq!(read_str("'x"), "(quote x)");
        assert_eq!(read_str("''x"), "(quote (quote x))");
        assert_eq!(kind("'"), ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_comments_and_whitespace() {
        assert_eq!(read_str("; leading\n  (a ; inner\n b)"), "(a b)");
        assert_eq!(read_str("\t\r\n 5"), "5");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kind(""), ParseErrorKind::EmptyInput);
        assert_eq!(kind("   ; only a comment"), ParseErrorKind::EmptyInput);
    }

    #[test]
    fn test_unmatched_parens() {
        let err = read("(1 2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
        assert_eq!(err.message, "Unmatched '('");
        assert_eq!(err.position, Position::new(1, 5));

        let err = read(")").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
        assert_eq!(err.message, "Unexpected ')'");
    }

    #[test]
    fn test_unexpected_character_position() {
        let err = read("(+ 1\n   @)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedChar);
        assert_eq!(err.position, Position::new(2, 4));
        assert_eq!(err.message, "Unexpected character '@'");
    }

    #[test]
    fn test_list_element_cap() {
        let items = vec!["1"; DEFAULT_MAX_LIST_ELEMENTS].join(" ");
        assert!(read(&format!("({items})")).is_ok());

        let err = read(&format!("({items} 1)")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::AllocFailed);
        assert_eq!(err.message, "List too long");
    }

    #[test]
    fn test_cap_applies_per_list() {
        let inner = format!("({})", vec!["1"; 3].join(" "));
        let source = format!("({inner} {inner} {inner})");
        assert!(
            Parser::new(&source)
                .max_list_elements(3)
                .parse(&mut DatumBuilder)
                .is_ok()
        );
    }

    #[test]
    fn test_nesting_limit() {
        let open = "(".repeat(DEFAULT_MAX_DEPTH);
        let close = ")".repeat(DEFAULT_MAX_DEPTH);
        assert!(read(&format!("{open}{close}")).is_ok());

        let err = read(&format!("{}x", "'".repeat(DEFAULT_MAX_DEPTH + 1))).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooDeep);
        assert_eq!(err.position, Position::new(1, DEFAULT_MAX_DEPTH + 1));
        assert_eq!(err.message, "Nesting too deep");
    }

    #[test]
    fn test_nesting_limit_counts_open_levels_only() {
        assert!(
            Parser::new("((a) (b (c)) '(d))")
                .max_depth(3)
                .parse(&mut DatumBuilder)
                .is_ok()
        );

        let err = Parser::new("(a (b (c)))")
            .max_depth(2)
            .parse(&mut DatumBuilder)
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooDeep);
        assert_eq!(err.position, Position::new(1, 7));
    }

    #[test]
    fn test_deep_input_fails_without_recursing() {
        let quotes = format!("{}x", "'".repeat(100_000));
        assert_eq!(kind(&quotes), ParseErrorKind::TooDeep);

        let parens = "(".repeat(100_000);
        assert_eq!(kind(&parens), ParseErrorKind::TooDeep);
    }

    #[test]
    fn test_builder_failure_is_reported() {
        assert!(Parser::new("(1 2)").parse(&mut Budget(4)).is_ok());

        let err = Parser::new("(1 2)").parse(&mut Budget(3)).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::AllocFailed);

        let err = Parser::new("'x").parse(&mut Budget(1)).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::AllocFailed);
    }

    #[test]
    fn test_reads_one_expression_at_a_time() {
        let mut parser = Parser::new("1 (2) three");
        assert_eq!(parser.parse(&mut DatumBuilder).unwrap(), Datum::Int(1));
        assert_eq!(parser.position(), Position::new(1, 2));
        assert_eq!(parser.parse(&mut DatumBuilder).unwrap().to_string(), "(2)");
        assert!(parser.has_more());
        assert_eq!(parser.parse(&mut DatumBuilder).unwrap().to_string(), "three");
        assert_eq!(
            parser.parse(&mut DatumBuilder).unwrap_err().kind,
            ParseErrorKind::EmptyInput
        );
    }

    #[test]
    fn test_parse_all() {
        let all = Parser::new("(define x 1)\n; gap\nx 'y")
            .parse_all(&mut DatumBuilder)
            .unwrap();
        let printed: Vec<_> = all.iter().map(ToString::to_string).collect();
        assert_eq!(printed, vec!["(define x 1)", "x", "(quote y)"]);

        assert!(Parser::new("  ").parse_all(&mut DatumBuilder).unwrap().is_empty());
        assert!(Parser::new("1 (").parse_all(&mut DatumBuilder).is_err());
    }

    #[test]
    fn test_non_ascii_is_rejected() {
        let err = read("(λ x)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedChar);
        assert_eq!(err.position, Position::new(1, 2));
    }
}
