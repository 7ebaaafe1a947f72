//! Owned S-expression trees.
//!
//! [`Datum`] is a heap-allocated tree that implements [`Builder`] through
//! [`DatumBuilder`]. It never runs out of space, which makes it the builder
//! of choice for tooling and for checking the grammar on its own.

use crate::builder::Builder;
use std::fmt;

/// An owned S-expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datum {
    /// `()` / `nil`
    Nil,
    /// `#t` / `#f`
    Bool(bool),
    /// Integer literal
    Int(i32),
    /// Symbol name
    Symbol(String),
    /// A pair
    Pair(Box<Datum>, Box<Datum>),
}

impl Datum {
    /// Builds a proper list from `items`.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Datum, IntoIter: DoubleEndedIterator>) -> Self {
        items
            .into_iter()
            .rev()
            .fold(Datum::Nil, |cdr, car| Datum::Pair(Box::new(car), Box::new(cdr)))
    }

    /// Returns true for `Datum::Nil`.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Datum::Nil)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Nil => f.write_str("()"),
            Datum::Bool(true) => f.write_str("#t"),
            Datum::Bool(false) => f.write_str("#f"),
            Datum::Int(n) => write!(f, "{n}"),
            Datum::Symbol(name) => f.write_str(name),
            Datum::Pair(car, cdr) => {
                write!(f, "({car}")?;
                let mut rest = cdr.as_ref();
                while let Datum::Pair(car, cdr) = rest {
                    write!(f, " {car}")?;
                    rest = cdr;
                }
                if !rest.is_nil() {
                    write!(f, " . {rest}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// [`Builder`] producing [`Datum`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatumBuilder;

impl Builder for DatumBuilder {
    type Node = Datum;

    fn nil(&mut self) -> Datum {
        Datum::Nil
    }

    fn boolean(&mut self, value: bool) -> Datum {
        Datum::Bool(value)
    }

    fn integer(&mut self, value: i32) -> Option<Datum> {
        Some(Datum::Int(value))
    }

    fn symbol(&mut self, name: &str) -> Option<Datum> {
        Some(Datum::Symbol(name.to_owned()))
    }

    fn cons(&mut self, car: Datum, cdr: Datum) -> Option<Datum> {
        Some(Datum::Pair(Box::new(car), Box::new(cdr)))
    }
}
