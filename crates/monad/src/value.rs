//! The object model.
//!
//! A [`Value`] is what the evaluator passes around. `()` and the two booleans
//! are immediate: they carry no heap slot and compare by variant, which makes
//! them singletons. Everything else is an [`ObjRef`] into the heap, and that
//! handle is what pairs, closures and environment bindings store.

use crate::env::EnvRef;
use crate::interpreter::Interpreter;
use monad_mem::{Handle, Symbol};
use std::fmt;

/// Handle to a heap-resident [`Object`].
pub type ObjRef = Handle<Object>;

/// A Lisp value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    /// The empty list.
    Nil,
    /// `#t` or `#f`.
    Bool(bool),
    /// A heap object.
    Ref(ObjRef),
}

impl Value {
    /// `#t`
    pub const TRUE: Value = Value::Bool(true);

    /// `#f`
    pub const FALSE: Value = Value::Bool(false);

    /// Returns true for `()`.
    #[must_use]
    pub const fn is_nil(self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Only `#f` is false. `()` and `0` are both true.
    #[must_use]
    pub const fn is_truthy(self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    /// The heap handle, if this value lives on the heap.
    #[must_use]
    pub const fn as_obj(self) -> Option<ObjRef> {
        match self {
            Value::Ref(obj) => Some(obj),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Signature of a native procedure.
///
/// `args` is a proper list of already-evaluated arguments; `env` is the
/// caller's environment.
pub type BuiltinFn = fn(interp: &mut Interpreter, args: Value, env: EnvRef) -> Value;

/// A native procedure.
#[derive(Clone, Copy)]
pub struct Builtin {
    /// Name it is installed under.
    pub name: &'static str,
    /// The implementation.
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// A procedure created by `lambda`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closure {
    /// The parameter list as written.
    pub params: Value,
    /// The body expressions.
    pub body: Value,
    /// Environment the lambda was evaluated in.
    pub env: EnvRef,
}

/// A heap slot.
#[derive(Debug, Clone, Copy)]
pub enum Object {
    /// A 32-bit integer.
    Integer(i32),
    /// A reference to an interned name.
    Symbol(Symbol),
    /// A pair. Both halves are always present; `()` stands in for missing ones.
    Cons(Value, Value),
    /// A user procedure.
    Closure(Closure),
    /// A native procedure.
    Builtin(Builtin),
}

/// Type tag of a value, as `=` compares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `()`
    Nil,
    /// `#t` / `#f`
    Boolean,
    /// Integer
    Integer,
    /// Symbol
    Symbol,
    /// Pair
    Cons,
    /// Closure
    Closure,
    /// Native procedure
    Builtin,
}

impl Kind {
    /// Lower-case name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Symbol => "symbol",
            Kind::Cons => "pair",
            Kind::Closure => "closure",
            Kind::Builtin => "builtin",
        }
    }

    /// Returns true for closures and builtins.
    #[must_use]
    pub const fn is_procedure(self) -> bool {
        matches!(self, Kind::Closure | Kind::Builtin)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Object {
    /// This object's type tag.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Object::Integer(_) => Kind::Integer,
            Object::Symbol(_) => Kind::Symbol,
            Object::Cons(..) => Kind::Cons,
            Object::Closure(_) => Kind::Closure,
            Object::Builtin(_) => Kind::Builtin,
        }
    }
}
