//! Object heap and symbol table.
//!
//! The heap is a [`FixedArena`] of [`Object`]s: allocation takes the next
//! slot, nothing is ever freed, and a full heap refuses further requests
//! without disturbing what it already holds. The symbol table lives next to
//! it because symbol objects are only meaningful with it.
//!
//! [`Heap`] is also the reader's [`Builder`], so parsed expressions land
//! directly in the heap.

use crate::error::{Error, Result};
use crate::value::{Kind, ObjRef, Object, Value};
use monad_log::debug;
use monad_mem::{ArenaStats, FixedArena, Symbol, SymbolTable};
use monad_syntax::Builder;

/// Objects and symbol names.
#[derive(Debug)]
pub struct Heap {
    objects: FixedArena<Object>,
    symbols: SymbolTable,
}

impl Heap {
    /// Creates an empty heap.
    #[must_use]
    pub fn new(capacity: usize, symbol_capacity: usize, max_symbol_length: usize) -> Self {
        Self {
            objects: FixedArena::with_capacity(capacity),
            symbols: SymbolTable::new(symbol_capacity, max_symbol_length),
        }
    }

    /// Stores `object` and returns a value referring to it.
    ///
    /// # Errors
    ///
    /// [`Error::HeapExhausted`] when every slot is taken.
    pub fn alloc(&mut self, object: Object) -> Result<Value> {
        Ok(Value::Ref(self.objects.alloc(object)?))
    }

    /// Interns `name`.
    ///
    /// # Errors
    ///
    /// [`Error::SymbolTableFull`] if `name` is new and the table is full.
    pub fn intern(&mut self, name: &str) -> Result<Symbol> {
        Ok(self.symbols.intern(name)?)
    }

    /// Returns the symbol already interned for `name`, if any.
    #[must_use]
    pub fn lookup_symbol(&self, name: &str) -> Option<Symbol> {
        self.symbols.lookup(name)
    }

    /// Canonical text of `sym`.
    #[must_use]
    pub fn symbol_name(&self, sym: Symbol) -> Option<&str> {
        self.symbols.resolve(sym)
    }

    /// The object behind `obj`.
    #[must_use]
    pub fn get(&self, obj: ObjRef) -> Option<&Object> {
        self.objects.get(obj)
    }

    /// The object behind `value`, or `None` for immediates.
    #[must_use]
    pub fn object(&self, value: Value) -> Option<&Object> {
        self.objects.get(value.as_obj()?)
    }

    /// Type tag of `value`.
    #[must_use]
    pub fn kind_of(&self, value: Value) -> Kind {
        match value {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Boolean,
            Value::Ref(obj) => self.get(obj).map_or(Kind::Nil, Object::kind),
        }
    }

    /// Both halves of a pair.
    #[must_use]
    pub fn pair(&self, value: Value) -> Option<(Value, Value)> {
        match self.object(value)? {
            Object::Cons(car, cdr) => Some((*car, *cdr)),
            _ => None,
        }
    }

    /// First half of a pair; `()` for anything else.
    #[must_use]
    pub fn car(&self, value: Value) -> Value {
        self.pair(value).map_or(Value::Nil, |(car, _)| car)
    }

    /// Second half of a pair; `()` for anything else.
    #[must_use]
    pub fn cdr(&self, value: Value) -> Value {
        self.pair(value).map_or(Value::Nil, |(_, cdr)| cdr)
    }

    /// Returns true if `value` is a pair.
    #[must_use]
    pub fn is_pair(&self, value: Value) -> bool {
        self.pair(value).is_some()
    }

    /// The integer in `value`, if it is one.
    #[must_use]
    pub fn as_integer(&self, value: Value) -> Option<i32> {
        match self.object(value)? {
            Object::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The symbol in `value`, if it is one.
    #[must_use]
    pub fn as_symbol(&self, value: Value) -> Option<Symbol> {
        match self.object(value)? {
            Object::Symbol(sym) => Some(*sym),
            _ => None,
        }
    }

    /// Iterates over the elements of a list, stopping at the first non-pair
    /// tail.
    pub fn iter_list(&self, list: Value) -> ListIter<'_> {
        ListIter { heap: self, rest: list }
    }

    /// Object slot counters.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        self.objects.stats()
    }

    /// Number of interned names.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Maximum number of interned names.
    #[must_use]
    pub fn symbol_capacity(&self) -> usize {
        self.symbols.capacity()
    }

    /// Drops every object and name.
    pub fn reset(&mut self) {
        self.objects.reset();
        self.symbols.clear();
    }
}

/// Iterator over list elements. See [`Heap::iter_list`].
pub struct ListIter<'h> {
    heap: &'h Heap,
    rest: Value,
}

impl ListIter<'_> {
    /// What is left after the last element: `()` for a proper list.
    #[must_use]
    pub fn tail(&self) -> Value {
        self.rest
    }
}

impl Iterator for ListIter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let (car, cdr) = self.heap.pair(self.rest)?;
        self.rest = cdr;
        Some(car)
    }
}

impl Builder for Heap {
    type Node = Value;

    fn nil(&mut self) -> Value {
        Value::Nil
    }

    fn boolean(&mut self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn integer(&mut self, value: i32) -> Option<Value> {
        self.alloc(Object::Integer(value))
            .inspect_err(|err| debug!("reader: {err}"))
            .ok()
    }

    fn symbol(&mut self, name: &str) -> Option<Value> {
        let sym = self
            .intern(name)
            .inspect_err(|err| debug!("reader: {err}"))
            .ok()?;
        self.alloc(Object::Symbol(sym))
            .inspect_err(|err| debug!("reader: {err}"))
            .ok()
    }

    fn cons(&mut self, car: Value, cdr: Value) -> Option<Value> {
        self.alloc(Object::Cons(car, cdr))
            .inspect_err(|err| debug!("reader: {err}"))
            .ok()
    }
}
