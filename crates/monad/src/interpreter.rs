//! The interpreter context.
//!
//! [`Interpreter`] owns every table the language needs: the object heap,
//! the symbol table, the environment pool with its global frame, and the
//! diagnostics recorded since they were last collected. Independent
//! instances share nothing.
//!
//! # Examples
//!
//! ```
//! use monad::Interpreter;
//!
//! let mut interp = Interpreter::default();
//! let mut out = String::new();
//!
//! interp.rep("(define sq (lambda (x) (* x x)))", &mut out).unwrap();
//! interp.rep("(sq 12)", &mut out).unwrap();
//! interp.rep("(sq y)", &mut out).unwrap();
//!
//! // `y` is unbound, so `*` sees no integers and returns its identity.
//! assert_eq!(out, "<lambda>\n144\nUndefined variable: y\n1\n");
//! ```

use crate::builtins::PRIMITIVES;
use crate::config::Config;
use crate::env::{EnvRef, Environments, Frame};
use crate::error::Error;
use crate::heap::Heap;
use crate::sink::Sink;
use crate::value::{Builtin, BuiltinFn, Kind, Object, Value};
use monad_log::{debug, info, warn};
use monad_mem::{ArenaStats, Symbol};
use monad_syntax::{ParseError, Parser};
use std::fmt;

/// Occupancy of the interpreter's tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Object heap.
    pub heap: ArenaStats,
    /// Interned names.
    pub symbols: usize,
    /// Symbol table size.
    pub symbol_capacity: usize,
    /// Environment frames, including the global one.
    pub environments: ArenaStats,
    /// Bindings in the global frame.
    pub globals: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "heap:         {}/{} objects ({} failed allocations)",
            self.heap.allocated, self.heap.capacity, self.heap.failed_allocations
        )?;
        writeln!(f, "symbols:      {}/{}", self.symbols, self.symbol_capacity)?;
        writeln!(
            f,
            "environments: {}/{} frames ({} refused)",
            self.environments.allocated,
            self.environments.capacity,
            self.environments.failed_allocations
        )?;
        write!(f, "globals:      {} bindings", self.globals)
    }
}

/// A MONADLISP interpreter.
pub struct Interpreter {
    pub(crate) heap: Heap,
    pub(crate) envs: Environments,
    diagnostics: Vec<Error>,
    config: Config,

    /// Nested `evaluate` calls in flight.
    pub(crate) depth: usize,

    /// Set when the depth limit is hit; cleared by the next top-level eval.
    pub(crate) unwinding: bool,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("stats", &self.stats())
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}

impl Interpreter {
    /// Creates an interpreter with a global environment holding the
    /// primitives.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut interp = Self {
            heap: Heap::new(
                config.heap_capacity,
                config.symbol_capacity,
                config.max_symbol_length,
            ),
            envs: Environments::new(config.env_capacity, config.frame_capacity),
            diagnostics: Vec::new(),
            config,
            depth: 0,
            unwinding: false,
        };
        interp.install_primitives();
        interp
    }

    /// Empties every table and reinstalls the primitives. All previously
    /// returned values and environments become invalid.
    pub fn reset(&mut self) {
        self.heap.reset();
        self.envs.reset();
        self.diagnostics.clear();
        self.depth = 0;
        self.unwinding = false;
        self.install_primitives();
    }

    fn install_primitives(&mut self) {
        for (name, func) in PRIMITIVES {
            self.define_builtin(name, func);
        }
        info!(
            "interpreter ready: {} objects, {} symbols, {} environments",
            self.config.heap_capacity, self.config.symbol_capacity, self.config.env_capacity
        );
    }

    /// The sizing this interpreter was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The global environment.
    #[must_use]
    pub fn global(&self) -> EnvRef {
        self.envs.global()
    }

    /// Table occupancy.
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats {
            heap: self.heap.stats(),
            symbols: self.heap.symbol_count(),
            symbol_capacity: self.heap.symbol_capacity(),
            environments: self.envs.stats(),
            globals: self
                .envs
                .frame(self.global())
                .map_or(0, Frame::binding_count),
        }
    }

    // Reading

    fn parser<'t>(&self, text: &'t str) -> Parser<'t> {
        Parser::new(text)
            .max_symbol_length(self.config.max_symbol_length)
            .max_list_elements(self.config.max_list_elements)
            .max_depth(self.config.max_read_depth)
    }

    /// Reads the first expression in `text` into the heap.
    ///
    /// # Errors
    ///
    /// The reader's error; nothing is evaluated.
    pub fn read(&mut self, text: &str) -> Result<Value, ParseError> {
        self.parser(text)
            .parse(&mut self.heap)
            .inspect_err(|err| debug!("parse failed: {err}"))
    }

    /// Reads every expression in `text`.
    ///
    /// # Errors
    ///
    /// The first reader error. Expressions before it stay on the heap.
    pub fn read_all(&mut self, text: &str) -> Result<Vec<Value>, ParseError> {
        self.parser(text)
            .parse_all(&mut self.heap)
            .inspect_err(|err| debug!("parse failed: {err}"))
    }

    /// Reads and evaluates each expression of `text` in turn, returning the
    /// last value (`()` for text with no expressions).
    ///
    /// # Errors
    ///
    /// Stops at the first reader error; earlier expressions have already
    /// been evaluated.
    pub fn eval_str(&mut self, text: &str) -> Result<Value, ParseError> {
        let mut parser = self.parser(text);
        let mut last = Value::Nil;
        while parser.has_more() {
            let expr = parser.parse(&mut self.heap)?;
            last = self.eval_global(expr);
        }
        Ok(last)
    }

    // Printing cycle

    /// One read-eval-print step over a line of input.
    ///
    /// An empty line does nothing and returns `Ok(None)`. Otherwise one
    /// expression is read. On a reader error `sink` receives
    /// `Parse error: Line L, column C: message` and the error is returned.
    /// On success the expression is evaluated globally, each diagnostic is
    /// written on its own line, then the result and a newline.
    ///
    /// # Errors
    ///
    /// The reader error, after it has been written to `sink`.
    pub fn rep(
        &mut self,
        line: &str,
        sink: &mut impl Sink,
    ) -> Result<Option<Value>, ParseError> {
        if line.is_empty() {
            return Ok(None);
        }
        let expr = match self.read(line) {
            Ok(expr) => expr,
            Err(err) => {
                write_parse_error(&err, sink);
                return Err(err);
            }
        };
        let value = self.eval_global(expr);
        self.print_outcome(value, sink);
        Ok(Some(value))
    }

    /// Evaluates every expression of `text` in turn, printing each result
    /// the way [`rep`](Self::rep) does. Returns how many were evaluated.
    ///
    /// # Errors
    ///
    /// Stops at the first reader error, which is written to `sink` as in
    /// [`rep`](Self::rep).
    pub fn load(&mut self, text: &str, sink: &mut impl Sink) -> Result<usize, ParseError> {
        let mut parser = self.parser(text);
        let mut count = 0;
        while parser.has_more() {
            let expr = match parser.parse(&mut self.heap) {
                Ok(expr) => expr,
                Err(err) => {
                    debug!("parse failed: {err}");
                    write_parse_error(&err, sink);
                    return Err(err);
                }
            };
            let value = self.eval_global(expr);
            self.print_outcome(value, sink);
            count += 1;
        }
        Ok(count)
    }

    fn print_outcome(&mut self, value: Value, sink: &mut impl Sink) {
        for diagnostic in self.take_diagnostics() {
            sink.emit_str(&diagnostic.to_string());
            sink.emit_char('\n');
        }
        self.print(value, sink);
        sink.emit_char('\n');
    }

    // Diagnostics

    /// Diagnostics recorded since the last [`take_diagnostics`](Self::take_diagnostics).
    #[must_use]
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Removes and returns the recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Records a diagnostic. A resource-exhaustion condition is recorded
    /// once until the diagnostics are taken.
    pub(crate) fn report(&mut self, err: Error) {
        if err.is_resource_exhaustion() {
            if self.diagnostics.contains(&err) {
                return;
            }
            warn!("{err}");
        } else {
            debug!("{err}");
        }
        self.diagnostics.push(err);
    }

    // Construction

    /// Stores `object`, or records [`Error::HeapExhausted`] and yields `()`.
    pub(crate) fn alloc(&mut self, object: Object) -> Value {
        self.heap.alloc(object).unwrap_or_else(|err| {
            self.report(err);
            Value::Nil
        })
    }

    /// A new integer object; `()` if the heap is full.
    pub fn integer(&mut self, n: i32) -> Value {
        self.alloc(Object::Integer(n))
    }

    /// A new symbol object for `name`; `()` if the heap or symbol table is
    /// full.
    pub fn symbol(&mut self, name: &str) -> Value {
        match self.intern(name) {
            Some(sym) => self.alloc(Object::Symbol(sym)),
            None => Value::Nil,
        }
    }

    /// A new pair; `()` if the heap is full.
    pub fn cons(&mut self, car: Value, cdr: Value) -> Value {
        self.alloc(Object::Cons(car, cdr))
    }

    /// A proper list of `items`; `()` if the heap cannot hold every pair.
    pub fn list(&mut self, items: &[Value]) -> Value {
        items
            .iter()
            .rev()
            .fold(Value::Nil, |tail, &item| self.cons(item, tail))
    }

    // Inspection

    /// First half of a pair; `()` for anything else.
    #[must_use]
    pub fn car(&self, value: Value) -> Value {
        self.heap.car(value)
    }

    /// Second half of a pair; `()` for anything else.
    #[must_use]
    pub fn cdr(&self, value: Value) -> Value {
        self.heap.cdr(value)
    }

    /// The integer in `value`, if it is one.
    #[must_use]
    pub fn as_integer(&self, value: Value) -> Option<i32> {
        self.heap.as_integer(value)
    }

    /// The symbol in `value`, if it is one.
    #[must_use]
    pub fn as_symbol(&self, value: Value) -> Option<Symbol> {
        self.heap.as_symbol(value)
    }

    /// Type tag of `value`.
    #[must_use]
    pub fn kind_of(&self, value: Value) -> Kind {
        self.heap.kind_of(value)
    }

    /// Elements of a list.
    pub fn iter_list(&self, list: Value) -> impl Iterator<Item = Value> + '_ {
        self.heap.iter_list(list)
    }

    // Symbols and environments

    /// Interns `name`, or records [`Error::SymbolTableFull`] and returns
    /// `None`.
    pub fn intern(&mut self, name: &str) -> Option<Symbol> {
        self.heap.intern(name).inspect_err(|err| self.report(err.clone())).ok()
    }

    /// Canonical text of `sym`.
    #[must_use]
    pub fn symbol_name(&self, sym: Symbol) -> Option<&str> {
        self.heap.symbol_name(sym)
    }

    /// A new frame whose parent is `parent`, or `None` (with
    /// [`Error::EnvironmentPoolExhausted`] recorded) if the pool is used up.
    pub fn create_env(&mut self, parent: Option<EnvRef>) -> Option<EnvRef> {
        self.envs
            .create(parent)
            .inspect_err(|err| self.report(err.clone()))
            .ok()
    }

    /// Binds `name` in `env`. If `name` cannot be interned, the frame is
    /// full or `env` is stale the definition is dropped and the reason
    /// recorded.
    pub fn define(&mut self, env: EnvRef, name: &str, value: Value) {
        let Some(sym) = self.intern(name) else {
            return;
        };
        if let Err(err) = self.envs.define(env, sym, value) {
            self.report(err);
        }
    }

    /// Binds `name` in the global environment. See [`define`](Self::define).
    pub fn define_global(&mut self, name: &str, value: Value) {
        let global = self.global();
        self.define(global, name, value);
    }

    /// Installs a native procedure under `name` in the global environment.
    pub fn define_builtin(&mut self, name: &'static str, func: BuiltinFn) {
        let builtin = self.alloc(Object::Builtin(Builtin { name, func }));
        if !builtin.is_nil() {
            self.define_global(name, builtin);
        }
    }

    /// The innermost binding of `name` visible from `env`.
    #[must_use]
    pub fn lookup(&self, env: EnvRef, name: &str) -> Option<Value> {
        let sym = self.heap.lookup_symbol(name)?;
        self.envs.lookup(env, sym)
    }

    /// The environment pool.
    #[must_use]
    pub fn environments(&self) -> &Environments {
        &self.envs
    }

    /// The object heap.
    #[must_use]
    pub fn heap(&self) -> &Heap {
        &self.heap
    }
}

fn write_parse_error(err: &ParseError, sink: &mut impl Sink) {
    sink.emit_str("Parse error: ");
    sink.emit_str(&err.to_string());
    sink.emit_char('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use monad_syntax::ParseErrorKind;

    #[test]
    fn test_primitives_installed() {
        let interp = Interpreter::default();
        let global = interp.global();
        for (name, _) in PRIMITIVES {
            let value = interp.lookup(global, name).unwrap();
            assert_eq!(interp.kind_of(value), Kind::Builtin, "{name}");
        }
        assert_eq!(interp.stats().heap.allocated, PRIMITIVES.len());
    }

    #[test]
    fn test_rep_prints_result() {
        let mut interp = Interpreter::default();
        let mut out = String::new();
        let value = interp.rep("(+ 1 2)", &mut out).unwrap();
        assert_eq!(out, "3\n");
        assert_eq!(value.and_then(|v| interp.as_integer(v)), Some(3));
    }

    #[test]
    fn test_rep_empty_line_is_skipped() {
        let mut interp = Interpreter::default();
        let mut out = String::new();
        assert_eq!(interp.rep("", &mut out), Ok(None));
        assert!(out.is_empty());
    }

    #[test]
    fn test_rep_parse_error_format() {
        let mut interp = Interpreter::default();
        let mut out = String::new();
        let err = interp.rep("(+ 1", &mut out).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
        assert_eq!(out, "Parse error: Line 1, column 5: Unmatched '('\n");

        out.clear();
        interp.rep("  ", &mut out).unwrap_err();
        assert_eq!(out, "Parse error: Line 1, column 3: Empty input\n");
    }

    #[test]
    fn test_rep_reads_one_expression() {
        let mut interp = Interpreter::default();
        let mut out = String::new();
        interp.rep("1 2", &mut out).unwrap();
        assert_eq!(out, "1\n");
    }

    #[test]
    fn test_load_prints_every_result() {
        let mut interp = Interpreter::default();
        let mut out = String::new();
        let count = interp
            .load("(define x 2)\n; comment\n(* x x)\nzz", &mut out)
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(out, "2\n4\nUndefined variable: zz\n()\n");
    }

    #[test]
    fn test_load_stops_at_parse_error() {
        let mut interp = Interpreter::default();
        let mut out = String::new();
        let err = interp.load("(define x 1)\n(x))", &mut out).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
        assert_eq!(
            out,
            "1\nNot a function: integer\n()\nParse error: Line 2, column 4: Unexpected ')'\n"
        );
    }

    #[test]
    fn test_read_all() {
        let mut interp = Interpreter::default();
        let forms = interp.read_all("a (b) 3").unwrap();
        let printed: Vec<_> = forms.iter().map(|&v| interp.display(v)).collect();
        assert_eq!(printed, vec!["a", "(b)", "3"]);
        assert!(interp.read_all("(").is_err());
    }

    #[test]
    fn test_reader_uses_configured_limits() {
        let mut interp = Interpreter::new(Config::default().with_max_symbol_length(4));
        assert_eq!(
            interp.read("abcde").unwrap_err().kind,
            ParseErrorKind::SymbolTooLong
        );

        let mut interp = Interpreter::new(Config::default().with_max_list_elements(2));
        assert_eq!(
            interp.read("(1 2 3)").unwrap_err().kind,
            ParseErrorKind::AllocFailed
        );

        let mut interp = Interpreter::new(Config::default().with_max_read_depth(3));
        assert!(interp.read("(a '(b))").is_ok());
        assert_eq!(
            interp.read("(a '((b)))").unwrap_err().kind,
            ParseErrorKind::TooDeep
        );
    }

    #[test]
    fn test_reset_forgets_definitions() {
        let mut interp = Interpreter::default();
        interp.eval_str("(define x 1)").unwrap();
        interp.reset();
        assert_eq!(interp.lookup(interp.global(), "x"), None);
        assert!(interp.lookup(interp.global(), "car").is_some());
        assert_eq!(interp.stats().environments.allocated, 1);
    }

    #[test]
    fn test_define_in_environment_from_before_reset() {
        let mut interp = Interpreter::default();
        let global = interp.global();
        let scope = interp.create_env(Some(global)).unwrap();
        interp.reset();

        let one = interp.integer(1);
        interp.define(scope, "x", one);
        assert_eq!(
            interp.take_diagnostics(),
            vec![Error::UnknownEnvironment { index: 1 }]
        );
        assert_eq!(interp.lookup(interp.global(), "x"), None);
    }

    #[test]
    fn test_define_and_lookup_by_name() {
        let mut interp = Interpreter::default();
        let global = interp.global();
        let seven = interp.integer(7);
        interp.define_global("seven", seven);
        assert_eq!(interp.lookup(global, "seven"), Some(seven));

        let child = interp.create_env(Some(global)).unwrap();
        let eight = interp.integer(8);
        interp.define(child, "seven", eight);
        assert_eq!(interp.lookup(child, "seven"), Some(eight));
        assert_eq!(interp.lookup(global, "seven"), Some(seven));
    }

    #[test]
    fn test_symbol_table_full_drops_definition() {
        let mut interp = Interpreter::new(Config::default().with_symbol_capacity(PRIMITIVES.len()));
        let one = interp.integer(1);
        interp.define_global("extra", one);
        assert_eq!(interp.lookup(interp.global(), "extra"), None);
        assert_eq!(
            interp.take_diagnostics(),
            vec![Error::SymbolTableFull {
                capacity: PRIMITIVES.len()
            }]
        );
    }

    #[test]
    fn test_stats_display() {
        let interp = Interpreter::new(Config::default().with_heap_capacity(100));
        let text = interp.stats().to_string();
        assert!(text.starts_with("heap:         8/100 objects"));
        assert!(text.contains("environments: 1/128 frames"));
        assert!(text.ends_with("globals:      8 bindings"));
    }
}
