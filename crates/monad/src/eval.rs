//! Tree-walking evaluator.
//!
//! # Rules
//!
//! - `()`, booleans and integers evaluate to themselves.
//! - A symbol evaluates to its innermost binding.
//! - A pair whose head is `()` evaluates to itself.
//! - A pair headed by `quote`, `define`, `lambda` or `if` is a special form,
//!   checked in that order.
//! - Any other pair is an application: the head is evaluated, then each
//!   argument left to right, then the procedure is applied.
//!
//! Errors are recorded on the interpreter and the failing expression yields
//! `()`. Exceeding the depth limit is different: it abandons the rest of the
//! current top-level evaluation, since everything above it would only
//! produce follow-on errors.
//!
//! There is no tail-call elimination.

use crate::env::EnvRef;
use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::value::{Closure, Object, Value};
use monad_log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialForm {
    Quote,
    Define,
    Lambda,
    If,
}

impl SpecialForm {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "quote" => Some(Self::Quote),
            "define" => Some(Self::Define),
            "lambda" => Some(Self::Lambda),
            "if" => Some(Self::If),
            _ => None,
        }
    }
}

impl Interpreter {
    /// Evaluates `expr` in `env`.
    ///
    /// Never fails: problems are recorded as [`diagnostics`](Self::diagnostics)
    /// and the offending subexpression evaluates to `()`.
    pub fn eval(&mut self, expr: Value, env: EnvRef) -> Value {
        if self.depth == 0 {
            self.unwinding = false;
        }
        self.evaluate(expr, env)
    }

    /// Evaluates `expr` in the global environment.
    pub fn eval_global(&mut self, expr: Value) -> Value {
        let global = self.global();
        self.eval(expr, global)
    }

    /// Applies `procedure` to an already-evaluated argument list.
    pub fn apply(&mut self, procedure: Value, args: Value, env: EnvRef) -> Value {
        match self.heap.object(procedure).copied() {
            Some(Object::Builtin(builtin)) => {
                trace!("apply builtin {}", builtin.name);
                (builtin.func)(self, args, env)
            }
            Some(Object::Closure(closure)) => {
                trace!("apply closure");
                self.apply_closure(closure, args)
            }
            _ if procedure.is_nil() => {
                self.report(Error::ApplyNil);
                Value::Nil
            }
            _ => {
                let kind = self.heap.kind_of(procedure);
                self.report(Error::NotAProcedure { kind });
                Value::Nil
            }
        }
    }

    fn evaluate(&mut self, expr: Value, env: EnvRef) -> Value {
        if self.unwinding {
            return Value::Nil;
        }
        let limit = self.config().max_eval_depth;
        if self.depth >= limit {
            self.unwinding = true;
            self.report(Error::RecursionLimit { depth: limit });
            return Value::Nil;
        }

        self.depth += 1;
        let value = self.dispatch(expr, env);
        self.depth -= 1;
        value
    }

    fn dispatch(&mut self, expr: Value, env: EnvRef) -> Value {
        match self.heap.object(expr).copied() {
            Some(Object::Symbol(sym)) => match self.envs.lookup(env, sym) {
                Some(value) => value,
                None => {
                    let name = self.symbol_name(sym).unwrap_or("<symbol?>").to_owned();
                    self.report(Error::UndefinedVariable { name });
                    Value::Nil
                }
            },
            Some(Object::Cons(head, rest)) => self.eval_pair(expr, head, rest, env),
            _ => expr,
        }
    }

    fn eval_pair(&mut self, expr: Value, head: Value, rest: Value, env: EnvRef) -> Value {
        if head.is_nil() {
            return expr;
        }

        let form = self
            .heap
            .as_symbol(head)
            .and_then(|sym| self.symbol_name(sym))
            .and_then(SpecialForm::from_name);
        match form {
            Some(SpecialForm::Quote) => self.heap.car(rest),
            Some(SpecialForm::Define) => self.eval_define(rest, env),
            Some(SpecialForm::Lambda) => self.eval_lambda(rest, env),
            Some(SpecialForm::If) => self.eval_if(rest, env),
            None => self.eval_application(head, rest, env),
        }
    }

    fn eval_define(&mut self, rest: Value, env: EnvRef) -> Value {
        let target = self.heap.car(rest);
        let Some(sym) = self.heap.as_symbol(target) else {
            self.report(Error::MalformedSpecialForm {
                form: "define",
                reason: "first argument must be a symbol",
            });
            return Value::Nil;
        };

        let value_expr = self.heap.car(self.heap.cdr(rest));
        let value = self.evaluate(value_expr, env);
        if self.unwinding {
            return Value::Nil;
        }

        if let Err(err) = self.envs.define(env, sym, value) {
            self.report(err);
        } else if env == self.global() {
            debug!("define {}", self.symbol_name(sym).unwrap_or("<symbol?>"));
        }
        value
    }

    fn eval_lambda(&mut self, rest: Value, env: EnvRef) -> Value {
        let closure = Closure {
            params: self.heap.car(rest),
            body: self.heap.cdr(rest),
            env,
        };
        self.alloc(Object::Closure(closure))
    }

    fn eval_if(&mut self, rest: Value, env: EnvRef) -> Value {
        let condition = self.evaluate(self.heap.car(rest), env);
        if self.unwinding {
            return Value::Nil;
        }

        let branches = self.heap.cdr(rest);
        let branch = if condition.is_truthy() {
            self.heap.car(branches)
        } else {
            self.heap.car(self.heap.cdr(branches))
        };
        self.evaluate(branch, env)
    }

    fn eval_application(&mut self, head: Value, rest: Value, env: EnvRef) -> Value {
        let procedure = self.evaluate(head, env);
        if self.unwinding {
            return Value::Nil;
        }
        if procedure.is_nil() {
            self.report(Error::ApplyNil);
            return Value::Nil;
        }

        let mut args = Vec::new();
        let mut remaining = rest;
        while let Some((arg, next)) = self.heap.pair(remaining) {
            args.push(self.evaluate(arg, env));
            remaining = next;
        }
        if self.unwinding {
            return Value::Nil;
        }

        let args = self.list(&args);
        self.apply(procedure, args, env)
    }

    /// Binds parameters positionally in a fresh frame chained to the
    /// closure's environment. Extra arguments are ignored and missing ones
    /// stay unbound.
    fn apply_closure(&mut self, closure: Closure, args: Value) -> Value {
        let frame = match self.envs.create(Some(closure.env)) {
            Ok(frame) => frame,
            Err(err) => {
                self.report(err);
                return Value::Nil;
            }
        };

        let mut params = closure.params;
        let mut args = args;
        while let (Some((param, next_param)), Some((arg, next_arg))) =
            (self.heap.pair(params), self.heap.pair(args))
        {
            if let Some(sym) = self.heap.as_symbol(param)
                && let Err(err) = self.envs.define(frame, sym, arg)
            {
                self.report(err);
            }
            params = next_param;
            args = next_arg;
        }

        self.eval_body(closure.body, frame)
    }

    fn eval_body(&mut self, body: Value, env: EnvRef) -> Value {
        let mut result = Value::Nil;
        let mut remaining = body;
        while let Some((expr, next)) = self.heap.pair(remaining) {
            result = self.evaluate(expr, env);
            remaining = next;
        }
        result
    }
}
