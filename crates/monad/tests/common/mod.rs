//! Helpers shared by the integration tests.

#![allow(dead_code)]

use monad::{Config, Interpreter};

/// Evaluates `source` in a fresh default interpreter and prints the result.
pub fn eval(source: &str) -> String {
    let mut interp = Interpreter::default();
    eval_in(&mut interp, source)
}

/// Evaluates `source` in `interp` and prints the result.
pub fn eval_in(interp: &mut Interpreter, source: &str) -> String {
    let value = interp
        .eval_str(source)
        .unwrap_or_else(|err| panic!("parse error in {source:?}: {err}"));
    interp.display(value)
}

/// Feeds each line through the REPL step and returns everything printed.
pub fn session(interp: &mut Interpreter, lines: &[&str]) -> String {
    let mut out = String::new();
    for line in lines {
        let _ = interp.rep(line, &mut out);
    }
    out
}

/// A tiny interpreter for exhaustion tests.
pub fn small(heap: usize, envs: usize) -> Interpreter {
    Interpreter::new(
        Config::default()
            .with_heap_capacity(heap)
            .with_env_capacity(envs),
    )
}
