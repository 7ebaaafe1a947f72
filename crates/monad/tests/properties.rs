//! Observable language properties, checked end to end.

mod common;

use common::{eval, eval_in};
use monad::{Error, Interpreter, Kind, Value};

#[test]
fn interning_is_canonical() {
    let mut interp = Interpreter::default();
    let a = interp.intern("alpha").unwrap();
    let b = interp.intern("alpha").unwrap();
    let c = interp.intern("beta").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interp.symbol_name(c), Some("beta"));
}

#[test]
fn long_names_are_truncated_to_the_same_symbol() {
    let mut interp = Interpreter::default();
    let base = "n".repeat(64);
    let a = interp.intern(&format!("{base}a")).unwrap();
    let b = interp.intern(&format!("{base}b")).unwrap();
    assert_eq!(a, b);
    assert_eq!(interp.symbol_name(a), Some(base.as_str()));
}

#[test]
fn integers_print_as_read() {
    let mut interp = Interpreter::default();
    for text in ["42", "-7", "0", "2147483647", "-2147483647"] {
        let value = interp.read(text).unwrap();
        assert_eq!(interp.kind_of(value), Kind::Integer);
        assert_eq!(interp.display(value), text);
    }
}

#[test]
fn dotted_pair_round_trips() {
    let mut interp = Interpreter::default();
    let pair = interp.read("(1 . 2)").unwrap();
    assert_eq!(interp.as_integer(interp.car(pair)), Some(1));
    assert_eq!(interp.as_integer(interp.cdr(pair)), Some(2));
    assert_eq!(interp.display(pair), "(1 . 2)");
}

#[test]
fn quote_shorthand_matches_long_form() {
    let mut interp = Interpreter::default();
    let short = interp.read("'(a b)").unwrap();
    let long = interp.read("(quote (a b))").unwrap();
    assert_eq!(interp.display(short), interp.display(long));
    assert_eq!(eval("'(a b)"), eval("(quote (a b))"));
}

#[test]
fn child_definitions_do_not_leak_into_parent() {
    let mut interp = Interpreter::default();
    let global = interp.global();
    let child = interp.create_env(Some(global)).unwrap();

    let one = interp.integer(1);
    interp.define(child, "x", one);
    assert_eq!(interp.lookup(child, "x"), Some(one));
    assert_eq!(interp.lookup(global, "x"), None);
}

#[test]
fn arithmetic() {
    assert_eq!(eval("(+ 1 2 3)"), "6");
    assert_eq!(eval("(- 5)"), "-5");
    assert_eq!(eval("(- 5 2 1)"), "2");
    assert_eq!(eval("(*)"), "1");
    assert_eq!(eval("(+)"), "0");
}

#[test]
fn equality() {
    assert_eq!(eval("(= 1 1 1)"), "#t");
    assert_eq!(eval("(= 1 2)"), "#f");
}

#[test]
fn zero_is_true() {
    assert_eq!(eval("(if 0 'then 'else)"), "then");
    assert_eq!(eval("(if #f 'then 'else)"), "else");
}

#[test]
fn closures_use_the_captured_environment() {
    assert_eq!(eval("((lambda (x) (+ x 1)) 5)"), "6");

    let mut interp = Interpreter::default();
    eval_in(&mut interp, "(define k 10)");
    eval_in(&mut interp, "(define get-k (lambda () k))");
    eval_in(
        &mut interp,
        "(define make (lambda (k) (lambda () k)))",
    );
    eval_in(&mut interp, "(define get-one (make 1))");

    // The caller binds its own `k`; neither closure sees it.
    assert_eq!(eval_in(&mut interp, "((lambda (k) (get-k)) 99)"), "10");
    assert_eq!(eval_in(&mut interp, "((lambda (k) (get-one)) 99)"), "1");
    assert!(interp.diagnostics().is_empty());
}

#[test]
fn undefined_variable_yields_nil_and_continues() {
    let mut interp = Interpreter::default();
    let value = interp
        .eval_str("((lambda () (define a nope) (list a 2)))")
        .unwrap();
    assert_eq!(interp.display(value), "(() 2)");
    assert_eq!(
        interp.take_diagnostics(),
        vec![Error::UndefinedVariable {
            name: "nope".into()
        }]
    );
}

#[test]
fn singletons_are_shared() {
    let mut interp = Interpreter::default();
    let a = interp.eval_str("(= 1 1)").unwrap();
    let b = interp.eval_str("#t").unwrap();
    assert_eq!(a, b);
    assert_eq!(a, Value::TRUE);
    assert_eq!(interp.eval_str("nil").unwrap(), Value::Nil);
    assert_eq!(interp.eval_str("'()").unwrap(), Value::Nil);
}

#[test]
fn lists_share_structure() {
    let mut interp = Interpreter::default();
    eval_in(&mut interp, "(define tail '(2 3))");
    eval_in(&mut interp, "(define whole (cons 1 tail))");
    let tail = interp.eval_str("tail").unwrap();
    let whole = interp.eval_str("whole").unwrap();
    assert_eq!(interp.cdr(whole), tail);
}
