//! Primitive procedures.
//!
//! Arithmetic wraps on overflow and skips arguments that are not integers.

use crate::env::EnvRef;
use crate::interpreter::Interpreter;
use crate::value::{BuiltinFn, Kind, Value};

/// Every primitive with the name it is installed under.
pub const PRIMITIVES: [(&str, BuiltinFn); 8] = [
    ("+", add),
    ("-", subtract),
    ("*", multiply),
    ("=", equal),
    ("cons", cons),
    ("car", car),
    ("cdr", cdr),
    ("list", list),
];

fn add(interp: &mut Interpreter, args: Value, _env: EnvRef) -> Value {
    let heap = &interp.heap;
    let sum = heap
        .iter_list(args)
        .filter_map(|arg| heap.as_integer(arg))
        .fold(0, i32::wrapping_add);
    interp.integer(sum)
}

/// `(- x)` negates; `(- x y ...)` subtracts left to right. With no arguments,
/// or a first argument that is not an integer, the result is 0.
fn subtract(interp: &mut Interpreter, args: Value, _env: EnvRef) -> Value {
    let heap = &interp.heap;
    let mut rest = heap.iter_list(args).peekable();
    let result = match rest.next().and_then(|first| heap.as_integer(first)) {
        None => 0,
        Some(first) if rest.peek().is_none() => first.wrapping_neg(),
        Some(first) => rest
            .filter_map(|arg| heap.as_integer(arg))
            .fold(first, i32::wrapping_sub),
    };
    interp.integer(result)
}

fn multiply(interp: &mut Interpreter, args: Value, _env: EnvRef) -> Value {
    let heap = &interp.heap;
    let product = heap
        .iter_list(args)
        .filter_map(|arg| heap.as_integer(arg))
        .fold(1, i32::wrapping_mul);
    interp.integer(product)
}

/// True when every argument has the first one's type and, for integers, its
/// value. Other types compare by type alone.
fn equal(interp: &mut Interpreter, args: Value, _env: EnvRef) -> Value {
    let heap = &interp.heap;
    let mut items = heap.iter_list(args);
    let Some(first) = items.next() else {
        return Value::TRUE;
    };
    let kind = heap.kind_of(first);
    let number = heap.as_integer(first);

    Value::from(items.all(|arg| {
        heap.kind_of(arg) == kind && (kind != Kind::Integer || heap.as_integer(arg) == number)
    }))
}

fn cons(interp: &mut Interpreter, args: Value, _env: EnvRef) -> Value {
    if !interp.heap.is_pair(args) {
        return Value::Nil;
    }
    let car = interp.heap.car(args);
    let cdr = interp.heap.car(interp.heap.cdr(args));
    interp.cons(car, cdr)
}

fn car(interp: &mut Interpreter, args: Value, _env: EnvRef) -> Value {
    interp.heap.car(interp.heap.car(args))
}

fn cdr(interp: &mut Interpreter, args: Value, _env: EnvRef) -> Value {
    interp.heap.cdr(interp.heap.car(args))
}

fn list(_interp: &mut Interpreter, args: Value, _env: EnvRef) -> Value {
    args
}
