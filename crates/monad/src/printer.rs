//! Textual rendering of values.

use crate::heap::Heap;
use crate::interpreter::Interpreter;
use crate::sink::Sink;
use crate::value::{Object, Value};

impl Interpreter {
    /// Writes `value` to `sink`.
    ///
    /// | value        | output                        |
    /// |--------------|-------------------------------|
    /// | `()`         | `()`                          |
    /// | booleans     | `#t` / `#f`                   |
    /// | integers     | decimal                       |
    /// | symbols      | their name                    |
    /// | lists        | `(a b c)`, `(a b . c)`        |
    /// | closures     | `<lambda>`                    |
    /// | builtins     | `<builtin>`                   |
    pub fn print(&self, value: Value, sink: &mut impl Sink) {
        write_value(&self.heap, value, sink);
    }

    /// Renders `value` to a new string.
    ///
    /// ```
    /// use monad::Interpreter;
    ///
    /// let mut interp = Interpreter::default();
    /// let value = interp.eval_str("(cons 1 (cons 2 3))").unwrap();
    /// assert_eq!(interp.display(value), "(1 2 . 3)");
    /// ```
    #[must_use]
    pub fn display(&self, value: Value) -> String {
        let mut out = String::new();
        self.print(value, &mut out);
        out
    }
}

fn write_value(heap: &Heap, value: Value, sink: &mut impl Sink) {
    let object = match value {
        Value::Nil => return sink.emit_str("()"),
        Value::Bool(true) => return sink.emit_str("#t"),
        Value::Bool(false) => return sink.emit_str("#f"),
        Value::Ref(obj) => heap.get(obj),
    };

    match object {
        Some(Object::Integer(n)) => write_integer(*n, sink),
        Some(Object::Symbol(sym)) => sink.emit_str(heap.symbol_name(*sym).unwrap_or("<symbol?>")),
        Some(Object::Cons(..)) => write_list(heap, value, sink),
        Some(Object::Closure(_)) => sink.emit_str("<lambda>"),
        Some(Object::Builtin(_)) => sink.emit_str("<builtin>"),
        None => sink.emit_str("<?>"),
    }
}

fn write_list(heap: &Heap, list: Value, sink: &mut impl Sink) {
    sink.emit_char('(');
    let mut items = heap.iter_list(list);
    if let Some(first) = items.next() {
        write_value(heap, first, sink);
    }
    for item in items.by_ref() {
        sink.emit_char(' ');
        write_value(heap, item, sink);
    }
    let tail = items.tail();
    if !tail.is_nil() {
        sink.emit_str(" . ");
        write_value(heap, tail, sink);
    }
    sink.emit_char(')');
}

/// Decimal digits without going through an allocation. `unsigned_abs` keeps
/// `i32::MIN` exact.
fn write_integer(n: i32, sink: &mut impl Sink) {
    let mut digits = [0u8; 10];
    let mut len = 0;
    let mut magnitude = n.unsigned_abs();
    loop {
        digits[len] = b'0' + (magnitude % 10) as u8;
        len += 1;
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }

    if n < 0 {
        sink.emit_char('-');
    }
    for &digit in digits[..len].iter().rev() {
        sink.emit_char(char::from(digit));
    }
}
