//! Character output.
//!
//! The interpreter produces text only through a [`Sink`]. A kernel console
//! implements [`Sink::emit_char`] over its framebuffer; hosted code uses
//! `String` or [`IoSink`].

use std::io;

/// Destination for interpreter output.
pub trait Sink {
    /// Emits one character.
    fn emit_char(&mut self, c: char);

    /// Emits a string. Defaults to one [`emit_char`](Self::emit_char) per
    /// character.
    fn emit_str(&mut self, s: &str) {
        for c in s.chars() {
            self.emit_char(c);
        }
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn emit_char(&mut self, c: char) {
        (**self).emit_char(c);
    }

    fn emit_str(&mut self, s: &str) {
        (**self).emit_str(s);
    }
}

impl Sink for String {
    fn emit_char(&mut self, c: char) {
        self.push(c);
    }

    fn emit_str(&mut self, s: &str) {
        self.push_str(s);
    }
}

/// A [`Sink`] over any [`io::Write`].
///
/// `Sink` methods cannot fail, so the first I/O error is kept, later output
/// is dropped, and [`finish`](Self::finish) reports it.
///
/// ```
/// use monad::{IoSink, Sink};
///
/// let mut sink = IoSink::new(Vec::new());
/// sink.emit_str("(1 2)");
/// sink.emit_char('\n');
/// assert_eq!(sink.finish().unwrap(), b"(1 2)\n");
/// ```
#[derive(Debug)]
pub struct IoSink<W: io::Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: io::Write> IoSink<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Flushes the writer.
    ///
    /// # Errors
    ///
    /// The first write error seen, or the flush error.
    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()
    }

    /// Flushes and returns the writer.
    ///
    /// # Errors
    ///
    /// The first write error seen, or the flush error.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

impl<W: io::Write> Sink for IoSink<W> {
    fn emit_char(&mut self, c: char) {
        let mut buf = [0; 4];
        self.emit_str(c.encode_utf8(&mut buf));
    }

    fn emit_str(&mut self, s: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.writer.write_all(s.as_bytes()) {
            self.error = Some(err);
        }
    }
}
