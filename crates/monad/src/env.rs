//! Lexical environments.
//!
//! Frames come from a fixed pool and are never returned to it: every closure
//! call takes a fresh frame for the lifetime of the interpreter. The pool
//! size is therefore a hard limit on the total number of closure calls, not
//! just on recursion depth.
//!
//! Slot 0 is always the global frame.

use crate::error::{Error, Result};
use crate::value::Value;
use monad_mem::{ArenaStats, FixedArena, Handle, Symbol};

/// Handle to a frame in the pool.
pub type EnvRef = Handle<Frame>;

/// One scope: bindings plus a link to the enclosing scope.
#[derive(Debug, Clone)]
pub struct Frame {
    bindings: Vec<(Symbol, Value)>,
    parent: Option<EnvRef>,
}

impl Frame {
    fn new(parent: Option<EnvRef>) -> Self {
        Self {
            bindings: Vec::new(),
            parent,
        }
    }

    /// The enclosing frame, `None` for the global frame.
    #[must_use]
    pub fn parent(&self) -> Option<EnvRef> {
        self.parent
    }

    /// Number of bindings in this frame alone.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    fn get(&self, sym: Symbol) -> Option<Value> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == sym)
            .map(|&(_, value)| value)
    }
}

/// The frame pool.
#[derive(Debug)]
pub struct Environments {
    frames: FixedArena<Frame>,
    global: EnvRef,
    frame_capacity: usize,
}

impl Environments {
    /// Creates a pool of `capacity` frames (at least one) holding the global
    /// frame. Each frame can hold `frame_capacity` bindings.
    #[must_use]
    pub fn new(capacity: usize, frame_capacity: usize) -> Self {
        let (frames, global) = FixedArena::with_root(capacity, Frame::new(None));
        Self {
            frames,
            global,
            frame_capacity,
        }
    }

    /// The global frame.
    #[must_use]
    pub fn global(&self) -> EnvRef {
        self.global
    }

    /// Takes a new, empty frame whose parent is `parent`.
    ///
    /// # Errors
    ///
    /// [`Error::EnvironmentPoolExhausted`] when the pool is used up.
    pub fn create(&mut self, parent: Option<EnvRef>) -> Result<EnvRef> {
        self.frames
            .alloc(Frame::new(parent))
            .map_err(|full| Error::EnvironmentPoolExhausted {
                capacity: full.capacity,
            })
    }

    /// Binds `sym` in `env` itself, never in an ancestor. An existing binding
    /// in `env` is overwritten in place.
    ///
    /// # Errors
    ///
    /// [`Error::FrameFull`] if `sym` is new to `env` and the frame is full,
    /// [`Error::UnknownEnvironment`] if `env` is not a frame of this pool.
    pub fn define(&mut self, env: EnvRef, sym: Symbol, value: Value) -> Result<()> {
        let capacity = self.frame_capacity;
        let Some(frame) = self.frames.get_mut(env) else {
            return Err(Error::UnknownEnvironment { index: env.index() });
        };

        if let Some(slot) = frame.bindings.iter_mut().find(|(bound, _)| *bound == sym) {
            slot.1 = value;
            return Ok(());
        }
        if frame.bindings.len() >= capacity {
            return Err(Error::FrameFull { capacity });
        }
        frame.bindings.push((sym, value));
        Ok(())
    }

    /// Finds the innermost binding of `sym`, starting at `env`.
    #[must_use]
    pub fn lookup(&self, env: EnvRef, sym: Symbol) -> Option<Value> {
        let mut current = Some(env);
        while let Some(env) = current {
            let frame = self.frames.get(env)?;
            if let Some(value) = frame.get(sym) {
                return Some(value);
            }
            current = frame.parent;
        }
        None
    }

    /// Looks `sym` up in `env` only.
    #[must_use]
    pub fn lookup_local(&self, env: EnvRef, sym: Symbol) -> Option<Value> {
        self.frames.get(env)?.get(sym)
    }

    /// The frame behind `env`.
    #[must_use]
    pub fn frame(&self, env: EnvRef) -> Option<&Frame> {
        self.frames.get(env)
    }

    /// Frame pool counters.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        self.frames.stats()
    }

    /// Discards every frame and starts over with an empty global frame.
    pub fn reset(&mut self) {
        *self = Self::new(self.frames.capacity(), self.frame_capacity);
    }
}
