//! Interpreter sizing.

use monad_log::warn;
use monad_mem::{DEFAULT_MAX_SYMBOL_LENGTH, DEFAULT_SYMBOL_CAPACITY};
use monad_syntax::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_LIST_ELEMENTS};

/// Reference sizing: objects in the heap.
pub const DEFAULT_HEAP_CAPACITY: usize = 8192;

/// Reference sizing: environment frames in the pool.
pub const DEFAULT_ENV_CAPACITY: usize = 128;

/// Reference sizing: bindings per frame.
pub const DEFAULT_FRAME_CAPACITY: usize = 1000;

/// Nested evaluations allowed before [`Error::RecursionLimit`](crate::Error::RecursionLimit).
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 1024;

/// Capacities of every fixed-size table the interpreter owns.
///
/// The defaults reproduce the kernel shell's static sizing.
///
/// ```
/// use monad::Config;
///
/// let config = Config::default().with_heap_capacity(64).with_env_capacity(4);
/// assert_eq!(config.heap_capacity, 64);
/// assert_eq!(config.symbol_capacity, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Object slots in the heap.
    pub heap_capacity: usize,

    /// Distinct symbol names.
    pub symbol_capacity: usize,

    /// Characters kept per symbol name and accepted by the reader.
    pub max_symbol_length: usize,

    /// Environment frames, including the global one.
    pub env_capacity: usize,

    /// Bindings in a single frame.
    pub frame_capacity: usize,

    /// Elements in one list literal.
    pub max_list_elements: usize,

    /// Lists and quotes the reader keeps open at once.
    pub max_read_depth: usize,

    /// Nested `eval` calls before evaluation gives up.
    pub max_eval_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heap_capacity: DEFAULT_HEAP_CAPACITY,
            symbol_capacity: DEFAULT_SYMBOL_CAPACITY,
            max_symbol_length: DEFAULT_MAX_SYMBOL_LENGTH,
            env_capacity: DEFAULT_ENV_CAPACITY,
            frame_capacity: DEFAULT_FRAME_CAPACITY,
            max_list_elements: DEFAULT_MAX_LIST_ELEMENTS,
            max_read_depth: DEFAULT_MAX_DEPTH,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }
}

impl Config {
    /// The default sizing with overrides from `MONAD_HEAP`, `MONAD_SYMBOLS`,
    /// `MONAD_ENVS` and `MONAD_DEPTH`.
    ///
    /// Values that are not unsigned integers are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Applies the `MONAD_*` overrides using `lookup` to read variables.
    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fields: [(&str, &mut usize); 4] = [
            ("MONAD_HEAP", &mut self.heap_capacity),
            ("MONAD_SYMBOLS", &mut self.symbol_capacity),
            ("MONAD_ENVS", &mut self.env_capacity),
            ("MONAD_DEPTH", &mut self.max_eval_depth),
        ];
        for (var, field) in fields {
            let Some(raw) = lookup(var) else { continue };
            match raw.trim().parse() {
                Ok(value) => *field = value,
                Err(_) => warn!("ignoring {var}={raw:?}: not an unsigned integer"),
            }
        }
        self
    }

    /// Sets [`heap_capacity`](Self::heap_capacity).
    #[must_use]
    pub fn with_heap_capacity(mut self, capacity: usize) -> Self {
        self.heap_capacity = capacity;
        self
    }

    /// Sets [`symbol_capacity`](Self::symbol_capacity).
    #[must_use]
    pub fn with_symbol_capacity(mut self, capacity: usize) -> Self {
        self.symbol_capacity = capacity;
        self
    }

    /// Sets [`max_symbol_length`](Self::max_symbol_length).
    #[must_use]
    pub fn with_max_symbol_length(mut self, length: usize) -> Self {
        self.max_symbol_length = length;
        self
    }

    /// Sets [`env_capacity`](Self::env_capacity). The global frame always
    /// fits, so zero behaves like one.
    #[must_use]
    pub fn with_env_capacity(mut self, capacity: usize) -> Self {
        self.env_capacity = capacity;
        self
    }

    /// Sets [`frame_capacity`](Self::frame_capacity).
    #[must_use]
    pub fn with_frame_capacity(mut self, capacity: usize) -> Self {
        self.frame_capacity = capacity;
        self
    }

    /// Sets [`max_list_elements`](Self::max_list_elements).
    #[must_use]
    pub fn with_max_list_elements(mut self, count: usize) -> Self {
        self.max_list_elements = count;
        self
    }

    /// Sets [`max_read_depth`](Self::max_read_depth).
    #[must_use]
    pub fn with_max_read_depth(mut self, depth: usize) -> Self {
        self.max_read_depth = depth;
        self
    }

    /// Sets [`max_eval_depth`](Self::max_eval_depth).
    #[must_use]
    pub fn with_max_eval_depth(mut self, depth: usize) -> Self {
        self.max_eval_depth = depth;
        self
    }
}
