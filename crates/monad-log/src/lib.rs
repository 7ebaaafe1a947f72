//! A minimal, zero-dependency logging crate for the MONADLISP interpreter.
//!
//! Log lines never share a stream with the interpreter's character sink: by
//! default they go to stderr, and a host (a kernel console, a test harness)
//! can route them elsewhere with [`set_sink`].
//!
//! # Example
//!
//! ```
//! use monad_log::{error, warn, info, debug, Level};
//!
//! monad_log::set_level(Level::Debug);
//!
//! let slots = 8192;
//! info!("heap ready with {} slots", slots);
//! debug!("free list: {:?}", vec![1, 2, 3]);
//! warn!("symbol table is 90% full");
//! error!("environment pool exhausted");
//! ```

use std::fmt::Arguments;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

/// Log levels representing the severity of log messages.
///
/// Lower numeric values indicate higher severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Critical failures
    Error = 0,
    /// Degraded behaviour (resource exhaustion, ignored configuration)
    Warn = 1,
    /// Lifecycle events
    Info = 2,
    /// Diagnostic detail
    Debug = 3,
    /// Per-application tracing
    Trace = 4,
}

impl Level {
    /// Returns the ANSI color code for this log level.
    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Returns the upper-case name of this level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }

    /// Parses a level name, ignoring case.
    ///
    /// # Example
    ///
    /// ```
    /// use monad_log::Level;
    ///
    /// assert_eq!(Level::from_str("error"), Ok(Level::Error));
    /// assert_eq!(Level::from_str("INFO"), Ok(Level::Info));
    /// assert!(Level::from_str("loud").is_err());
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

/// One formatted log event, handed to the active sink.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Severity of the event.
    pub level: Level,
    /// Module path of the call site.
    pub target: &'a str,
    /// The formatted message.
    pub args: Arguments<'a>,
}

/// Receives every record that passes the level filter.
pub type Sink = fn(&Record<'_>);

/// The global logger.
///
/// Only the minimum level is mutable; it is stored atomically so the macros
/// can check it without locking.
pub struct Logger {
    level: AtomicU8,
}

impl Logger {
    const fn new(level: Level) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
        }
    }

    /// Sets the minimum log level.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current minimum log level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Checks if a message at the given level would be logged.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();
static SINK: OnceLock<Sink> = OnceLock::new();

/// Returns the global logger, initialising it at `Level::Warn`.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Warn))
}

/// Sets the minimum log level for the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the minimum log level from a level name.
///
/// # Errors
///
/// Returns the parse error message if `s` is not a level name.
pub fn set_level_from_str(s: &str) -> Result<(), String> {
    let level = Level::from_str(s)?;
    set_level(level);
    Ok(())
}

/// Reads the level from the environment variable `var`, if it is set.
///
/// Returns the level that was applied. An unparsable value is reported on
/// stderr and leaves the current level untouched.
pub fn init_from_env(var: &str) -> Option<Level> {
    let raw = std::env::var(var).ok()?;
    match Level::from_str(&raw) {
        Ok(level) => {
            set_level(level);
            Some(level)
        }
        Err(msg) => {
            eprintln!("{var}: {msg}");
            None
        }
    }
}

/// Installs the sink that receives all log records.
///
/// The sink can be set once; later calls hand the rejected sink back.
///
/// # Errors
///
/// Returns `Err(sink)` if a sink was already installed.
pub fn set_sink(sink: Sink) -> Result<(), Sink> {
    SINK.set(sink)
}

fn stderr_sink(record: &Record<'_>) {
    const RESET: &str = "\x1b[0m";
    eprintln!(
        "{}[{}]{RESET} {}: {}",
        record.level.color_code(),
        record.level.as_str(),
        record.target,
        record.args
    );
}

#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments<'_>) {
    if !get_logger().enabled(level) {
        return;
    }
    let record = Record {
        level,
        target,
        args,
    };
    let sink = SINK.get().copied().unwrap_or(stderr_sink);
    sink(&record);
}

/// Logs a message at an explicit level.
///
/// ```
/// use monad_log::{log, Level};
///
/// log!(level: Level::Info, "evaluated {} forms", 3);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    module_path!(),
                    format_args!($($arg)*)
                );
            }
        }
    };
}

/// Logs a message at the Error level.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs a message at the Warn level.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs a message at the Info level.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs a message at the Debug level.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs a message at the Trace level.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}
