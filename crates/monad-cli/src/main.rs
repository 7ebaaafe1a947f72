//! `monad`: hosted terminal front end for the MONADLISP interpreter.
//!
//! - `monad` starts an interactive session on stdin
//! - `monad FILE` evaluates every expression in `FILE`
//! - `monad -e EXPR` evaluates the expressions given on the command line

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as ClapParser;
use monad::{Config, Interpreter, IoSink, Sink};
use monad_log::{Level, info};

const PROMPT: &str = "LNL> ";

#[derive(Debug, ClapParser)]
#[command(
    name = "monad",
    about = "Runs MONADLISP programs or an interactive session.",
    version
)]
struct Cli {
    /// Source file to evaluate. Without it an interactive session starts.
    file: Option<PathBuf>,

    /// Evaluate EXPR instead of reading a file or stdin.
    #[arg(short, long, value_name = "EXPR", conflicts_with = "file")]
    eval: Option<String>,

    /// Object slots in the heap.
    #[arg(long, value_name = "OBJECTS")]
    heap: Option<usize>,

    /// Environment frames in the pool, including the global one.
    #[arg(long, value_name = "FRAMES")]
    envs: Option<usize>,

    /// Distinct symbol names.
    #[arg(long, value_name = "NAMES")]
    symbols: Option<usize>,

    /// Nested evaluations before giving up.
    #[arg(long, value_name = "LEVELS")]
    depth: Option<usize>,

    /// Minimum log level (error, warn, info, debug, trace). Overrides MONAD_LOG.
    #[arg(long, value_name = "LEVEL", value_parser = Level::from_str)]
    log_level: Option<Level>,

    /// Print table occupancy to stderr before exiting.
    #[arg(long)]
    stats: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(heap) = self.heap {
            config = config.with_heap_capacity(heap);
        }
        if let Some(envs) = self.envs {
            config = config.with_env_capacity(envs);
        }
        if let Some(symbols) = self.symbols {
            config = config.with_symbol_capacity(symbols);
        }
        if let Some(depth) = self.depth {
            config = config.with_max_eval_depth(depth);
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    monad_log::init_from_env("MONAD_LOG");
    if let Some(level) = cli.log_level {
        monad_log::set_level(level);
    }

    let mut interp = Interpreter::new(cli.config());

    let result = match (&cli.file, &cli.eval) {
        (_, Some(source)) => run_source(&mut interp, source),
        (Some(path), None) => run_file(&mut interp, path),
        (None, None) => run_session(&mut interp),
    };

    if cli.stats {
        eprintln!("{}", interp.stats());
    }

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("monad: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_file(interp: &mut Interpreter, path: &Path) -> io::Result<ExitCode> {
    let source = fs::read_to_string(path)
        .map_err(|err| io::Error::new(err.kind(), format!("{}: {err}", path.display())))?;
    info!("loading {}", path.display());
    run_source(interp, &source)
}

/// Evaluates all of `source`, writing results to stdout. A reader error has
/// already been printed by the time it is seen here; it only sets the exit
/// status.
fn run_source(interp: &mut Interpreter, source: &str) -> io::Result<ExitCode> {
    let mut out = IoSink::new(io::stdout().lock());
    let loaded = interp.load(source, &mut out);
    out.flush()?;
    Ok(match loaded {
        Ok(count) => {
            info!("evaluated {count} expressions");
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    })
}

fn run_session(interp: &mut Interpreter) -> io::Result<ExitCode> {
    let mut out = IoSink::new(io::stdout().lock());
    let mut input = io::stdin().lock();
    let mut line = String::new();

    out.emit_str(concat!("MONADLISP v", env!("CARGO_PKG_VERSION"), "\n"));
    loop {
        out.emit_str(PROMPT);
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let text = line.strip_suffix('\n').unwrap_or(&line);
        let text = text.strip_suffix('\r').unwrap_or(text);

        // Reader errors are echoed by `rep`; the session carries on.
        let _ = interp.rep(text, &mut out);
        out.flush()?;
    }
    out.emit_char('\n');
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}
