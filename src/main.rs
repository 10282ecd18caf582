//! json-canon CLI.
//!
//! Reads JSON from a file or stdin and writes results to stdout. Failures
//! are printed as `{"err":{"code":N,"name":"..."}}` with exit status 1.
//! Logs go to stderr, filtered by `RUST_LOG`.

use clap::{Args, Parser, Subcommand};
use json_canon::conformance::{CorpusRunner, TestResult};
use json_canon::json::write_json;
use json_canon::{
    canonicalize_with, is_canonical_text, parse_with_limits, to_json_string, ArrayWriter,
    CanonOptions, CanonResult, ErrorCode, JsonValue, KeyOrder, Limits,
};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "canon")]
#[command(about = "Deterministic JSON canonicalization", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalOptions {
    /// Sort object keys by UTF-16 code units instead of code points
    #[arg(long, global = true, env = "CANON_UTF16_KEYS")]
    utf16_keys: bool,

    /// Use lenient size and depth limits
    #[arg(long, global = true)]
    lenient: bool,

    /// Maximum nesting depth of arrays and objects
    #[arg(long, global = true, env = "CANON_MAX_DEPTH")]
    max_depth: Option<u64>,

    /// Reject strings containing non-ASCII characters
    #[arg(long, global = true)]
    ascii_only: bool,
}

impl GlobalOptions {
    fn canon_options(&self) -> CanonOptions {
        let mut limits = if self.lenient {
            Limits::lenient()
        } else {
            Limits::standard()
        };
        if let Some(depth) = self.max_depth {
            limits = limits.with_max_depth(depth);
        }
        limits.ascii_only = self.ascii_only;

        let key_order = if self.utf16_keys {
            KeyOrder::Utf16
        } else {
            KeyOrder::CodePoint
        };
        CanonOptions::default()
            .with_limits(limits)
            .with_key_order(key_order)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of a JSON document
    Canonicalize {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Succeed only if the document is already in canonical form
    Check {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Join one JSON fragment per line into an array
    Assemble {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        /// Parse and canonicalize each fragment first
        #[arg(long)]
        canonicalize: bool,
    },

    /// Run a conformance corpus and report the results
    Corpus {
        /// Corpus file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let options = cli.options.canon_options();

    let result = match &cli.command {
        Commands::Canonicalize { file } => run_canonicalize(file.as_deref(), &options),
        Commands::Check { file } => run_check(file.as_deref(), &options),
        Commands::Assemble { file, canonicalize } => {
            run_assemble(file.as_deref(), *canonicalize, &options)
        }
        Commands::Corpus { file } => run_corpus(file),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            // Nothing more can be reported if stdout itself is gone
            let _ = writeln!(io::stdout().lock(), "{}", error_json(&err));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// `{"err":{"code":N,"name":"..."}}`
fn error_json(err: &ErrorCode) -> String {
    let body = JsonValue::object([
        ("code", JsonValue::from(u64::from(err.code()))),
        ("name", JsonValue::from(err.name())),
    ]);
    to_json_string(&JsonValue::object([("err", body)]))
}

fn read_input(file: Option<&Path>) -> CanonResult<Vec<u8>> {
    match file {
        Some(path) => fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ErrorCode::E900_FileNotFound(path.display().to_string()),
            _ => ErrorCode::from(e),
        }),
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_line(text: &str) -> CanonResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

fn run_canonicalize(file: Option<&Path>, options: &CanonOptions) -> CanonResult<ExitCode> {
    let input = read_input(file)?;
    let value = parse_with_limits(&input, options.limits)?;
    let canonical = canonicalize_with(&value, options)?;

    let mut stdout = io::stdout().lock();
    write_json(&canonical, &mut stdout)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn run_check(file: Option<&Path>, options: &CanonOptions) -> CanonResult<ExitCode> {
    let input = read_input(file)?;
    let text = trim_line_ending(&input);
    if is_canonical_text(text, options)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(ErrorCode::E205_NonCanonicalJSON)
    }
}

fn trim_line_ending(input: &[u8]) -> &[u8] {
    let input = input.strip_suffix(b"\n").unwrap_or(input);
    input.strip_suffix(b"\r").unwrap_or(input)
}

fn run_assemble(
    file: Option<&Path>,
    canonicalize: bool,
    options: &CanonOptions,
) -> CanonResult<ExitCode> {
    let input = read_input(file)?;
    let text = std::str::from_utf8(&input).map_err(|_| ErrorCode::E105_InvalidUTF8)?;
    let fragments = text.lines().filter(|line| !line.trim().is_empty());

    let mut writer = ArrayWriter::new(Vec::with_capacity(input.len() + 2))?;
    if canonicalize {
        for fragment in fragments {
            let value = parse_with_limits(fragment.as_bytes(), options.limits)?;
            writer.push_canonical(&value, options)?;
        }
    } else {
        writer.extend(fragments)?;
    }
    tracing::debug!(fragments = writer.len(), canonicalize, "assembled input");

    let bytes = writer.finish()?;
    let array = String::from_utf8(bytes).map_err(|_| ErrorCode::E999_InternalError)?;
    print_line(&array)?;
    Ok(ExitCode::SUCCESS)
}

fn run_corpus(file: &Path) -> CanonResult<ExitCode> {
    let runner = CorpusRunner::load(file)?;
    let results = runner.run_all();

    let mut stdout = io::stdout().lock();
    for (id, result) in &results.details {
        match result {
            TestResult::Fail { expected, actual } => {
                writeln!(stdout, "FAIL {}: expected {}, actual {}", id, expected, actual)?
            }
            TestResult::Error { message } => writeln!(stdout, "ERROR {}: {}", id, message)?,
            TestResult::Skip { reason } => writeln!(stdout, "SKIP {}: {}", id, reason)?,
            TestResult::Pass => {}
        }
    }
    writeln!(stdout, "{}", results.summary())?;
    stdout.flush()?;

    if results.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
