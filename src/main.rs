//! Purpose: `foo-demo` entry point exercising the libfoo ownership wrappers.
//! Role: Binary crate root; parses args, runs one session, prints the report.
//! Invariants: Reports go to stdout (text or JSON); diagnostics and logs go to stderr.
//! Invariants: Errors are emitted as JSON on stderr; exit code comes from `to_exit_code`.
use std::error::Error as StdError;

use clap::Parser;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

use foosafe::core::libfoo;
use foosafe::core::text::MAX_SCAN_LEN;
use foosafe::session::{Session, SessionReport};
use foosafe::{Error, ErrorKind, to_exit_code};

#[derive(Parser, Debug)]
#[command(
    name = "foo-demo",
    version,
    about = "Allocate a libfoo handle, run a computation, and fetch a native string"
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 21,
        allow_negative_numbers = true,
        help = "Value passed to the native computation"
    )]
    input: i32,
    #[arg(long, help = "Emit the report as a single JSON object")]
    json: bool,
    #[arg(
        long,
        default_value_t = MAX_SCAN_LEN,
        help = "Maximum bytes scanned for a native string terminator"
    )]
    scan_limit: usize,
    #[arg(long, hide = true)]
    fail_alloc: bool,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<(), Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if !err.use_stderr() {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Internal)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                return Ok(());
            }
            let rendered = err.to_string();
            let summary = rendered.lines().next().unwrap_or("invalid arguments");
            let summary = summary.trim_start_matches("error: ").to_string();
            return Err(Error::new(ErrorKind::Usage).with_message(summary));
        }
    };

    if cli.fail_alloc {
        libfoo::fail_next_alloc();
    }

    let session = Session::open()?.with_scan_limit(cli.scan_limit);
    let report = session.report(cli.input)?;
    session.close();

    if cli.json {
        let json = serde_json::to_string(&report).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to serialize report")
                .with_source(err)
        })?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SessionReport) {
    println!("handle_t* is: {}", report.handle);
    println!("doit({}) = {}", report.input, report.output);
    println!("string is: {}", report.text);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn emit_error(err: &Error) {
    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(err.message().unwrap_or("")));
    if let Some(address) = err.address() {
        inner.insert("address".to_string(), json!(format!("{address:#x}")));
    }
    if let Some(limit) = err.limit() {
        inner.insert("limit".to_string(), json!(limit));
    }
    if let Some(offset) = err.offset() {
        inner.insert("offset".to_string(), json!(offset));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes
}
