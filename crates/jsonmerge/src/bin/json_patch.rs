//! `json-patch`: apply a JSON Patch (RFC 6902) to a document.
//!
//! Usage:
//!   json-patch [--file <DOC>] [--atomic] [--pretty] '<patch-array-json>'
//!
//! The document is read from `--file`, or from stdin when no file is given.
//! Set `RUST_LOG=jsonmerge=debug` to trace each applied operation on stderr.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jsonmerge::json_cli::{apply_json_patch_with, CliError, CliOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "json-patch", version, about = "Apply a JSON Patch to a JSON document")]
struct Args {
    /// The patch, as a JSON array of operations.
    patch: String,

    /// Read the document from this file instead of stdin.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Leave the document unchanged unless every operation succeeds.
    #[arg(long)]
    atomic: bool,

    /// Pretty-print the patched document.
    #[arg(long)]
    pretty: bool,
}

fn read_document(file: Option<&PathBuf>) -> Result<String, CliError> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let doc = read_document(args.file.as_ref())?;
    let options = CliOptions {
        atomic: args.atomic,
        pretty: args.pretty,
    };
    let result = apply_json_patch_with(&doc, &args.patch, &options)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(result.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
