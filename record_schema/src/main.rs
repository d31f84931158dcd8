//! Binary to validate JSON documents, generate record schemas, and lint schemas.
//!
//! Usage:
//! - `recordschema validate --schema schema.json [document.json]` (stdin when omitted)
//! - `recordschema generate record.json`
//! - `recordschema lint schema.json`

use std::io::{read_to_string, stdin};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use record_schema::{RecordType, SchemaError, SchemaValidator, ValidatorSettings, lint_schema};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// validate JSON against a JSON Schema subset, or generate schemas from record descriptors
#[derive(Parser, Debug)]
#[command(name = "recordschema", version)]
struct CommandLineInterface {
    /// log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate a document; prints `true` or `false`
    Validate(ValidateArgs),
    /// print the schema generated from a JSON record descriptor
    Generate(GenerateArgs),
    /// report every unsupported or ineffective keyword in a schema
    Lint(LintArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// schema document
    #[arg(short, long)]
    schema: PathBuf,

    /// document to validate (stdin if omitted)
    instance: Option<PathBuf>,

    /// reject schemas with unknown or unsupported keywords
    #[arg(long)]
    strict_schema: bool,

    /// check `email`, `uuid`, and `date-time` formats
    #[arg(long)]
    assert_formats: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// record descriptor: {"name": ..., "fields": [{"name", "kind", "required", "format"}]}
    record: PathBuf,
}

#[derive(Args, Debug)]
struct LintArgs {
    /// schema document
    schema: PathBuf,
}

const EXIT_INVALID: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = CommandLineInterface::parse();
    init_tracing(cli.verbose);

    let result: Result<bool, SchemaError> = match &cli.cmd {
        Command::Validate(args) => run_validate(args),
        Command::Generate(args) => run_generate(args),
        Command::Lint(args) => run_lint(args),
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_INVALID),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level: &str = if verbose { "debug" } else { "warn" };
    let filter: EnvFilter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_validate(args: &ValidateArgs) -> Result<bool, SchemaError> {
    let validator = SchemaValidator::new(ValidatorSettings {
        assert_formats: args.assert_formats,
        deny_invalid_unknown_json_schema: args.strict_schema,
    });
    let schema = validator.parse_schema(&std::fs::read_to_string(&args.schema)?)?;
    let text: String = match &args.instance {
        Some(path) => std::fs::read_to_string(path)?,
        None => read_to_string(stdin())?,
    };
    let document: Value = serde_json::from_str(&text).map_err(SchemaError::Parse)?;
    debug!(schema = %args.schema.display(), "validating document");
    match validator.check(&document, &schema) {
        Ok(()) => {
            println!("true");
            Ok(true)
        }
        Err(e) => {
            println!("false");
            eprintln!("{e}");
            Ok(false)
        }
    }
}

fn run_generate(args: &GenerateArgs) -> Result<bool, SchemaError> {
    let record: RecordType = read_json(&args.record)?;
    let schema = SchemaValidator::default().generate(&record);
    println!("{schema}");
    Ok(true)
}

fn run_lint(args: &LintArgs) -> Result<bool, SchemaError> {
    let value: Value = read_json(&args.schema)?;
    match lint_schema(&value) {
        Ok(()) => Ok(true),
        Err(lint_error) => {
            for issue in &lint_error.issues {
                println!("{issue}");
            }
            Ok(false)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SchemaError> {
    let text: String = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text).map_err(SchemaError::Parse)?;
    serde_json::from_value(value).map_err(SchemaError::Json)
}
