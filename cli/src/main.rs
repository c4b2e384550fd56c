use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use shape_schema_core::{Schema, SchemaError, Value};
use shape_schema_loader::{
    CONFIG_FILE_NAME, LoaderError, SchemaLoader, SourceFormat, parse_value, read_value,
};
use tracing_subscriber::EnvFilter;

/// Input does not conform to the schema.
const EXIT_INVALID: u8 = 1;
/// Schema, config or input could not be used at all.
const EXIT_ERROR: u8 = 2;

/// Output format for resolved documents.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "shape-schema", version)]
#[command(about = "Validate documents against shape schemas and fill in defaults")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the schema sources and report unknown types.
    Check(CheckArgs),
    /// Validate an input document.
    Validate(ValidateArgs),
    /// Validate an input document and print it with defaults filled in.
    Resolve(ResolveArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Project config listing schema sources (default: ./.shape-schema.yml).
    #[arg(long, conflicts_with = "schema")]
    config: Option<PathBuf>,
    /// Schema file (JSON or YAML); repeat to merge fragments in order.
    #[arg(long)]
    schema: Vec<PathBuf>,
    /// Defaults file merged after the schema files.
    #[arg(long)]
    defaults: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    sources: SourceArgs,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    #[command(flatten)]
    sources: SourceArgs,
    /// Input document, or `-` to read JSON from stdin.
    input: PathBuf,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[command(flatten)]
    sources: SourceArgs,
    /// Input document, or `-` to read JSON from stdin.
    input: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Validate(args) => run_validate(args),
        Command::Resolve(args) => run_resolve(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run_check(args: CheckArgs) -> Result<ExitCode, String> {
    let schema = load_schema(&args.sources)?;
    let referenced = schema.referenced_types();
    let unknown = schema.unknown_types();

    println!(
        "Loaded {} field(s) referencing {} type(s).",
        schema.schema().len(),
        referenced.len()
    );
    if unknown.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    for name in &unknown {
        println!("unknown type: {name}");
    }
    Ok(ExitCode::from(EXIT_ERROR))
}

fn run_validate(args: ValidateArgs) -> Result<ExitCode, String> {
    let schema = load_schema(&args.sources)?;
    let input = read_input(&args.input)?;

    match schema.explain(&input).map_err(|err| err.to_string())? {
        None => {
            println!("valid");
            Ok(ExitCode::SUCCESS)
        }
        Some(mismatch) => {
            println!("invalid: {mismatch}");
            Ok(ExitCode::from(EXIT_INVALID))
        }
    }
}

fn run_resolve(args: ResolveArgs) -> Result<ExitCode, String> {
    let schema = load_schema(&args.sources)?;
    let input = read_input(&args.input)?;

    let resolved = match schema.resolve(&input) {
        Ok(resolved) => resolved,
        Err(SchemaError::SchemaMismatch(mismatch)) => {
            eprintln!("invalid: {mismatch}");
            return Ok(ExitCode::from(EXIT_INVALID));
        }
        Err(err) => return Err(err.to_string()),
    };

    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&resolved)
            .map_err(|err| format!("failed to serialize JSON: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&resolved)
            .map_err(|err| format!("failed to serialize YAML: {err}"))?,
    };
    println!("{}", rendered.trim_end());
    Ok(ExitCode::SUCCESS)
}

/// Builds the schema from `--config`, `--schema`/`--defaults`, or the
/// project config in the working directory.
fn load_schema(sources: &SourceArgs) -> Result<Schema, String> {
    let default_config = Path::new(CONFIG_FILE_NAME);
    let config = match &sources.config {
        Some(path) => Some(path.as_path()),
        None if sources.schema.is_empty() && default_config.exists() => Some(default_config),
        None => None,
    };

    let mut loader = match config {
        Some(path) => {
            tracing::debug!(config = %path.display(), "reading project config");
            SchemaLoader::from_config(path)
                .map_err(|err| format!("failed to read config {}: {err}", path.display()))?
        }
        None => SchemaLoader::new(),
    };
    for path in &sources.schema {
        loader = loader.with_schema(path);
    }
    if let Some(path) = &sources.defaults {
        loader = loader.with_defaults(path);
    }

    loader.build().map_err(|err| match err {
        LoaderError::NoSourcesAvailable => {
            format!("{err}; pass --schema <FILE> or --config <FILE>")
        }
        err => format!("failed to load schema: {err}"),
    })
}

fn read_input(path: &Path) -> Result<Value, String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| format!("failed to read stdin: {err}"))?;
        return parse_value(text.as_bytes(), SourceFormat::Json)
            .map_err(|err| format!("failed to parse stdin: {err}"));
    }

    read_value(path).map_err(|err| format!("failed to read {}: {err}", path.display()))
}
