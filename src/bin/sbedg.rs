//! sbedg command-line interface
//!
//! Commands:
//! - sbedg diff <old> <new> [--json] [--check]
//! - sbedg generate <schema> [--out DIR]
//! - sbedg fixture <schema> <values> --out FILE

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use sbedg::{CodegenOptions, CppGenerator, FieldValue, ParserGenerator, diff, fixture, load_schema};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// SBE Drift Guard: schema drift detection and parser generation
#[derive(Debug, Parser)]
#[command(name = "sbedg")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Diff two schema JSON files
    Diff {
        /// Old schema JSON path
        old: PathBuf,
        /// New schema JSON path
        new: PathBuf,
        /// Print the diff as JSON
        #[arg(long)]
        json: bool,
        /// Exit with status 1 when any drift is found
        #[arg(long)]
        check: bool,
    },

    /// Generate a C++ parser from a schema
    Generate(GenerateArgs),

    /// Encode a binary fixture from a JSON object of field values
    Fixture {
        /// Schema JSON path
        schema: PathBuf,
        /// Field values JSON path
        values: PathBuf,
        /// Output fixture path
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Schema JSON path
    schema: PathBuf,
    /// Output directory
    #[arg(long, default_value = "generated")]
    out: PathBuf,
    /// Struct name (default: message name)
    #[arg(long)]
    struct_name: Option<String>,
    /// Parse function name (default: parse_<snake_case message>)
    #[arg(long)]
    parser_fn: Option<String>,
    /// Header file name (default: <snake_case message>_parser.h)
    #[arg(long)]
    header: Option<String>,
}

impl GenerateArgs {
    fn options(&self) -> CodegenOptions {
        let mut options = CodegenOptions::new();
        if let Some(name) = &self.struct_name {
            options = options.with_struct_name(name);
        }
        if let Some(name) = &self.parser_fn {
            options = options.with_parser_fn(name);
        }
        if let Some(name) = &self.header {
            options = options.with_header_file(name);
        }
        options
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sbedg=debug" } else { "sbedg=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn run(command: Command) -> sbedg::Result<ExitCode> {
    match command {
        Command::Diff {
            old,
            new,
            json,
            check,
        } => {
            let report = diff(&load_schema(old)?, &load_schema(new)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
            if check && !report.is_empty() {
                return Ok(ExitCode::from(1));
            }
        }
        Command::Generate(args) => {
            let schema = load_schema(&args.schema)?;
            let files = CppGenerator::new(args.options()).generate(&schema)?;
            let paths = sbedg::write_generated(&files, &args.out)?;
            println!("Generated:");
            for path in paths {
                println!("- {}", path.display());
            }
        }
        Command::Fixture {
            schema,
            values,
            out,
        } => {
            let schema = load_schema(schema)?;
            let source: serde_json::Value = serde_json::from_str(&fs::read_to_string(values)?)?;
            let values = FieldValue::map_from_json(&source)?;
            let bytes = fixture::write_fixture(&schema, &values, &out)?;
            info!(path = %out.display(), bytes = bytes.len(), "fixture encoded");
            println!("Wrote {} bytes to {}", bytes.len(), out.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
