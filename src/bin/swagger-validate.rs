//! Swagger Validate CLI
//!
//! Command-line interface for validating Swagger 2.0 documents and payloads.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use swagger_validate::{
    load_document, load_document_auto, validate_against_schema, Direction, Formats, SchemaError,
    SpecValidator, ValidationResult, ValidatorOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swagger-validate")]
#[command(about = "Validate Swagger 2.0 documents and JSON payloads")]
#[command(version)]
struct Cli {
    /// Log validation phases to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a Swagger 2.0 document
    Spec {
        /// Document source: file path or URL (http:// or https://), JSON or YAML
        source: String,

        /// Keep checking after schema or reference errors
        #[arg(long)]
        continue_on_errors: bool,

        /// Do not report path templates that overlap once parameters are stripped
        #[arg(long)]
        no_strict_path_params: bool,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,

        /// Suppress warnings, only show errors
        #[arg(long, short)]
        quiet: bool,
    },

    /// Validate a payload against a schema
    Value {
        /// Payload file to validate
        payload: PathBuf,

        /// Schema source: file path or URL
        #[arg(long)]
        schema: String,

        /// Validate as request (read-only properties are rejected)
        #[arg(long, conflicts_with = "response")]
        request: bool,

        /// Validate as response
        #[arg(long, conflicts_with = "request")]
        response: bool,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Spec {
            source,
            continue_on_errors,
            no_strict_path_params,
            json,
            quiet,
        } => {
            let options = ValidatorOptions::new()
                .continue_on_errors(continue_on_errors)
                .strict_path_param_uniqueness(!no_strict_path_params);
            run_spec(&source, options, json, quiet)
        }

        Commands::Value {
            payload,
            schema,
            request,
            response,
            json,
        } => {
            let mut options = ValidatorOptions::new();
            if request || response {
                options = options.scope(Direction::from_request_flag(request));
            }
            run_value(&payload, &schema, options, json)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_spec(source: &str, options: ValidatorOptions, json_output: bool, quiet: bool) -> Result<(), u8> {
    let document = load_document_auto(source).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    let formats = Formats::default();
    let (errors, warnings) = SpecValidator::new(&formats, options).validate(&document);
    let warnings = if quiet { &[][..] } else { warnings.warnings() };

    report(json_output, &errors, warnings)
}

fn run_value(
    payload_path: &std::path::Path,
    schema_source: &str,
    options: ValidatorOptions,
    json_output: bool,
) -> Result<(), u8> {
    let payload = load_document(payload_path).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    let schema = load_document_auto(schema_source).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    let result = validate_against_schema(&schema, &payload, &Formats::default(), &options)
        .map_err(|e| {
            report_error(json_output, &e.to_string());
            e.exit_code() as u8
        })?;

    report(json_output, &result, result.warnings())
}

/// Print the outcome and map it to an exit code.
fn report(json_output: bool, errors: &ValidationResult, warnings: &[SchemaError]) -> Result<(), u8> {
    let valid = errors.is_valid();
    if json_output {
        let output = json!({
            "valid": valid,
            "errors": errors.errors(),
            "warnings": warnings,
        });
        println!("{}", output);
    } else {
        for warning in warnings {
            eprintln!("Warning: {}", warning);
        }
        if valid {
            println!("Valid");
        } else {
            eprintln!("Validation failed:");
            for error in errors.errors() {
                eprintln!("  {}", error);
            }
        }
    }
    if valid {
        Ok(())
    } else {
        Err(1)
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", json!({"valid": false, "error": msg}));
    } else {
        eprintln!("Error: {}", msg);
    }
}
