//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod logging;

use clap::{ArgGroup, Parser, Subcommand};
use commands::{QuerySource, ValidateCommandInput, run_config_check, run_config_show, run_validate};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode};
use param_guard_shared::ErrorEnvelope;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "pguard",
    version,
    about = "Validate API-gateway query parameters against declarative rules",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a request's query parameters and print the error report.
    #[command(group(ArgGroup::new("source").required(true).args(["query", "url"])))]
    Validate {
        /// Raw query string (leading `?` optional).
        #[arg(long)]
        query: Option<String>,
        /// Absolute request URL; its query component is validated.
        #[arg(long)]
        url: Option<String>,
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Optional JSON overrides (partial config).
        #[arg(long)]
        overrides_json: Option<String>,
    },
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Validate config loading, merging, and normalization.
    Check {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Optional JSON overrides (partial config).
        #[arg(long)]
        overrides_json: Option<String>,
    },
    /// Show the effective config after applying overrides.
    Show {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Optional JSON overrides (partial config).
        #[arg(long)]
        overrides_json: Option<String>,
    },
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);
    logging::init_tracing(mode.is_json());

    match run_and_render(&cli.command, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run_and_render(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    match run(command, mode) {
        Err(CliError::Guard(error)) => Ok(format_error_output(mode, &error)),
        other => other,
    }
}

fn run(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    match command {
        Commands::Validate {
            query,
            url,
            config,
            overrides_json,
        } => {
            let source = match (query.as_deref(), url.as_deref()) {
                (Some(query), _) => QuerySource::QueryString(query),
                (None, Some(url)) => QuerySource::Url(url),
                (None, None) => {
                    return Err(CliError::InvalidInput(
                        "one of --query or --url is required".to_string(),
                    ));
                },
            };
            run_validate(
                mode,
                ValidateCommandInput {
                    source,
                    config: config.as_deref(),
                    overrides_json: overrides_json.as_deref(),
                },
            )
        },
        Commands::Config { command } => match command {
            ConfigCommands::Check {
                config,
                overrides_json,
            } => run_config_check(mode, config.as_deref(), overrides_json.as_deref()),
            ConfigCommands::Show {
                config,
                overrides_json,
            } => run_config_show(mode, config.as_deref(), overrides_json.as_deref()),
        },
    }
}

fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let exit_code = ExitCode::for_envelope(error);
    let error = error.clone().redact_secret_metadata();

    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.no_progress);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error,
        });

        // This is a CLI boundary, so JSON serialization errors are internal.
        let mut output = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"guard:internal\",\"message\":\"internal error\"}}".to_string()
        });
        output.push('\n');
        output
    } else {
        format_error_text(&error)
    };

    CliOutput {
        stdout,
        stderr,
        exit_code,
    }
}

fn format_error_text(error: &ErrorEnvelope) -> String {
    let mut out = String::new();
    out.push_str("status: error\n");
    out.push_str(&format!("code: {}\n", error.code));
    out.push_str("message: ");
    out.push_str(&error.message);
    out.push('\n');
    out.push_str(&format!("kind: {}\n", error.kind));

    if !error.metadata.is_empty() {
        out.push_str("meta:\n");
        for (key, value) in &error.metadata {
            out.push_str("  ");
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }

    out
}

fn log_info(stderr: &mut String, message: &str, no_progress: bool) {
    if no_progress {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}
