//! argvet - check an argument vector against a declared vocabulary.

use anyhow::{Context, Result};
use argvet::{render_errors, render_json, render_text, Config, Registry};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Declare unary and keyword arguments, parse argv, and collect every error.
#[derive(Parser, Debug)]
#[command(name = "argvet", version, about, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the vocabulary comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ConfigSource {
    /// JSON vocabulary given inline
    #[arg(long)]
    config: Option<String>,

    /// Path to a JSON vocabulary file
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,
}

impl ConfigSource {
    fn load(&self) -> Result<Registry> {
        let config = match (&self.config, &self.config_file) {
            (Some(json), _) => Config::from_json(json).context("failed to parse config JSON")?,
            (None, Some(path)) => Config::from_path(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            (None, None) => anyhow::bail!("either --config or --config-file is required"),
        };
        config.build().context("invalid config")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a vocabulary without parsing anything
    Check {
        #[command(flatten)]
        source: ConfigSource,
    },

    /// Parse an argument vector (executable name first) and report the outcome
    Parse {
        #[command(flatten)]
        source: ConfigSource,

        /// Output format for the report
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Argument vector to parse, starting with the executable name
        #[arg(last = true)]
        args: Vec<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { source } => {
            let registry = source.load()?;
            let unary = registry
                .specs()
                .iter()
                .filter(|s| s.kind() == argvet::ArgKind::Unary)
                .count();
            println!(
                "ok: {} unary, {} keyword arguments",
                unary,
                registry.specs().len() - unary
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Parse {
            source,
            format,
            args,
        } => {
            let registry = source.load()?;
            let outcome = registry.parse(&args);

            match format {
                ReportFormat::Text => print!("{}", render_text(&outcome)),
                ReportFormat::Json => println!(
                    "{}",
                    render_json(&outcome).context("failed to serialize outcome")?
                ),
            }

            if outcome.is_clean() {
                Ok(ExitCode::SUCCESS)
            } else {
                eprint!("{}", render_errors(&outcome, "argvet"));
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
