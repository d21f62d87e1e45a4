// tiershift CLI - collection snapshot reconciliation and tier-migration reports

mod exit_codes;
mod export;
mod history;
mod recon;
mod render;
mod settings;
mod snapshots;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tiershift_recon::ReconError;

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "tiershift")]
#[command(about = "Compare two collection snapshots and report price-tier migrations")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/tiershift/config.toml)
    #[arg(long, global = true, env = "TIERSHIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the current snapshot against a baseline and report tier changes
    #[command(after_help = "\
Examples:
  tiershift run
  tiershift run data/20180415-magic-cards.csv
  tiershift run current.csv --baseline old.csv --json
  tiershift run --report report.txt --export inventory.csv
  tiershift run --all --no-history")]
    Run {
        /// Current snapshot (default: newest dated snapshot in data_dir)
        current: Option<PathBuf>,

        /// Baseline snapshot (default: newest dated snapshot older than current)
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Card library JSON (default: library in data_dir)
        #[arg(long)]
        library: Option<PathBuf>,

        /// Output JSON to stdout instead of the text report
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the text report to file ("-" for stdout)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write the classified inventory as CSV
        #[arg(long)]
        export: Option<PathBuf>,

        /// Include new, gone and unchanged sections in the text report
        #[arg(long)]
        all: bool,

        /// Do not append this run to the history file
        #[arg(long)]
        no_history: bool,
    },

    /// Validate the config without running
    #[command(after_help = "\
Examples:
  tiershift validate
  tiershift validate --config binder.toml")]
    Validate,

    /// Classify a single old/new price pair against the configured thresholds
    #[command(after_help = "\
Examples:
  tiershift classify 0.50 2.50
  tiershift classify '$7.00' 5.99")]
    Classify {
        /// Baseline unit price
        old_price: String,

        /// Current unit price
        new_price: String,
    },

    /// List past runs from the history file
    #[command(after_help = "\
Examples:
  tiershift history
  tiershift history --limit 5
  tiershift history --json")]
    History {
        /// Output JSON to stdout
        #[arg(long)]
        json: bool,

        /// Show only the most recent N runs
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // try_init: a second subscriber (tests) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run {
            current,
            baseline,
            library,
            json,
            output,
            report,
            export,
            all,
            no_history,
        } => recon::cmd_run(
            config,
            recon::RunArgs {
                current,
                baseline,
                library,
                json,
                output,
                report,
                export,
                all,
                no_history,
            },
        ),
        Commands::Validate => recon::cmd_validate(config),
        Commands::Classify { old_price, new_price } => recon::cmd_classify(config, &old_price, &new_price),
        Commands::History { json, limit } => recon::cmd_history(config, json, limit),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Create error from an engine error with the matching exit code.
    pub fn recon(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::MissingColumn { .. } => {
                Some("check the [columns] header names in the config".to_string())
            }
            ReconError::MalformedRecord { .. } => {
                Some("set malformed = \"skip\" in the config to drop bad rows".to_string())
            }
            ReconError::DuplicateIdentity(_) => {
                Some("each name/edition/condition/foil/number may appear once per snapshot".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
