//! a2hs: developer harness for the install-prompt controller.
//!
//! ## Subcommands
//!
//! - `simulate`: replay a timed event script and print the state sequence
//! - `doctor`: run the diagnostic probe against a described environment
//! - `dismissal`: show or clear stored dismissal records

mod dismissal;
mod doctor;
mod logging;
mod simulate;

use std::path::PathBuf;

use a2hs_core::{load_prompt_config, DismissalScope, ScriptStep, StorageConfig};
use clap::{Args, Parser, Subcommand};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Parser)]
#[command(name = "a2hs")]
#[command(about = "Install-prompt lifecycle harness")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to ~/.a2hs)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Controller config file (defaults to <root>/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
pub struct EnvironmentArgs {
    /// User-agent string used for platform detection
    #[arg(long = "ua", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Pretend the app already runs in standalone display mode
    #[arg(long)]
    pub standalone: bool,

    /// Pretend the install API is missing
    #[arg(long)]
    pub no_install_api: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay timed events against a fresh controller
    Simulate {
        #[command(flatten)]
        env: EnvironmentArgs,

        /// Timed event, `<ms>:<event>` (installable, installed, accept, decline, trigger, dismiss)
        #[arg(long = "step", value_name = "MS:EVENT")]
        steps: Vec<ScriptStep>,

        /// Override the fallback timeout
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,

        /// Wait for the signal indefinitely; trigger shows instructions on demand
        #[arg(long, conflicts_with = "timeout_ms")]
        on_demand: bool,

        /// Stop the simulation at this time
        #[arg(long, value_name = "MS", default_value_t = 10_000)]
        until_ms: u64,

        /// Keep dismissals from this run in the data directory
        #[arg(long)]
        persist: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run install diagnostics
    Doctor {
        #[command(flatten)]
        env: EnvironmentArgs,

        /// Pretend the origin is not served securely
        #[arg(long)]
        insecure: bool,

        /// Pretend no manifest is linked
        #[arg(long)]
        no_manifest: bool,

        /// Pretend no service worker controls the page
        #[arg(long)]
        no_worker: bool,

        /// Deliver the installability signal at this time
        #[arg(long, value_name = "MS")]
        signal_at_ms: Option<u64>,
    },

    /// Inspect or clear stored dismissals
    Dismissal {
        #[command(subcommand)]
        action: DismissalAction,
    },
}

#[derive(Subcommand)]
enum DismissalAction {
    /// Show the permanent dismissal record
    Show,
    /// Clear the permanent dismissal record
    Clear {
        /// Scope to clear (only `permanent` is stored on disk)
        #[arg(long, default_value = "permanent")]
        scope: DismissalScope,
    },
}

fn main() {
    let cli = Cli::parse();
    let storage = cli
        .root
        .clone()
        .map(StorageConfig::with_root)
        .unwrap_or_default();
    let _logging_guard = logging::init(&storage.logs_dir());

    let config_path = cli.config.clone().unwrap_or_else(|| storage.config_file());
    let config = match load_prompt_config(Some(config_path)) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to load config; using defaults");
            Default::default()
        }
    };

    let result = match cli.command {
        Commands::Simulate {
            env,
            steps,
            timeout_ms,
            on_demand,
            until_ms,
            persist,
            json,
        } => simulate::run(simulate::SimulateOptions {
            config,
            storage,
            env,
            steps,
            timeout_ms,
            on_demand,
            until_ms,
            persist,
            json,
        }),
        Commands::Doctor {
            env,
            insecure,
            no_manifest,
            no_worker,
            signal_at_ms,
        } => doctor::run(doctor::DoctorOptions {
            config,
            env,
            insecure,
            no_manifest,
            no_worker,
            signal_at_ms,
        }),
        Commands::Dismissal { action } => match action {
            DismissalAction::Show => dismissal::show(&storage),
            DismissalAction::Clear { scope } => dismissal::clear(&storage, scope),
        },
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "a2hs command failed");
        std::process::exit(1);
    }
}
