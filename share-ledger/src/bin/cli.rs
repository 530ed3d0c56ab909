//! Share ledger command-line driver
//!
//! Opens the RocksDB ledger, runs the init hook, then dispatches one
//! invocation and prints its payload.

use anyhow::Context;
use clap::{Parser, Subcommand};
use share_ledger::{Config, RocksLedger, ShareContract};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "share-ledger", version, about = "Reward account ledger")]
struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Overrides `data_dir` from the configuration
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Print Prometheus metrics after the command
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the init hook only
    Init,

    /// Invoke a contract function, e.g. `invoke shopping alice 50`
    Invoke {
        /// initUser | query | completeShare | shopping | transfer
        function: String,

        /// Function arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env().context("reading SHARE_LEDGER_* environment")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        data_dir = ?config.data_dir,
        "Starting share ledger"
    );

    let ledger = RocksLedger::open(&config).context("opening ledger")?;
    let contract = ShareContract::new(ledger, config.rewards.clone())?;
    contract.init().context("running init hook")?;

    let code = match cli.command {
        Command::Init => ExitCode::SUCCESS,
        Command::Invoke { function, args } => {
            let response = contract.handle(&function, args.as_slice());
            if response.is_ok() {
                println!("{}", String::from_utf8_lossy(&response.payload));
                ExitCode::SUCCESS
            } else {
                eprintln!("Error: {}", response.message);
                ExitCode::FAILURE
            }
        }
    };

    if cli.metrics {
        print!("{}", contract.metrics().export());
    }

    Ok(code)
}
