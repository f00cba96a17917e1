use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tally_classify::{ClassifierGateway, GroqClient};
use tally_core::RunReport;

mod config;
mod input;
mod pipeline;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Financial documents in, categorized ledger out")]
struct Cli {
    /// Verbose logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dry run: show which parser claims each document
    Extract {
        /// Input directory (default: configured input.dir)
        dir: Option<PathBuf>,
    },

    /// Ingest, classify, and merge into the ledger
    Process {
        /// Input directory (default: configured input.dir)
        dir: Option<PathBuf>,

        /// Ledger store path (default: configured input.ledger)
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Records per classification request
        #[arg(long)]
        batch_size: Option<usize>,

        /// Do not rename ingested files with the -read suffix
        #[arg(long)]
        keep_inputs: bool,
    },

    /// Compute weekly balances and the summary, write report sheets
    Balances {
        /// Ledger store path (default: configured input.ledger)
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Account balance as LABEL=AMOUNT (repeatable; prompts when absent)
        #[arg(long = "account")]
        accounts: Vec<String>,
    },

    /// Process then balances in one go
    Run {
        /// Input directory (default: configured input.dir)
        dir: Option<PathBuf>,

        #[arg(long)]
        ledger: Option<PathBuf>,

        #[arg(long)]
        batch_size: Option<usize>,

        #[arg(long)]
        keep_inputs: bool,

        /// Account balance as LABEL=AMOUNT (repeatable; prompts when absent)
        #[arg(long = "account")]
        accounts: Vec<String>,
    },

    /// Write the default config to ~/.tally/config.toml
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let cfg = config::load_config()?;

    match cli.command {
        Command::Extract { dir } => {
            let dir = dir.unwrap_or_else(|| cfg.input.dir.clone());
            pipeline::extract_preview(&dir)?;
        }

        Command::Process {
            dir,
            ledger,
            batch_size,
            keep_inputs,
        } => {
            let mut run = RunReport::new();
            run_process(&cfg, dir, ledger, batch_size, keep_inputs, &mut run)?;
            print!("{run}");
        }

        Command::Balances { ledger, accounts } => {
            let ledger = ledger.unwrap_or_else(|| cfg.input.ledger.clone());
            let accounts = input::resolve_accounts(&accounts)?;
            pipeline::balances(&ledger, &accounts)?;
        }

        Command::Run {
            dir,
            ledger,
            batch_size,
            keep_inputs,
            accounts,
        } => {
            let ledger_path = ledger.clone().unwrap_or_else(|| cfg.input.ledger.clone());
            let mut run = RunReport::new();
            run_process(&cfg, dir, ledger, batch_size, keep_inputs, &mut run)?;
            let accounts = input::resolve_accounts(&accounts)?;
            pipeline::balances(&ledger_path, &accounts)?;
            print!("{run}");
        }

        Command::InitConfig => {
            config::init_config()?;
        }
    }

    Ok(())
}

fn run_process(
    cfg: &Config,
    dir: Option<PathBuf>,
    ledger: Option<PathBuf>,
    batch_size: Option<usize>,
    keep_inputs: bool,
    run: &mut RunReport,
) -> Result<()> {
    let dir = dir.unwrap_or_else(|| cfg.input.dir.clone());
    let ledger = ledger.unwrap_or_else(|| cfg.input.ledger.clone());
    let mark_read = cfg.input.mark_read && !keep_inputs;

    let gateway = ClassifierGateway::new(build_client(cfg)?)
        .with_batch_size(batch_size.unwrap_or(cfg.classifier.batch_size))
        .with_inter_call_delay(Duration::from_millis(cfg.classifier.inter_call_delay_ms));

    pipeline::process(&dir, &ledger, &gateway, mark_read, run)
}

fn build_client(cfg: &Config) -> Result<GroqClient> {
    let api_key = match &cfg.classifier.api_key {
        Some(k) => k.clone(),
        None => std::env::var("GROQ_API_KEY")
            .context("no classifier API key: set [classifier] api_key or GROQ_API_KEY")?,
    };
    if api_key.trim().is_empty() {
        bail!("classifier API key is empty");
    }
    Ok(GroqClient::new(
        api_key,
        cfg.classifier.model.clone(),
        cfg.classifier.base_url.clone(),
        Duration::from_secs(cfg.classifier.timeout_secs),
    ))
}
