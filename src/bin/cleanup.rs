// One-shot retention sweep, meant to be run from cron.
use chrono::Utc;
use clap::Parser;
use jihwa_core::config::KioskConfig;
use jihwa_core::logger::init_logger;
use jihwa_core::persistence::CardStore;
use jihwa_core::Result;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "jihwa-cleanup")]
#[command(about = "Delete saved cards older than the retention period")]
struct Args {
    /// Path to the TOML config file. Falls back to kiosk.toml when it exists.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    match run(args.config.as_deref()) {
        Ok(deleted) => info!(deleted, "cleanup complete"),
        Err(e) => {
            error!(error = %e, "cleanup failed");
            std::process::exit(1);
        }
    }
}

fn run(config_path: Option<&Path>) -> Result<usize> {
    let config = KioskConfig::resolve(config_path)?;
    let store = CardStore::open(&config.store_dir, config.retention()?)?;
    store.evict_expired(Utc::now())
}
