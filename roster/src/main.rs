//! Menu-driven D&D character roster.
//!
//! Characters are kept in plain-text files in the save directory and loaded
//! at startup. Every change made from the menu is written back immediately.
//!
//! ```bash
//! cargo run -p roster -- --save-dir characters
//! cargo run -p roster -- --export roster.json
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG` or pass `--verbose` for more detail.

mod console;
mod menu;

use clap::Parser;
use console::LineConsole;
use roster_core::{Roster, RosterConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Menu-driven D&D character roster
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author, version, about = "Create, level up and roll for D&D characters", long_about = None)]
struct Args {
    /// Directory holding armors.txt, weapons.txt and the other reference tables
    #[arg(long = "data-dir", env = "ROSTER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory for character files and index.txt
    #[arg(long = "save-dir", env = "ROSTER_SAVE_DIR", default_value = ".")]
    save_dir: PathBuf,

    /// Seed for the dice, for repeatable rolls
    #[arg(long = "seed", env = "ROSTER_SEED")]
    seed: Option<u64>,

    /// Write all character sheets to this JSON file and exit
    #[arg(long = "export")]
    export: Option<PathBuf>,

    /// Log lifecycle events to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn config(&self) -> RosterConfig {
        let mut config = RosterConfig::new().with_save_dir(&self.save_dir);
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(args.verbose);

    let mut roster = Roster::open(&args.config())?;

    if let Some(path) = &args.export {
        roster.export_json(path)?;
        info!(path = %path.display(), characters = roster.len(), "roster exported");
        return Ok(());
    }

    let mut console = LineConsole::stdio();
    menu::run(&mut roster, &mut console)?;
    Ok(())
}
