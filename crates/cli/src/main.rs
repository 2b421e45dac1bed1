//! Stockyard CLI - Fixture generation and zone-map rendering tools.
//!
//! # Usage
//!
//! ```bash
//! # Generate demo fixtures for local development and the mock backend
//! stockyard-cli seed --out fixtures/
//!
//! # Render a zone's grid from a fixtures file
//! stockyard-cli map --fixtures fixtures/fixtures.json --zone PICK-A
//!
//! # Only show empty bins, highlight matches for "A-02"
//! stockyard-cli map --fixtures fixtures/fixtures.json --zone PICK-A \
//!     --filter empty --search A-02
//! ```
//!
//! # Commands
//!
//! - `seed` - Generate demo fixture JSON (zones, bins, items, cycles)
//! - `map` - Render a zone grid as text using the same derivation the
//!   server uses

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod fixtures;

#[derive(Parser)]
#[command(name = "stockyard-cli")]
#[command(author, version, about = "Stockyard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate demo fixture JSON
    Seed {
        /// Output directory for fixtures.json
        #[arg(short, long, default_value = "fixtures")]
        out: PathBuf,

        /// Number of zones to generate (first three have fixed layouts)
        #[arg(long, default_value_t = 3)]
        zones: u32,

        /// Percent chance that a bin slot holds a recorded bin
        #[arg(long, default_value_t = 70)]
        fill: u8,
    },
    /// Render a zone grid as text
    Map {
        /// Path to a fixtures.json file
        #[arg(short, long)]
        fixtures: PathBuf,

        /// Zone code (e.g. PICK-A)
        #[arg(short, long)]
        zone: String,

        /// Bin filter: all, empty, occupied, full, blocked
        #[arg(long)]
        filter: Option<String>,

        /// Address substring to highlight
        #[arg(long)]
        search: Option<String>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { out, zones, fill } => commands::seed::run(&out, zones, fill)?,
        Commands::Map {
            fixtures,
            zone,
            filter,
            search,
        } => commands::map::run(&fixtures, &zone, filter.as_deref(), search.as_deref())?,
    }
    Ok(())
}
