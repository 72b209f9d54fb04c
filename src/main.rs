//! Command-line interface for rowprobe
//!
//! # Usage Examples
//!
//! ## Schema Reflection
//! ```bash
//! # Print the reflected schema as text
//! rowprobe schema --database test.db
//!
//! # Print the reflected schema as JSON
//! rowprobe schema --database test.db --json
//! ```
//!
//! ## Random-Row Sampling
//! ```bash
//! # Sample one random row from a uniformly random table
//! rowprobe sample --database test.db
//!
//! # Sample from a specific table and keep a reproduction record
//! rowprobe sample --database test.db --table users --repro repro.json
//!
//! # Reproducible table choice
//! rowprobe sample --database test.db --seed 42
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rowprobe::{sample_random_row, ReproState, Schema, SqliteRandomRow, SqliteSource};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "rowprobe")]
#[command(about = "Schema reflection and random-row sampling for SQLite databases")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reflect the database schema and print it
    Schema {
        /// Path to the SQLite database file
        #[arg(long, env = "ROWPROBE_DATABASE")]
        database: PathBuf,

        /// Print the schema as pretty JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Sample one uniformly random row and print it
    Sample {
        /// Path to the SQLite database file
        #[arg(long, env = "ROWPROBE_DATABASE")]
        database: PathBuf,

        /// Table to sample from (default: a uniformly random table)
        #[arg(long)]
        table: Option<String>,

        /// Seed for the random table choice, for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Write a JSON reproduction record to this path
        #[arg(long, value_name = "PATH")]
        repro: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schema { database, json } => {
            let conn = open_database(&database)?;
            let mut source = SqliteSource::new(&conn);
            let schema = Schema::reflect(&mut source)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else {
                print!("{schema}");
            }
        }
        Commands::Sample {
            database,
            table,
            seed,
            repro,
        } => {
            let conn = open_database(&database)?;
            let mut source = SqliteSource::new(&conn);
            let schema = Schema::reflect(&mut source)?;

            let target = match &table {
                Some(name) => schema
                    .table_by_name(name)
                    .with_context(|| format!("Table '{name}' not found"))?,
                None => {
                    let mut rng = match seed {
                        Some(seed) => StdRng::seed_from_u64(seed),
                        None => StdRng::from_os_rng(),
                    };
                    schema
                        .random_table(&mut rng)
                        .context("Schema has no tables")?
                }
            };
            info!("Sampling random row from table '{}'", target.name());

            let mut state = ReproState::new();
            let row = sample_random_row(target, &mut source, &SqliteRandomRow, &mut state)?;
            println!("{}: {}", target.name(), row);

            if let Some(path) = repro {
                let record = serde_json::to_string_pretty(&state)?;
                std::fs::write(&path, record).with_context(|| {
                    format!("Failed to write reproduction record to {}", path.display())
                })?;
                info!("Wrote reproduction record to {}", path.display());
            }
        }
    }
    Ok(())
}

/// Open the database read-only; probing must never mutate the target.
fn open_database(path: &Path) -> anyhow::Result<Connection> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open database {}", path.display()))
}
