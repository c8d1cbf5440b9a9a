// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pawdesk - reservation scheduling for pet grooming and boarding.
//!
//! This is the binary entry point for the Pawdesk service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pawdesk_config::PawdeskConfig;
use pawdesk_core::PawdeskError;

mod seed;
mod serve;
mod status;

/// Pawdesk - reservation scheduling for pet grooming and boarding.
#[derive(Parser, Debug)]
#[command(name = "pawdesk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// What the binary can do.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the booking gateway.
    Serve,
    /// Show database row counts and reservation totals.
    Status {
        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective merged configuration as TOML.
    Config,
    /// Load a TOML catalog of stores, customers, pets, pricing, and coupons.
    Seed {
        /// Path to the seed file.
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config problems stop the process before any subcommand runs.
    let config = match pawdesk_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            pawdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status { json }) => status::run_status(&config, json).await,
        Some(Commands::Config) => run_config(&config),
        Some(Commands::Seed { file }) => seed::run_seed(&config, &file).await,
        None => {
            println!("pawdesk: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Runs the `pawdesk config` command: the merged configuration after file
/// hierarchy and environment overrides, rendered back as TOML.
fn run_config(config: &PawdeskConfig) -> Result<(), PawdeskError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| PawdeskError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}
