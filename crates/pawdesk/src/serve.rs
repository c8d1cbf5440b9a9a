// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pawdesk serve` command implementation.
//!
//! Opens the SQLite database (running pending migrations), wraps it in the
//! booking engine, and serves the HTTP gateway until SIGINT.

use pawdesk_config::PawdeskConfig;
use pawdesk_core::PawdeskError;
use pawdesk_engine::Engine;
use pawdesk_gateway::{GatewayState, ServerConfig};
use pawdesk_storage::Database;
use tracing::info;

/// Runs the `pawdesk serve` command.
pub async fn run_serve(config: PawdeskConfig) -> Result<(), PawdeskError> {
    init_tracing(&config.server.log_level);

    info!("starting pawdesk serve");

    let db = Database::open(&config.storage.database_path).await?;
    info!(
        path = config.storage.database_path.as_str(),
        "database ready"
    );

    let engine = Engine::new(db);
    let server = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    pawdesk_gateway::start_server(&server, GatewayState::new(engine)).await?;

    info!("pawdesk serve shutdown complete");
    Ok(())
}

/// Tracing setup: the configured level applies to the pawdesk crates,
/// everything else stays at `warn`. `RUST_LOG` overrides the whole filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,pawdesk={log_level},pawdesk_storage={log_level},\
             pawdesk_engine={log_level},pawdesk_gateway={log_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
