// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading through Figment.
//!
//! Files merge along the XDG hierarchy: `./pawdesk.toml` >
//! `~/.config/pawdesk/pawdesk.toml` > `/etc/pawdesk/pawdesk.toml`, with
//! `PAWDESK_` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is foreign, cannot box it behind the API

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PawdeskConfig;

/// Load configuration from the XDG hierarchy plus environment overrides.
///
/// Later layers win: compiled defaults, then the system file, the user
/// XDG file, the local `./pawdesk.toml`, and finally `PAWDESK_*`
/// environment variables.
pub fn load_config() -> Result<PawdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used by tests and anywhere the caller already holds the file contents.
pub fn load_config_from_str(toml_content: &str) -> Result<PawdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PawdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<PawdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PawdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The merged Figment before extraction, exposed so diagnostics can
/// inspect provider metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PawdeskConfig::default()))
        .merge(Toml::file("/etc/pawdesk/pawdesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("pawdesk/pawdesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("pawdesk.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys containing
/// underscores stay intact: `PAWDESK_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("PAWDESK_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped,
        // e.g. PAWDESK_SERVER_LOG_LEVEL -> "server_log_level".
        let mapped = key
            .as_str()
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
