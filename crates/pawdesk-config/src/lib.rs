// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Pawdesk booking platform.
//!
//! Layered TOML loading over the XDG hierarchy with `PAWDESK_` environment
//! overrides, strict key checking (`deny_unknown_fields`), semantic
//! validation, and miette diagnostics that point typos at their source
//! line.
//!
//! ```no_run
//! let config = pawdesk_config::load_and_validate().expect("config errors");
//! println!("binding {}:{}", config.server.host, config.server.port);
//! ```

use std::path::PathBuf;

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PawdeskConfig;

/// Load configuration from the XDG hierarchy, then validate it.
///
/// Figment failures come back as diagnostics with source spans; a config
/// that deserializes cleanly still has to pass semantic validation.
pub fn load_and_validate() -> Result<PawdeskConfig, Vec<ConfigError>> {
    let config = loader::load_config()
        .map_err(|err| diagnostic::figment_to_config_errors(err, &collect_toml_sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string, then validate it. Used in tests
/// and anywhere a caller supplies the config explicitly.
pub fn load_and_validate_str(toml_content: &str) -> Result<PawdeskConfig, Vec<ConfigError>> {
    let config = loader::load_config_from_str(toml_content).map_err(|err| {
        let sources = vec![("<inline>".to_string(), toml_content.to_string())];
        diagnostic::figment_to_config_errors(err, &sources)
    })?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Contents of every config file that exists, keyed the way figment names
/// them in error metadata, for span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|dir| dir.join("pawdesk.toml"))
        .unwrap_or_else(|_| PathBuf::from("pawdesk.toml"));
    let user = dirs::config_dir().map(|dir| dir.join("pawdesk/pawdesk.toml"));
    let system = PathBuf::from("/etc/pawdesk/pawdesk.toml");

    [Some(local), user, Some(system)]
        .into_iter()
        .flatten()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}
