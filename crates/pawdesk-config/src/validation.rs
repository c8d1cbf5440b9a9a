// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that run after deserialization.
//!
//! Serde attributes catch shape problems; these checks catch values that
//! deserialize fine but cannot work, like a bind address that parses as
//! nothing or a log level tracing does not know.

use crate::diagnostic::ConfigError;
use crate::model::PawdeskConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Check every semantic constraint and collect the failures.
///
/// All problems come back in one `Vec` so an operator can fix the whole
/// file in a single pass instead of replaying the load error by error.
pub fn validate_config(config: &PawdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must be non-zero".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level `{}` is not one of {}",
                config.server.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ServerConfig, StorageConfig};

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&PawdeskConfig::default()).is_ok());
    }

    #[test]
    fn empty_host_and_bad_level_are_both_reported() {
        let config = PawdeskConfig {
            server: ServerConfig {
                host: "  ".into(),
                port: 8460,
                log_level: "loud".into(),
            },
            storage: StorageConfig::default(),
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].to_string().contains("server.host"));
        assert!(errors[1].to_string().contains("log_level"));
    }

    #[test]
    fn zero_port_is_rejected() {
        let config = PawdeskConfig {
            server: ServerConfig {
                port: 0,
                ..ServerConfig::default()
            },
            storage: StorageConfig::default(),
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("port"));
    }

    #[test]
    fn empty_database_path_is_rejected() {
        let config = PawdeskConfig {
            server: ServerConfig::default(),
            storage: StorageConfig {
                database_path: "".into(),
            },
        };
        assert!(validate_config(&config).is_err());
    }
}
