// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rich config diagnostics: figment failures rendered through miette.
//!
//! A failed load surfaces as a list of `ConfigError`s. An unknown key gets
//! a "did you mean?" suggestion via Jaro-Winkler similarity and, when the
//! offending file is known, a source span pointing at the key itself.

#![allow(unused_assignments)] // the Diagnostic derive trips this lint

use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Candidates below this Jaro-Winkler score are noise, not typos.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// One problem with the loaded configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(pawdesk::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, when one plausibly matches the typo.
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("key `{key}` has the wrong type: found {actual}")]
    #[diagnostic(code(pawdesk::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        actual: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(pawdesk::config::missing_key),
        help("add `{key} = <value>` to your pawdesk.toml")
    )]
    MissingKey { key: String },

    #[error("validation error: {message}")]
    #[diagnostic(code(pawdesk::config::validation))]
    Validation { message: String },

    /// Catch-all for figment errors with no dedicated rendering.
    #[error("configuration error: {0}")]
    #[diagnostic(code(pawdesk::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert every failure inside a `figment::Error` into a `ConfigError`.
///
/// `toml_sources` pairs file paths with their contents so unknown-key
/// errors can carry a span into the file that defined them.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert_error(error, toml_sources))
        .collect()
}

fn convert_error(error: figment::error::Error, toml_sources: &[(String, String)]) -> ConfigError {
    use figment::error::Kind;

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let valid: Vec<&str> = expected.to_vec();
            let located = locate_key(&error, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, &valid),
                valid_keys: valid.join(", "),
                span: located.as_ref().map(|(span, _)| *span),
                src: located.map(|(_, src)| src),
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: field.clone().into_owned(),
        },
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: error.path.join("."),
            actual: actual.to_string(),
            expected: expected.clone(),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Span and source content for a key, when the failing file is one of the
/// collected sources.
fn locate_key(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let metadata = error.metadata.as_ref()?;
    let path = match metadata.source.as_ref()? {
        figment::Source::File(path) => path.display().to_string(),
        _ => return None,
    };
    let (_, content) = toml_sources.iter().find(|(p, _)| *p == path)?;

    let offset = key_offset(content, &error.path, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(path, content.clone()),
    ))
}

/// Byte offset of `field` within `content`, scoped to the `[section]` named
/// by the first element of `path`. With an empty path only keys before the
/// first section header match.
fn key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let wanted = path.first().map(|section| format!("[{section}]"));
    let mut in_section = wanted.is_none();
    let mut offset = 0;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            in_section = wanted.as_deref() == Some(trimmed.trim_end());
        } else if in_section {
            // Match only whole keys, not prefixes of longer ones.
            if let Some(rest) = trimmed.strip_prefix(field) {
                if rest.trim_start().starts_with('=') || rest.is_empty() {
                    return Some(offset + (line.len() - trimmed.len()));
                }
            }
        }
        offset += line.len() + 1;
    }
    None
}

/// The closest valid key to `input` by Jaro-Winkler similarity, if any
/// candidate clears the threshold.
pub fn suggest_key(input: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|candidate| (*candidate, strsim::jaro_winkler(input, candidate)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate.to_string())
}

/// Render configuration errors to stderr as miette graphical reports.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for err in errors {
        let mut rendered = String::new();
        if handler.render_report(&mut rendered, err).is_ok() {
            eprintln!("{rendered}");
        } else {
            eprintln!("{err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_typos_get_a_suggestion() {
        let valid = ["host", "port", "log_level"];
        assert_eq!(suggest_key("prot", &valid), Some("port".to_string()));
        assert_eq!(suggest_key("log_level", &valid), Some("log_level".to_string()));
        // Nothing resembles this; no suggestion.
        assert_eq!(suggest_key("zzz", &valid), None);
    }

    #[test]
    fn key_offset_respects_section_boundaries() {
        let content = "[server]\nhost = \"x\"\nprot = 1\n";
        let path = vec!["server".to_string()];
        let offset = key_offset(content, &path, "prot").unwrap();
        assert_eq!(&content[offset..offset + 4], "prot");
    }

    #[test]
    fn key_offset_does_not_match_longer_keys() {
        let content = "[server]\nportly = 1\n";
        let path = vec!["server".to_string()];
        assert_eq!(key_offset(content, &path, "port"), None);
    }

    #[test]
    fn missing_section_yields_no_offset() {
        let content = "[storage]\ndatabase_path = \"x\"\n";
        let path = vec!["server".to_string()];
        assert_eq!(key_offset(content, &path, "port"), None);
    }

    #[test]
    fn top_level_keys_stop_matching_at_the_first_section() {
        let content = "stray = 1\n[server]\nstray = 2\n";
        assert_eq!(key_offset(content, &[], "stray"), Some(0));
        // Only the [server] copy exists for this one.
        let content = "[server]\nother = 2\n";
        assert_eq!(key_offset(content, &[], "other"), None);
    }
}
