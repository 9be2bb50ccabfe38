// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! source spans and "did you mean?" suggestions (Jaro-Winkler similarity),
//! and carries the job-specific "required value missing" errors.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity below which no correction is offered.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(dormwatch::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(dormwatch::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A value the selected job cannot run without is absent or blank.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(dormwatch::config::missing_key),
        help("{}", format_missing_key_help(key, env_var.as_deref()))
    )]
    MissingKey {
        key: String,
        /// Bare environment variable that can supply the value, if any.
        env_var: Option<String>,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(dormwatch::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(dormwatch::config::other))]
    Other(String),
}

impl ConfigError {
    /// Missing-key error for a value that also has a bare environment variable.
    pub fn missing(key: &str, env_var: Option<&str>) -> Self {
        Self::MissingKey {
            key: key.to_string(),
            env_var: env_var.map(str::to_string),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    suggestion.map_or_else(
        || format!("keys allowed here: {valid_keys}"),
        |s| format!("did you mean `{s}`? Keys allowed here: {valid_keys}"),
    )
}

fn format_missing_key_help(key: &str, env_var: Option<&str>) -> String {
    match env_var {
        Some(var) => format!("add `{key} = <value>` to dormwatch.toml or set {var}"),
        None => format!("add `{key} = <value>` to dormwatch.toml"),
    }
}

/// Split a `figment::Error` (which may chain several) into diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = find_source_span(&error, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => {
                let mut path: Vec<String> = error.path.clone();
                path.push(field.to_string());
                ConfigError::missing(&path.join("."), None)
            }
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Locate an unknown key in the TOML file figment says it came from.
fn find_source_span(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some(figment::Source::File(origin)) = error.metadata.as_ref().and_then(|m| m.source.as_ref())
    else {
        return (None, None);
    };
    let origin = origin.display().to_string();

    toml_sources
        .iter()
        .find(|(name, _)| *name == origin)
        .and_then(|(name, content)| {
            let offset = find_key_offset(content, &error.path, field)?;
            Some((
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(name, content.clone())),
            ))
        })
        .unwrap_or((None, None))
}

/// Byte offset of `field` inside the section named by `path`.
///
/// For `path = ["elec"]` and `field = "sesion_id"`, finds the `[elec]` header
/// (or an `[[elec.*]]` array header) and searches for the key after it.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = if path.is_empty() {
        0
    } else {
        let table = format!("[{}]", path.join("."));
        let array = format!("[[{}]]", path.join("."));
        content
            .find(&array)
            .map(|pos| pos + array.len())
            .or_else(|| content.find(&table).map(|pos| pos + table.len()))?
    };

    let mut line_start = search_start;
    for line in content[search_start..].split_inclusive('\n') {
        let key = line.trim_start();
        let is_assignment = key
            .strip_prefix(field)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if is_assignment {
            return Some(line_start + (line.len() - key.len()));
        }
        line_start += line.len();
    }

    None
}

/// Closest valid key by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr through miette's graphical report handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("dormwatch: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_session_id_for_typo() {
        let valid = &["session_id", "endpoint", "max_attempts"];
        assert_eq!(
            suggest_key("sesion_id", valid),
            Some("session_id".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["webhook", "secret", "timeout_secs"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[dingtalk]\nwebhok = \"x\"\n";
        let path = vec!["dingtalk".to_string()];
        let o = find_key_offset(content, &path, "webhok").unwrap();
        assert_eq!(&content[o..o + 6], "webhok");
    }

    #[test]
    fn find_key_offset_in_array_of_tables() {
        let content = "[elec]\nmax_attempts = 3\n\n[[elec.rooms]]\nname = \"a\"\nroom_idd = \"1\"\n";
        let path = vec!["elec".to_string(), "rooms".to_string()];
        let o = find_key_offset(content, &path, "room_idd").unwrap();
        assert_eq!(&content[o..o + 8], "room_idd");
    }

    #[test]
    fn missing_key_help_names_env_var() {
        let err = ConfigError::missing("elec.session_id", Some("JSESSIONID"));
        let help = miette::Diagnostic::help(&err).unwrap().to_string();
        assert!(help.contains("JSESSIONID"), "got: {help}");
        assert_eq!(err.to_string(), "missing required key `elec.session_id`");
    }
}
