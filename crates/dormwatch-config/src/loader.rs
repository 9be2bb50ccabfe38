// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dormwatch.toml` > `~/.config/dormwatch/dormwatch.toml`
//! > `/etc/dormwatch/dormwatch.toml`, with `DORMWATCH_` environment overrides
//! and the bare variable names the scheduled jobs have always been given
//! (`DINGTALK_WEBHOOK`, `JSESSIONID`, ...).

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DormwatchConfig;

/// Bare environment variables and the config keys they set.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("DINGTALK_WEBHOOK", "dingtalk.webhook"),
    ("DINGTALK_SECKEY", "dingtalk.secret"),
    ("JSESSIONID", "elec.session_id"),
    ("QMSG_KEY", "qmsg.key"),
];

/// Config keys whose `DORMWATCH_` values are kept as raw strings.
const STRING_ENV_KEYS: &[&str] = &[
    "log.level",
    "dingtalk.webhook",
    "dingtalk.secret",
    "elec.session_id",
    "elec.endpoint",
    "elec.aid",
    "elec.account",
    "elec.area",
    "elec.transient_message",
    "qmsg.key",
    "qmsg.endpoint",
    "rollcall.class_name",
    "rollcall.pending_list_url",
    "rollcall.approved_list_url",
];

const ENV_PREFIX: &str = "DORMWATCH_";

/// Bare environment variable holding the Qmsg recipients as a JSON array.
const LEGACY_TARGETS_VAR: &str = "QMSG_TARGET_QQS_JSON";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dormwatch/dormwatch.toml` (system-wide)
/// 3. `~/.config/dormwatch/dormwatch.toml` (user XDG config)
/// 4. `./dormwatch.toml` (local directory)
/// 5. `DORMWATCH_*` environment variables (string keys verbatim)
/// 6. Bare legacy environment variables
pub fn load_config() -> Result<DormwatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no environment).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<DormwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DormwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a TOML string plus legacy variables resolved through `lookup`.
pub fn load_config_from_str_with_env<F>(
    toml_content: &str,
    lookup: F,
) -> Result<DormwatchConfig, figment::Error>
where
    F: Fn(&str) -> Option<String>,
{
    Figment::new()
        .merge(Serialized::defaults(DormwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(legacy_env(lookup))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DormwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DormwatchConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(string_env(|var| std::env::var(var).ok()))
        .merge(legacy_env(|var| std::env::var(var).ok()))
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(DormwatchConfig::default()))
        .merge(Toml::file("/etc/dormwatch/dormwatch.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dormwatch/dormwatch.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dormwatch.toml"))
        .merge(env_provider())
        .merge(string_env(|var| std::env::var(var).ok()))
        .merge(legacy_env(|var| std::env::var(var).ok()))
}

/// Create the `DORMWATCH_` environment provider for non-string keys.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `DORMWATCH_ELEC_MAX_ATTEMPTS` must map to `elec.max_attempts`,
/// not `elec.max.attempts`. String keys are left to [`string_env`] since
/// `Env` parses `987654` into an integer.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .map(|key| env_key(key.as_str()).into())
        .filter(|key| !STRING_ENV_KEYS.contains(&key.as_str()))
}

/// Map a prefix-stripped variable name such as `ELEC_MAX_ATTEMPTS` to its
/// dotted config key.
fn env_key(var: &str) -> String {
    var.to_ascii_lowercase()
        .replacen("log_", "log.", 1)
        .replacen("dingtalk_", "dingtalk.", 1)
        .replacen("elec_", "elec.", 1)
        .replacen("qmsg_", "qmsg.", 1)
        .replacen("rollcall_", "rollcall.", 1)
}

/// Build a Figment layer from the string-typed `DORMWATCH_` variables.
///
/// Values are inserted verbatim, blank values are ignored.
pub fn string_env<F>(lookup: F) -> Figment
where
    F: Fn(&str) -> Option<String>,
{
    STRING_ENV_KEYS.iter().fold(Figment::new(), |figment, key| {
        let var = format!("{ENV_PREFIX}{}", key.replace('.', "_").to_ascii_uppercase());
        match lookup(&var).filter(|v| !v.trim().is_empty()) {
            Some(value) => figment.merge(Serialized::default(key, value)),
            None => figment,
        }
    })
}

/// Build a Figment layer from the bare legacy environment variables.
///
/// Values are inserted verbatim as strings; unlike [`Env`], nothing is
/// parsed, so an all-digit session id or key stays a string. Blank values are
/// ignored. An unparseable `QMSG_TARGET_QQS_JSON` is inserted as a raw string
/// so extraction fails with a type error naming `qmsg.targets`.
pub fn legacy_env<F>(lookup: F) -> Figment
where
    F: Fn(&str) -> Option<String>,
{
    let mut figment = Figment::new();

    for &(var, key) in LEGACY_ENV_KEYS {
        if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
            figment = figment.merge(Serialized::default(key, value));
        }
    }

    if let Some(raw) = lookup(LEGACY_TARGETS_VAR).filter(|v| !v.trim().is_empty()) {
        figment = match parse_targets(&raw) {
            Some(targets) => figment.merge(Serialized::default("qmsg.targets", targets)),
            None => figment.merge(Serialized::default("qmsg.targets", raw)),
        };
    }

    figment
}

/// Parse a JSON array of recipient ids. Numbers and strings are both accepted.
fn parse_targets(raw: &str) -> Option<Vec<String>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
    values
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_key_lowercases_before_mapping() {
        assert_eq!(env_key("ELEC_MAX_ATTEMPTS"), "elec.max_attempts");
        assert_eq!(env_key("DINGTALK_TIMEOUT_SECS"), "dingtalk.timeout_secs");
        assert_eq!(env_key("ROLLCALL_PENDING_LIST_URL"), "rollcall.pending_list_url");
        assert_eq!(env_key("LOG_LEVEL"), "log.level");
    }

    #[test]
    fn every_string_key_round_trips_through_env_key() {
        for key in STRING_ENV_KEYS {
            let var = key.replace('.', "_").to_ascii_uppercase();
            assert_eq!(env_key(&var), *key);
        }
    }

    #[test]
    fn string_env_keeps_digits_as_text() {
        let config: DormwatchConfig = Figment::new()
            .merge(Serialized::defaults(DormwatchConfig::default()))
            .merge(string_env(|var| match var {
                "DORMWATCH_DINGTALK_SECRET" => Some("987654".to_string()),
                "DORMWATCH_ELEC_SESSION_ID" => Some("0012".to_string()),
                "DORMWATCH_QMSG_KEY" => Some("   ".to_string()),
                _ => None,
            }))
            .extract()
            .unwrap();
        assert_eq!(config.dingtalk.secret.as_deref(), Some("987654"));
        assert_eq!(config.elec.session_id.as_deref(), Some("0012"));
        assert_eq!(config.qmsg.key, None);
    }

    #[test]
    fn parse_targets_accepts_numbers_and_strings() {
        assert_eq!(
            parse_targets(r#"[12345, "67890"]"#),
            Some(vec!["12345".to_string(), "67890".to_string()])
        );
    }

    #[test]
    fn parse_targets_rejects_non_arrays_and_nested_values() {
        assert_eq!(parse_targets("12345"), None);
        assert_eq!(parse_targets(r#"[[1]]"#), None);
        assert_eq!(parse_targets("not json"), None);
    }
}
