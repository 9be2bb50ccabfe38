// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Required-ness is job specific and lives in [`crate::settings`].

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::DormwatchConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or every collected error
/// (does not fail fast).
pub fn validate_config(config: &DormwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::validation(format!(
            "log.level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.log.level
        )));
    }

    if let Some(webhook) = config.dingtalk.webhook.as_deref()
        && !webhook.trim().is_empty()
    {
        check_http_url("dingtalk.webhook", webhook, &mut errors);
    }
    check_http_url("elec.endpoint", &config.elec.endpoint, &mut errors);
    check_http_url("qmsg.endpoint", &config.qmsg.endpoint, &mut errors);
    for (key, value) in [
        ("rollcall.pending_list_url", &config.rollcall.pending_list_url),
        ("rollcall.approved_list_url", &config.rollcall.approved_list_url),
    ] {
        if let Some(url) = value.as_deref() {
            check_http_url(key, url, &mut errors);
        }
    }

    if config.elec.max_attempts < 1 {
        errors.push(ConfigError::validation(
            "elec.max_attempts must be at least 1, got 0",
        ));
    }

    let threshold = config.elec.low_balance_threshold;
    if !threshold.is_finite() || threshold < 0.0 {
        errors.push(ConfigError::validation(format!(
            "elec.low_balance_threshold must be a non-negative number, got {threshold}"
        )));
    }

    for (key, secs) in [
        ("dingtalk.timeout_secs", config.dingtalk.timeout_secs),
        ("elec.timeout_secs", config.elec.timeout_secs),
        ("qmsg.timeout_secs", config.qmsg.timeout_secs),
        ("rollcall.timeout_secs", config.rollcall.timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ConfigError::validation(format!(
                "{key} must be greater than 0"
            )));
        }
    }

    let mut seen_names = HashSet::new();
    for (i, room) in config.elec.rooms.iter().enumerate() {
        for (field, value) in [
            ("name", &room.name),
            ("building_id", &room.building_id),
            ("floor_id", &room.floor_id),
            ("room_id", &room.room_id),
        ] {
            if value.trim().is_empty() {
                errors.push(ConfigError::validation(format!(
                    "elec.rooms[{i}].{field} must not be empty"
                )));
            }
        }
        if !room.name.trim().is_empty() && !seen_names.insert(room.name.as_str()) {
            errors.push(ConfigError::validation(format!(
                "duplicate room name `{}` in [[elec.rooms]]",
                room.name
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(key: &str, value: &str, errors: &mut Vec<ConfigError>) {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => errors.push(ConfigError::validation(format!(
            "{key} must use http or https, got `{}`",
            parsed.scheme()
        ))),
        Err(e) => errors.push(ConfigError::validation(format!(
            "{key} `{value}` is not a valid URL: {e}"
        ))),
    }
}
