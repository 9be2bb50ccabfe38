// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job-specific settings resolved from a validated [`DormwatchConfig`].
//!
//! The model keeps every secret optional so one file can serve both jobs.
//! Each job resolves its own settings once at startup; a missing required
//! value is reported here, before any network call is made.

use std::collections::BTreeSet;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;

use crate::diagnostic::ConfigError;
use crate::model::{DormwatchConfig, RoomConfig};

/// Everything the electricity balance job needs.
#[derive(Debug)]
pub struct ElecSettings {
    pub webhook: String,
    pub signing_key: SecretString,
    pub session_id: SecretString,
    pub endpoint: String,
    pub aid: String,
    pub account: String,
    pub area: String,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub query_timeout: Duration,
    pub notify_timeout: Duration,
    pub low_balance_threshold: Decimal,
    pub room_interval: Duration,
    pub alert_delay: Duration,
    pub transient_message: String,
    pub rooms: Vec<RoomConfig>,
}

impl ElecSettings {
    /// Resolve the balance job settings, collecting every missing value.
    pub fn from_config(config: &DormwatchConfig) -> Result<Self, Vec<ConfigError>> {
        let mut errors = Vec::new();

        let webhook = required(
            config.dingtalk.webhook.as_deref(),
            "dingtalk.webhook",
            "DINGTALK_WEBHOOK",
            &mut errors,
        );
        let signing_key = required(
            config.dingtalk.secret.as_deref(),
            "dingtalk.secret",
            "DINGTALK_SECKEY",
            &mut errors,
        );
        let session_id = required(
            config.elec.session_id.as_deref(),
            "elec.session_id",
            "JSESSIONID",
            &mut errors,
        );
        if config.elec.rooms.is_empty() {
            errors.push(ConfigError::missing("elec.rooms", None));
        }

        let low_balance_threshold = match Decimal::try_from(config.elec.low_balance_threshold) {
            Ok(value) => value,
            Err(e) => {
                errors.push(ConfigError::validation(format!(
                    "elec.low_balance_threshold is not representable as a decimal: {e}"
                )));
                Decimal::ZERO
            }
        };

        match (webhook, signing_key, session_id) {
            (Some(webhook), Some(signing_key), Some(session_id)) if errors.is_empty() => {
                Ok(Self {
                    webhook,
                    signing_key: SecretString::from(signing_key),
                    session_id: SecretString::from(session_id),
                    endpoint: config.elec.endpoint.clone(),
                    aid: config.elec.aid.clone(),
                    account: config.elec.account.clone(),
                    area: config.elec.area.clone(),
                    max_attempts: config.elec.max_attempts.max(1),
                    retry_delay: Duration::from_millis(config.elec.retry_delay_ms),
                    query_timeout: Duration::from_secs(config.elec.timeout_secs),
                    notify_timeout: Duration::from_secs(config.dingtalk.timeout_secs),
                    low_balance_threshold,
                    room_interval: Duration::from_millis(config.elec.room_interval_ms),
                    alert_delay: Duration::from_millis(config.elec.alert_delay_ms),
                    transient_message: config.elec.transient_message.clone(),
                    rooms: config.elec.rooms.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Everything the roll-call job needs.
#[derive(Debug)]
pub struct RollcallSettings {
    pub qmsg_endpoint: String,
    pub qmsg_key: SecretString,
    pub targets: Vec<String>,
    pub notify_timeout: Duration,
    pub send_interval: Duration,
    pub class_name: String,
    pub members: BTreeSet<String>,
    pub pending_list_url: String,
    pub approved_list_url: String,
    pub fetch_timeout: Duration,
}

impl RollcallSettings {
    /// Resolve the roll-call job settings, collecting every missing value.
    pub fn from_config(config: &DormwatchConfig) -> Result<Self, Vec<ConfigError>> {
        let mut errors = Vec::new();

        let qmsg_key = required(config.qmsg.key.as_deref(), "qmsg.key", "QMSG_KEY", &mut errors);

        let targets: Vec<String> = config
            .qmsg
            .targets
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if targets.is_empty() {
            errors.push(ConfigError::missing(
                "qmsg.targets",
                Some("QMSG_TARGET_QQS_JSON"),
            ));
        }

        let pending_list_url = required_no_env(
            config.rollcall.pending_list_url.as_deref(),
            "rollcall.pending_list_url",
            &mut errors,
        );
        let approved_list_url = required_no_env(
            config.rollcall.approved_list_url.as_deref(),
            "rollcall.approved_list_url",
            &mut errors,
        );

        let members: BTreeSet<String> = config
            .rollcall
            .members
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if members.is_empty() {
            errors.push(ConfigError::missing("rollcall.members", None));
        }

        match (qmsg_key, pending_list_url, approved_list_url) {
            (Some(key), Some(pending_list_url), Some(approved_list_url)) if errors.is_empty() => {
                Ok(Self {
                    qmsg_endpoint: config.qmsg.endpoint.clone(),
                    qmsg_key: SecretString::from(key),
                    targets,
                    notify_timeout: Duration::from_secs(config.qmsg.timeout_secs),
                    send_interval: Duration::from_millis(config.qmsg.send_interval_ms),
                    class_name: config.rollcall.class_name.clone(),
                    members,
                    pending_list_url,
                    approved_list_url,
                    fetch_timeout: Duration::from_secs(config.rollcall.timeout_secs),
                })
            }
            _ => Err(errors),
        }
    }
}

fn required(
    value: Option<&str>,
    key: &str,
    env_var: &str,
    errors: &mut Vec<ConfigError>,
) -> Option<String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Some(v.to_string()),
        None => {
            errors.push(ConfigError::missing(key, Some(env_var)));
            None
        }
    }
}

fn required_no_env(
    value: Option<&str>,
    key: &str,
    errors: &mut Vec<ConfigError>,
) -> Option<String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Some(v.to_string()),
        None => {
            errors.push(ConfigError::missing(key, None));
            None
        }
    }
}
