// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for dormwatch.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Default balance query endpoint of the campus one-card portal.
pub const DEFAULT_ELEC_ENDPOINT: &str = "http://wxjdf.tiangong.edu.cn:9910/web/Common/Tsm.html";

/// Server message meaning "temporary device or network problem, try later".
pub const DEFAULT_TRANSIENT_MESSAGE: &str = "设备或网络故障，请稍后再试";

/// Default Qmsg send endpoint; the API key is appended as a path segment.
pub const DEFAULT_QMSG_ENDPOINT: &str = "https://qmsg.zendee.cn/send";

/// Top-level dormwatch configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional; which values are required depends
/// on the job being run (see [`crate::settings`]).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DormwatchConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// DingTalk robot webhook settings.
    #[serde(default)]
    pub dingtalk: DingTalkConfig,

    /// Electricity balance job settings.
    #[serde(default)]
    pub elec: ElecConfig,

    /// Qmsg push settings.
    #[serde(default)]
    pub qmsg: QmsgConfig,

    /// Roll-call job settings.
    #[serde(default)]
    pub rollcall: RollcallConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// DingTalk robot configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DingTalkConfig {
    /// Robot webhook URL including its `access_token` query parameter.
    #[serde(default)]
    pub webhook: Option<String>,

    /// Robot signing secret (the `SEC...` value from the robot settings).
    #[serde(default)]
    pub secret: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_notify_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DingTalkConfig {
    fn default() -> Self {
        Self {
            webhook: None,
            secret: None,
            timeout_secs: default_notify_timeout_secs(),
        }
    }
}

fn default_notify_timeout_secs() -> u64 {
    10
}

/// Electricity balance job configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ElecConfig {
    /// `JSESSIONID` cookie value captured from an authenticated portal session.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Query endpoint URL.
    #[serde(default = "default_elec_endpoint")]
    pub endpoint: String,

    /// One-card application id sent with every query.
    #[serde(default = "default_aid")]
    pub aid: String,

    /// One-card account number sent with every query.
    #[serde(default = "default_account")]
    pub account: String,

    /// Campus area name sent with every query.
    #[serde(default = "default_area")]
    pub area: String,

    /// Total attempts per room when the server reports the transient condition.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_query_timeout_secs")]
    pub timeout_secs: u64,

    /// Balances strictly below this value trigger an extra alert.
    #[serde(default = "default_low_balance_threshold")]
    pub low_balance_threshold: f64,

    /// Delay between rooms, in milliseconds.
    #[serde(default = "default_room_interval_ms")]
    pub room_interval_ms: u64,

    /// Delay between a balance report and its low-balance alert, in milliseconds.
    #[serde(default = "default_alert_delay_ms")]
    pub alert_delay_ms: u64,

    /// Exact server message that is treated as transient and retried.
    #[serde(default = "default_transient_message")]
    pub transient_message: String,

    /// Rooms to query, in order.
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

impl Default for ElecConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            endpoint: default_elec_endpoint(),
            aid: default_aid(),
            account: default_account(),
            area: default_area(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_query_timeout_secs(),
            low_balance_threshold: default_low_balance_threshold(),
            room_interval_ms: default_room_interval_ms(),
            alert_delay_ms: default_alert_delay_ms(),
            transient_message: default_transient_message(),
            rooms: Vec::new(),
        }
    }
}

fn default_elec_endpoint() -> String {
    DEFAULT_ELEC_ENDPOINT.to_string()
}

fn default_aid() -> String {
    "0030000000006001".to_string()
}

fn default_account() -> String {
    "26577".to_string()
}

fn default_area() -> String {
    "天津工业大学".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    5_000
}

fn default_query_timeout_secs() -> u64 {
    15
}

fn default_low_balance_threshold() -> f64 {
    10.0
}

fn default_room_interval_ms() -> u64 {
    3_000
}

fn default_alert_delay_ms() -> u64 {
    2_000
}

fn default_transient_message() -> String {
    DEFAULT_TRANSIENT_MESSAGE.to_string()
}

/// One dormitory room, as identified by the portal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoomConfig {
    /// Display name used in notifications, e.g. `西苑7号楼 1栋609`.
    pub name: String,
    pub building_id: String,
    pub building: String,
    pub floor_id: String,
    pub floor: String,
    pub room_id: String,
    pub room: String,
}

/// Qmsg push configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QmsgConfig {
    /// Qmsg API key.
    #[serde(default)]
    pub key: Option<String>,

    /// QQ numbers that receive every message.
    #[serde(default)]
    pub targets: Vec<String>,

    /// Send endpoint; the key is appended as a path segment.
    #[serde(default = "default_qmsg_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_notify_timeout_secs")]
    pub timeout_secs: u64,

    /// Delay between recipients, in milliseconds.
    #[serde(default = "default_send_interval_ms")]
    pub send_interval_ms: u64,
}

impl Default for QmsgConfig {
    fn default() -> Self {
        Self {
            key: None,
            targets: Vec::new(),
            endpoint: default_qmsg_endpoint(),
            timeout_secs: default_notify_timeout_secs(),
            send_interval_ms: default_send_interval_ms(),
        }
    }
}

fn default_qmsg_endpoint() -> String {
    DEFAULT_QMSG_ENDPOINT.to_string()
}

fn default_send_interval_ms() -> u64 {
    1_000
}

/// Roll-call job configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RollcallConfig {
    /// Class name used in the summary line.
    #[serde(default = "default_class_name")]
    pub class_name: String,

    /// Everyone expected to be present.
    #[serde(default)]
    pub members: Vec<String>,

    /// Daily sign-up page; entries not yet checked in are listed as pending.
    #[serde(default)]
    pub pending_list_url: Option<String>,

    /// Approved-absence page.
    #[serde(default)]
    pub approved_list_url: Option<String>,

    /// Per-page fetch timeout in seconds.
    #[serde(default = "default_query_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RollcallConfig {
    fn default() -> Self {
        Self {
            class_name: default_class_name(),
            members: Vec::new(),
            pending_list_url: None,
            approved_list_url: None,
            timeout_secs: default_query_timeout_secs(),
        }
    }
}

fn default_class_name() -> String {
    "全班".to_string()
}
