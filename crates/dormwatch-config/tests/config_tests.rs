// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the dormwatch configuration system.

use std::collections::HashMap;
use std::path::Path;

use figment::Jail;

use dormwatch_config::diagnostic::ConfigError;
use dormwatch_config::loader::load_config_from_str_with_env;
use dormwatch_config::{
    load_and_validate_str, load_config_from_path, load_config_from_str, ElecSettings,
};

const FULL_TOML: &str = r#"
[log]
level = "debug"

[dingtalk]
webhook = "https://oapi.dingtalk.com/robot/send?access_token=abc"
secret = "SECfromfile"
timeout_secs = 8

[elec]
session_id = "FILESESSION"
max_attempts = 4
retry_delay_ms = 250
low_balance_threshold = 12.5

[[elec.rooms]]
name = "西苑7号楼 1栋609"
building_id = "20161008184448464922"
building = "西苑7号楼"
floor_id = "6"
floor = "6层"
room_id = "20161009111811624619"
room = "1栋609"

[[elec.rooms]]
name = "西苑3号楼 1栋430"
building_id = "20161008182912026394"
building = "西苑3号楼"
floor_id = "4"
floor = "4层"
room_id = "20161008225841597249"
room = "1栋430"

[qmsg]
key = "qmsgkey"
targets = ["10001", "10002"]

[rollcall]
class_name = "网安2401班"
members = ["王瑶", "李甜"]
pending_list_url = "https://i.jielong.com/c/2XVVRCM9S9"
approved_list_url = "https://i.jielong.com/c/2XVJ9YRCS7"
"#;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn valid_toml_deserializes_into_config() {
    let config = load_config_from_str(FULL_TOML).expect("valid TOML should deserialize");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.dingtalk.timeout_secs, 8);
    assert_eq!(config.elec.session_id.as_deref(), Some("FILESESSION"));
    assert_eq!(config.elec.max_attempts, 4);
    assert_eq!(config.elec.retry_delay_ms, 250);
    assert_eq!(config.elec.rooms.len(), 2);
    assert_eq!(config.elec.rooms[1].room, "1栋430");
    // Unset fields keep their defaults.
    assert_eq!(config.elec.timeout_secs, 15);
    assert_eq!(config.elec.aid, "0030000000006001");
    assert_eq!(config.qmsg.targets, vec!["10001", "10002"]);
    assert_eq!(config.rollcall.class_name, "网安2401班");
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("empty config is valid");
    assert_eq!(config.log.level, "info");
    assert_eq!(config.elec.max_attempts, 3);
    assert!(config.dingtalk.webhook.is_none());
    assert!(config.elec.rooms.is_empty());
}

#[test]
fn unknown_field_produces_suggestion() {
    let toml = r#"
[elec]
sesion_id = "abc"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("should produce an UnknownKey error");
    assert_eq!(unknown.0, "sesion_id");
    assert_eq!(unknown.1.as_deref(), Some("session_id"));
}

#[test]
fn room_missing_field_is_reported() {
    let toml = r#"
[[elec.rooms]]
name = "x"
building_id = "1"
building = "b"
floor_id = "1"
floor = "f"
room = "r"
"#;
    let errors = load_and_validate_str(toml).expect_err("room_id is required");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key, .. } if key.ends_with("room_id"))),
        "got: {errors:?}"
    );
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[elec]
max_attempts = "three"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject string attempts");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key == "elec.max_attempts")),
        "got: {errors:?}"
    );
}

#[test]
fn legacy_env_overrides_file_values() {
    let lookup = env(&[
        ("DINGTALK_SECKEY", "SECfromenv"),
        ("JSESSIONID", "0123456789"),
        ("QMSG_TARGET_QQS_JSON", "[123456, \"654321\"]"),
    ]);
    let config = load_config_from_str_with_env(FULL_TOML, lookup).unwrap();
    assert_eq!(config.dingtalk.secret.as_deref(), Some("SECfromenv"));
    // All-digit values stay strings.
    assert_eq!(config.elec.session_id.as_deref(), Some("0123456789"));
    assert_eq!(config.qmsg.targets, vec!["123456", "654321"]);
    // Untouched values come from the file.
    assert_eq!(
        config.dingtalk.webhook.as_deref(),
        Some("https://oapi.dingtalk.com/robot/send?access_token=abc")
    );
}

#[test]
fn blank_legacy_env_is_ignored() {
    let lookup = env(&[("JSESSIONID", "  ")]);
    let config = load_config_from_str_with_env(FULL_TOML, lookup).unwrap();
    assert_eq!(config.elec.session_id.as_deref(), Some("FILESESSION"));
}

#[test]
fn malformed_targets_json_fails_extraction() {
    let lookup = env(&[("QMSG_TARGET_QQS_JSON", "123456,654321")]);
    let err = load_config_from_str_with_env("", lookup).expect_err("not a JSON array");
    let errors = dormwatch_config::diagnostic::figment_to_config_errors(err, &[]);
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key == "qmsg.targets")),
        "got: {errors:?}"
    );
}

#[test]
fn env_only_configuration_resolves_elec_settings() {
    let rooms = r#"
[[elec.rooms]]
name = "西苑7号楼 1栋609"
building_id = "20161008184448464922"
building = "西苑7号楼"
floor_id = "6"
floor = "6层"
room_id = "20161009111811624619"
room = "1栋609"
"#;
    let lookup = env(&[
        ("DINGTALK_WEBHOOK", "https://oapi.dingtalk.com/robot/send?access_token=t"),
        ("DINGTALK_SECKEY", "SECenv"),
        ("JSESSIONID", "SESSION"),
    ]);
    let config = load_config_from_str_with_env(rooms, lookup).unwrap();
    let settings = ElecSettings::from_config(&config).expect("all required values present");
    assert_eq!(settings.rooms[0].name, "西苑7号楼 1栋609");
}

#[test]
fn missing_secrets_are_a_startup_error() {
    let config = load_and_validate_str(FULL_TOML).unwrap();
    let mut config = config;
    config.dingtalk.secret = None;
    let errors = ElecSettings::from_config(&config).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ConfigError::MissingKey { key, env_var } if key == "dingtalk.secret" && env_var.as_deref() == Some("DINGTALK_SECKEY")
    ));
}

#[test]
fn prefixed_env_overrides_numeric_keys() {
    Jail::expect_with(|jail| {
        jail.create_file("dormwatch.toml", "[elec]\nmax_attempts = 2\n")?;
        jail.set_env("DORMWATCH_ELEC_MAX_ATTEMPTS", "5");
        jail.set_env("DORMWATCH_DINGTALK_TIMEOUT_SECS", "9");
        let config = load_config_from_path(Path::new("dormwatch.toml"))?;
        assert_eq!(config.elec.max_attempts, 5);
        assert_eq!(config.dingtalk.timeout_secs, 9);
        Ok(())
    });
}

#[test]
fn prefixed_env_keeps_all_digit_secrets_as_strings() {
    Jail::expect_with(|jail| {
        jail.create_file("dormwatch.toml", "")?;
        jail.set_env("DORMWATCH_DINGTALK_SECRET", "987654");
        jail.set_env("DORMWATCH_ELEC_SESSION_ID", "20240101");
        jail.set_env("DORMWATCH_ELEC_ACCOUNT", "000123");
        let config = load_config_from_path(Path::new("dormwatch.toml"))?;
        assert_eq!(config.dingtalk.secret.as_deref(), Some("987654"));
        assert_eq!(config.elec.session_id.as_deref(), Some("20240101"));
        assert_eq!(config.elec.account, "000123");
        Ok(())
    });
}
