// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing setup with secret redaction on the output stream.

use std::sync::{Arc, RwLock};

use dormwatch_config::DormwatchConfig;
use dormwatch_security::RedactingWriter;

/// Configured secret values that must never reach stderr verbatim.
pub fn secret_values(config: &DormwatchConfig) -> Vec<String> {
    [
        config.dingtalk.webhook.as_deref(),
        config.dingtalk.secret.as_deref(),
        config.elec.session_id.as_deref(),
        config.qmsg.key.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_string)
    .collect()
}

/// Builds the default filter directive for `level`.
pub fn default_directive(level: &str) -> String {
    format!("dormwatch={level},warn")
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides `level`.
pub fn init_tracing(level: &str, secrets: Vec<String>) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let shared = Arc::new(RwLock::new(Vec::new()));
    for secret in secrets {
        RedactingWriter::<std::io::Stderr>::add_secret(&shared, secret);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(move || RedactingWriter::new(std::io::stderr(), Arc::clone(&shared)))
        .init();
}
