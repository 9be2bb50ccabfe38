// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the one-card portal's room balance endpoint.
//!
//! Provides [`BalanceClient`] which handles the form envelope, the session
//! cookie, response classification, and the retry loop around the one known
//! transient server message.

use std::time::Duration;

use dormwatch_core::{DormwatchError, QueryOutcome};
use dormwatch_security::redact;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE, USER_AGENT};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use crate::classify::{classify, parse_remaining_units, MessageClass};
use crate::types::{QueryRequest, RetryPolicy};

/// Number of characters of a non-JSON body kept for diagnostics.
pub const PREVIEW_CHARS: usize = 300;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// The portal only answers requests that look like its in-app browser.
const PORTAL_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 12; SM-F926U Build/V417IR; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/101.0.4951.61 Safari/537.36 MicroMessenger/8.0.58.2841(0x28003A52) WeChat/arm64 Weixin NetType/WIFI Language/zh_CN ABI/arm64";

/// HTTP client for balance queries.
#[derive(Debug, Clone)]
pub struct BalanceClient {
    client: reqwest::Client,
}

impl BalanceClient {
    /// Creates a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, DormwatchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
        );
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        headers.insert(USER_AGENT, HeaderValue::from_static(PORTAL_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| DormwatchError::http(format!("failed to build HTTP client: {e}"), e))?;

        Ok(Self { client })
    }

    /// Runs one query to completion.
    ///
    /// Only the transient server message is retried, at most
    /// `policy.max_attempts` requests in total with `policy.retry_delay`
    /// between them. Transport errors, non-2xx statuses, malformed bodies and
    /// unrecognized messages end the query immediately. This never returns an
    /// error: every failure is a [`QueryOutcome::Failure`].
    pub async fn query(&self, request: &QueryRequest, policy: &RetryPolicy) -> QueryOutcome {
        let label = request.room.label.as_str();
        let body = match request.form_body() {
            Ok(body) => body,
            Err(e) => return QueryOutcome::terminal(e.to_string()),
        };
        let cookie = match HeaderValue::from_str(&format!(
            "JSESSIONID={}",
            request.session_id.expose_secret()
        )) {
            Ok(value) => value,
            Err(_) => {
                return QueryOutcome::terminal("session credential contains invalid characters");
            }
        };
        let secrets = [request.session_id.expose_secret().to_string()];

        let max_attempts = policy.max_attempts.max(1);
        let mut last_message = String::new();

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                warn!(room = label, attempt, max_attempts, "transient server condition, retrying");
                tokio::time::sleep(policy.retry_delay).await;
            }

            debug!(room = label, attempt, endpoint = %request.endpoint, "sending balance query");
            let response = match self
                .client
                .post(&request.endpoint)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .header(COOKIE, cookie.clone())
                .body(body.clone())
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    return QueryOutcome::terminal(redact(
                        &format!("network request failed: {e}"),
                        &secrets,
                    ));
                }
            };

            let status = response.status();
            debug!(room = label, attempt, status = %status, "balance response received");
            if !status.is_success() {
                return QueryOutcome::terminal(format!("query endpoint returned HTTP {status}"));
            }

            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    return QueryOutcome::terminal(redact(
                        &format!("failed to read response body: {e}"),
                        &secrets,
                    ));
                }
            };

            let payload: serde_json::Value = match serde_json::from_str(&text) {
                Ok(payload) => payload,
                Err(_) => {
                    let preview = body_preview(&text);
                    warn!(room = label, "balance response is not JSON");
                    return QueryOutcome::terminal(format!(
                        "malformed response (not JSON), body preview:\n```\n{preview}\n```"
                    ));
                }
            };

            let message = status_message(&payload);
            match classify(message, &policy.transient_message) {
                MessageClass::Transient => {
                    last_message = message.to_string();
                    continue;
                }
                MessageClass::Terminal => return interpret(label, message),
            }
        }

        warn!(room = label, max_attempts, "transient condition persisted, giving up");
        QueryOutcome::terminal(last_message)
    }
}

/// The free-text status message, or `""` when the payload has none.
fn status_message(payload: &serde_json::Value) -> &str {
    payload
        .pointer("/query_elec_roominfo/errmsg")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
}

fn interpret(label: &str, message: &str) -> QueryOutcome {
    match parse_remaining_units(message) {
        Some(remaining_units) => {
            info!(room = label, %remaining_units, "balance query succeeded");
            QueryOutcome::Success {
                room_label: label.to_string(),
                remaining_units,
            }
        }
        None if message.is_empty() => {
            QueryOutcome::terminal("server response carried no status message")
        }
        None => QueryOutcome::terminal(message),
    }
}

/// First [`PREVIEW_CHARS`] characters of `body`.
pub fn body_preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}
