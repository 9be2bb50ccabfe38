// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DingTalk robot notifier implementing the shared [`Notifier`] trait.

use std::time::Duration;

use async_trait::async_trait;
use dormwatch_core::{DeliveryResult, DormwatchError, NotificationMessage, Notifier, SinkKind};
use dormwatch_security::redact;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::signing::signed_url;

/// Markdown message as accepted by the robot endpoint.
#[derive(Debug, Serialize)]
struct MarkdownPayload<'a> {
    msgtype: &'static str,
    markdown: MarkdownBody<'a>,
}

#[derive(Debug, Serialize)]
struct MarkdownBody<'a> {
    title: &'a str,
    text: &'a str,
}

/// Posts signed markdown messages to one DingTalk group robot.
#[derive(Debug)]
pub struct DingTalkNotifier {
    client: reqwest::Client,
    webhook: String,
    signing_key: SecretString,
}

impl DingTalkNotifier {
    /// Creates a notifier for the robot at `webhook` (which carries the
    /// `access_token` query parameter).
    pub fn new(
        webhook: impl Into<String>,
        signing_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, DormwatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DormwatchError::http(format!("failed to build HTTP client: {e}"), e))?;

        Ok(Self {
            client,
            webhook: webhook.into(),
            signing_key,
        })
    }

    /// Delivers `message` signed with the given timestamp.
    pub async fn notify_at(&self, message: &NotificationMessage, timestamp_ms: i64) -> DeliveryResult {
        let secret = self.signing_key.expose_secret();
        let secrets = [secret.to_string()];

        let url = match signed_url(&self.webhook, timestamp_ms, secret) {
            Ok(url) => url,
            Err(e) => {
                return DeliveryResult::TransportError {
                    cause: e.to_string(),
                };
            }
        };

        let payload = MarkdownPayload {
            msgtype: "markdown",
            markdown: MarkdownBody {
                title: &message.title,
                text: &message.body,
            },
        };

        debug!(title = %message.title, "posting to dingtalk robot");
        let response = match self.client.post(&url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                let cause = redact(&e.to_string(), &secrets);
                warn!(title = %message.title, error = %cause, "dingtalk request failed");
                return DeliveryResult::TransportError { cause };
            }
        };

        let status = response.status();
        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(_) => {
                warn!(title = %message.title, status = %status, "dingtalk response is not JSON");
                return DeliveryResult::Rejected {
                    reason: format!("HTTP {status}: response is not JSON"),
                };
            }
        };

        let result = interpret(status, &body);
        match &result {
            DeliveryResult::Delivered => info!(title = %message.title, "dingtalk message delivered"),
            other => warn!(title = %message.title, result = %other, "dingtalk message not delivered"),
        }
        result
    }
}

/// Maps the robot's `{errcode, errmsg}` answer to a delivery result.
fn interpret(status: reqwest::StatusCode, body: &serde_json::Value) -> DeliveryResult {
    let Some(errcode) = body.get("errcode").and_then(serde_json::Value::as_i64) else {
        return DeliveryResult::Rejected {
            reason: format!("HTTP {status}: response has no errcode"),
        };
    };
    if errcode == 0 {
        return DeliveryResult::Delivered;
    }
    let reason = body
        .get("errmsg")
        .and_then(serde_json::Value::as_str)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("errcode {errcode}"));
    DeliveryResult::Rejected { reason }
}

#[async_trait]
impl Notifier for DingTalkNotifier {
    fn name(&self) -> &str {
        "dingtalk"
    }

    fn kind(&self) -> SinkKind {
        SinkKind::DingTalk
    }

    async fn notify(&self, message: &NotificationMessage) -> DeliveryResult {
        self.notify_at(message, chrono::Utc::now().timestamp_millis())
            .await
    }
}
