// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Qmsg notifier: one instance per QQ recipient.

use std::time::Duration;

use async_trait::async_trait;
use dormwatch_core::{DeliveryResult, DormwatchError, NotificationMessage, Notifier, SinkKind};
use dormwatch_security::redact;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::format::flatten_markdown;

/// Reason reported when the service refuses without saying why.
const UNKNOWN_REASON: &str = "未知错误";

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// Sends flattened text to one QQ account through Qmsg.
#[derive(Debug)]
pub struct QmsgNotifier {
    client: reqwest::Client,
    endpoint: String,
    key: SecretString,
    recipient: String,
    name: String,
}

impl QmsgNotifier {
    /// Creates a notifier for a single recipient.
    pub fn new(
        endpoint: &str,
        key: &SecretString,
        recipient: &str,
        timeout: Duration,
    ) -> Result<Self, DormwatchError> {
        let client = build_client(timeout)?;
        Ok(Self::with_client(client, endpoint, key, recipient))
    }

    /// Creates one notifier per recipient, all sharing a connection pool.
    pub fn for_recipients(
        endpoint: &str,
        key: &SecretString,
        recipients: &[String],
        timeout: Duration,
    ) -> Result<Vec<Self>, DormwatchError> {
        let client = build_client(timeout)?;
        Ok(recipients
            .iter()
            .map(|recipient| Self::with_client(client.clone(), endpoint, key, recipient))
            .collect())
    }

    fn with_client(
        client: reqwest::Client,
        endpoint: &str,
        key: &SecretString,
        recipient: &str,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key: SecretString::from(key.expose_secret().to_string()),
            recipient: recipient.to_string(),
            name: format!("qmsg:{recipient}"),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, DormwatchError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DormwatchError::http(format!("failed to build HTTP client: {e}"), e))
}

#[async_trait]
impl Notifier for QmsgNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Qmsg
    }

    async fn notify(&self, message: &NotificationMessage) -> DeliveryResult {
        let key = self.key.expose_secret();
        let secrets = [key.to_string()];
        let url = format!("{}/{key}", self.endpoint);

        let text = flatten_markdown(&message.title, &message.body);
        let body = match serde_urlencoded::to_string(vec![
            ("qq", self.recipient.as_str()),
            ("msg", text.as_str()),
        ]) {
            Ok(body) => body,
            Err(e) => {
                return DeliveryResult::Rejected {
                    reason: format!("failed to encode message: {e}"),
                };
            }
        };

        debug!(recipient = %self.recipient, title = %message.title, "posting to qmsg");
        let response = match self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let cause = redact(&e.to_string(), &secrets);
                warn!(recipient = %self.recipient, error = %cause, "qmsg request failed");
                return DeliveryResult::TransportError { cause };
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(recipient = %self.recipient, status = %status, "qmsg returned an error status");
            return DeliveryResult::Rejected {
                reason: format!("HTTP {status}"),
            };
        }

        let result = match response.json::<SendResponse>().await {
            Ok(SendResponse { success: true, .. }) => DeliveryResult::Delivered,
            Ok(SendResponse { reason, .. }) => DeliveryResult::Rejected {
                reason: reason
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| UNKNOWN_REASON.to_string()),
            },
            Err(_) => DeliveryResult::Rejected {
                reason: format!("HTTP {status}: response is not JSON"),
            },
        };

        match &result {
            DeliveryResult::Delivered => info!(recipient = %self.recipient, "qmsg message delivered"),
            other => warn!(recipient = %self.recipient, result = %other, "qmsg message not delivered"),
        }
        result
    }
}
