// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types passed between the query clients, formatters, and notifiers.

use std::fmt;

use rust_decimal::Decimal;
use strum::{Display, EnumString};

/// Result of one balance query run, after any retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The server reported a balance that parsed as a non-negative decimal.
    Success {
        room_label: String,
        remaining_units: Decimal,
    },
    /// Anything else. `reason` is human readable and safe to forward to a chat.
    Failure { reason: String, retryable: bool },
}

impl QueryOutcome {
    /// Builds a terminal failure.
    pub fn terminal(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
            retryable: false,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A message ready for delivery to a notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub title: String,
    /// Markdown body. Sinks without markdown support flatten it.
    pub body: String,
}

impl NotificationMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// What a sink said about one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    /// The sink acknowledged the message.
    Delivered,
    /// The sink answered but refused the message.
    Rejected { reason: String },
    /// The request never got an answer (connect failure, timeout, TLS).
    TransportError { cause: String },
}

impl DeliveryResult {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for DeliveryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => f.write_str("delivered"),
            Self::Rejected { reason } => write!(f, "rejected: {reason}"),
            Self::TransportError { cause } => write!(f, "transport error: {cause}"),
        }
    }
}

/// Identifies a notification sink implementation in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SinkKind {
    DingTalk,
    Qmsg,
    Mock,
}
