// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier trait for outbound message sinks (DingTalk robot, Qmsg, ...).

use async_trait::async_trait;

use crate::types::{DeliveryResult, NotificationMessage, SinkKind};

/// A fire-once notification sink.
///
/// Implementations never return an error and never retry: every outcome,
/// including transport failures, is reported through [`DeliveryResult`].
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable name of this sink instance, used in logs.
    fn name(&self) -> &str;

    /// Which sink implementation this is.
    fn kind(&self) -> SinkKind;

    /// Delivers one message.
    async fn notify(&self, message: &NotificationMessage) -> DeliveryResult;
}
