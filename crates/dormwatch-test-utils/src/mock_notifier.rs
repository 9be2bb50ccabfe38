// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notification sink for deterministic testing.
//!
//! `MockNotifier` implements `Notifier`, captures every message it is asked
//! to deliver, and answers with scripted results.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dormwatch_core::{DeliveryResult, NotificationMessage, Notifier, SinkKind};

/// A mock sink that records messages.
///
/// Results are popped from a FIFO queue. When the queue is empty the
/// message is reported as delivered.
pub struct MockNotifier {
    name: String,
    sent: Arc<Mutex<Vec<NotificationMessage>>>,
    results: Arc<Mutex<VecDeque<DeliveryResult>>>,
}

impl MockNotifier {
    /// Create a mock sink that delivers everything.
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Create a mock sink with a specific name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sent: Arc::new(Mutex::new(Vec::new())),
            results: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Create a mock sink pre-loaded with the given results.
    pub fn with_results(results: Vec<DeliveryResult>) -> Self {
        Self {
            results: Arc::new(Mutex::new(VecDeque::from(results))),
            ..Self::new()
        }
    }

    /// Queue the result for a future delivery.
    pub async fn push_result(&self, result: DeliveryResult) {
        self.results.lock().await.push_back(result);
    }

    /// All messages passed to `notify()`, in order.
    pub async fn sent_messages(&self) -> Vec<NotificationMessage> {
        self.sent.lock().await.clone()
    }

    /// Titles of all messages passed to `notify()`, in order.
    pub async fn sent_titles(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|m| m.title.clone())
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Mock
    }

    async fn notify(&self, message: &NotificationMessage) -> DeliveryResult {
        self.sent.lock().await.push(message.clone());
        self.results
            .lock()
            .await
            .pop_front()
            .unwrap_or(DeliveryResult::Delivered)
    }
}
