// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Roll-call job: summarize both lists and send the result to every recipient.

use dormwatch_config::RollcallSettings;
use dormwatch_core::{DeliveryResult, NotificationMessage, Notifier};
use dormwatch_rollcall::{failure_message, take_attendance, RosterSource};
use dormwatch_security::redact;
use tracing::{error, info, warn};

/// Counters for one roll-call run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RollcallRun {
    /// Whether the lists were read; otherwise the failure message was sent.
    pub summarized: bool,
    pub delivered: usize,
    pub undelivered: usize,
}

/// Builds the message for this run: the summary, or the failure notice.
pub async fn rollcall_message(
    settings: &RollcallSettings,
    source: &dyn RosterSource,
) -> (NotificationMessage, bool) {
    match take_attendance(
        source,
        settings.members.len(),
        &settings.pending_list_url,
        &settings.approved_list_url,
    )
    .await
    {
        Ok(summary) => (summary.message(&settings.class_name), true),
        Err(e) => {
            let detail = redact(&e.to_string(), &[]);
            error!(error = %detail, "failed to read sign-up lists");
            (failure_message(&detail), false)
        }
    }
}

/// Runs the roll-call job, sending to each notifier in turn.
pub async fn run_rollcall(
    settings: &RollcallSettings,
    source: &dyn RosterSource,
    notifiers: &[Box<dyn Notifier>],
) -> RollcallRun {
    let (message, summarized) = rollcall_message(settings, source).await;
    let mut run = RollcallRun {
        summarized,
        ..RollcallRun::default()
    };

    info!(title = %message.title, recipients = notifiers.len(), "sending roll-call");
    for (index, notifier) in notifiers.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(settings.send_interval).await;
        }
        match notifier.notify(&message).await {
            DeliveryResult::Delivered => run.delivered += 1,
            other => {
                run.undelivered += 1;
                warn!(sink = notifier.name(), sink_kind = %notifier.kind(), result = %other, "roll-call not delivered");
            }
        }
    }

    run
}
