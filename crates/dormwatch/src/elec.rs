// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Balance job: query every configured room and report to the sink.

use dormwatch_config::ElecSettings;
use dormwatch_core::{Notifier, QueryOutcome};
use dormwatch_elec::{BalanceClient, QueryRequest, RetryPolicy};
use tracing::{info, warn};

use crate::report::{self, REPORT_TIME_FORMAT};

/// Counters for one balance run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ElecRun {
    pub rooms: usize,
    pub succeeded: usize,
    pub alerts: usize,
    pub undelivered: usize,
}

/// Runs the balance job with the wall clock as report time.
pub async fn run_elec(
    settings: &ElecSettings,
    client: &BalanceClient,
    notifier: &dyn Notifier,
) -> ElecRun {
    run_elec_with_clock(settings, client, notifier, || {
        chrono::Local::now().format(REPORT_TIME_FORMAT).to_string()
    })
    .await
}

/// Runs the balance job, reading the report time from `clock`.
///
/// Rooms are processed one at a time. Delivery failures are logged and
/// counted; they never stop the run.
pub async fn run_elec_with_clock<C>(
    settings: &ElecSettings,
    client: &BalanceClient,
    notifier: &dyn Notifier,
    clock: C,
) -> ElecRun
where
    C: Fn() -> String,
{
    let policy = RetryPolicy::from(settings);
    let mut run = ElecRun::default();
    info!(rooms = settings.rooms.len(), sink_kind = %notifier.kind(), "starting balance run");

    for (index, room) in settings.rooms.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(settings.room_interval).await;
        }
        run.rooms += 1;
        info!(room = %room.name, "processing room");

        let request = QueryRequest::for_room(settings, room);
        let outcome = client.query(&request, &policy).await;
        let report_time = clock();

        if outcome.is_success() {
            run.succeeded += 1;
        }
        match &outcome {
            QueryOutcome::Success {
                remaining_units, ..
            } => {
                info!(room = %room.name, %remaining_units, "balance retrieved");
            }
            QueryOutcome::Failure { reason, .. } => {
                warn!(room = %room.name, reason = %reason, "balance query failed");
            }
        }

        let messages = report::messages_for(
            &room.name,
            &outcome,
            settings.low_balance_threshold,
            &report_time,
        );
        for (position, message) in messages.iter().enumerate() {
            if position > 0 {
                run.alerts += 1;
                info!(room = %room.name, threshold = %settings.low_balance_threshold, "balance below threshold, alerting");
                tokio::time::sleep(settings.alert_delay).await;
            }
            let result = notifier.notify(message).await;
            if !result.is_delivered() {
                run.undelivered += 1;
                warn!(sink = notifier.name(), sink_kind = %notifier.kind(), title = %message.title, result = %result, "notification not delivered");
            }
        }
    }

    info!(
        rooms = run.rooms,
        succeeded = run.succeeded,
        alerts = run.alerts,
        undelivered = run.undelivered,
        "balance run finished"
    );
    run
}
