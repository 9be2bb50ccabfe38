// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attendance arithmetic and the roll-call messages.

use std::collections::BTreeSet;

use dormwatch_core::{DormwatchError, NotificationMessage};
use tracing::info;

use crate::roster::{RosterSource, APPROVED_SELECTOR, PENDING_SELECTOR};

/// Title used when every roster member is accounted for as present.
pub const ALL_PRESENT_TITLE: &str = "晚点名：全员已到齐";

/// Title of the message sent when the lists could not be read.
pub const FAILURE_TITLE: &str = "考勤脚本执行异常";

/// Outcome of one roll-call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub roster_size: usize,
    /// Pending on the daily list without an approved absence.
    pub unchecked: BTreeSet<String>,
    /// Approved to be away.
    pub approved: BTreeSet<String>,
}

impl AttendanceSummary {
    pub fn compute(
        roster_size: usize,
        pending: &BTreeSet<String>,
        approved: BTreeSet<String>,
    ) -> Self {
        let unchecked = pending.difference(&approved).cloned().collect();
        Self {
            roster_size,
            unchecked,
            approved,
        }
    }

    pub fn absent_count(&self) -> usize {
        self.unchecked.len() + self.approved.len()
    }

    pub fn present_count(&self) -> usize {
        self.roster_size.saturating_sub(self.absent_count())
    }

    pub fn all_present(&self) -> bool {
        self.unchecked.is_empty() && self.approved.is_empty()
    }

    /// The summary message for `class_name`.
    pub fn message(&self, class_name: &str) -> NotificationMessage {
        if self.all_present() {
            return NotificationMessage::new(
                ALL_PRESENT_TITLE,
                format!("**{class_name}今日{}人在校**\n\n", self.roster_size),
            );
        }

        let mut parts = Vec::new();
        if !self.unchecked.is_empty() {
            parts.push(format!("{} 未打卡", join_names(&self.unchecked)));
        }
        if !self.approved.is_empty() {
            parts.push(format!("{} 不在校", join_names(&self.approved)));
        }

        NotificationMessage::new(
            format!("晚点名：{} 人情况汇总", self.absent_count()),
            format!(
                "**{class_name}今日{}人在校**，{}\n\n",
                self.present_count(),
                parts.join("，")
            ),
        )
    }
}

fn join_names(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join("、")
}

/// Message sent instead of a summary when the lists could not be read.
pub fn failure_message(detail: &str) -> NotificationMessage {
    NotificationMessage::new(
        FAILURE_TITLE,
        format!("## ❌ 脚本执行异常\n\n**错误详情**: `{detail}`\n"),
    )
}

/// Reads both lists from `source` and computes the summary.
pub async fn take_attendance(
    source: &dyn RosterSource,
    roster_size: usize,
    pending_list_url: &str,
    approved_list_url: &str,
) -> Result<AttendanceSummary, DormwatchError> {
    let pending = source
        .fetch_names(pending_list_url, PENDING_SELECTOR)
        .await?;
    let approved = source
        .fetch_names(approved_list_url, APPROVED_SELECTOR)
        .await?;

    let summary = AttendanceSummary::compute(roster_size, &pending, approved);
    info!(
        unchecked = summary.unchecked.len(),
        approved = summary.approved.len(),
        present = summary.present_count(),
        "roll-call computed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    struct StaticSource(HashMap<&'static str, Result<BTreeSet<String>, String>>);

    #[async_trait]
    impl RosterSource for StaticSource {
        async fn fetch_names(
            &self,
            url: &str,
            _selector: &str,
        ) -> Result<BTreeSet<String>, DormwatchError> {
            match self.0.get(url) {
                Some(Ok(set)) => Ok(set.clone()),
                Some(Err(e)) => Err(DormwatchError::Internal(e.clone())),
                None => Ok(BTreeSet::new()),
            }
        }
    }

    #[test]
    fn approved_absences_are_not_unchecked() {
        let summary =
            AttendanceSummary::compute(27, &names(&["张三", "李四", "王五"]), names(&["王五"]));
        assert_eq!(summary.unchecked, names(&["张三", "李四"]));
        assert_eq!(summary.absent_count(), 3);
        assert_eq!(summary.present_count(), 24);
    }

    #[test]
    fn everyone_present_message() {
        let summary = AttendanceSummary::compute(27, &BTreeSet::new(), BTreeSet::new());
        assert!(summary.all_present());
        let msg = summary.message("网安2401班");
        assert_eq!(msg.title, ALL_PRESENT_TITLE);
        assert_eq!(msg.body, "**网安2401班今日27人在校**\n\n");
    }

    #[test]
    fn summary_message_lists_sorted_names() {
        let summary = AttendanceSummary::compute(
            27,
            &names(&["李四", "张三"]),
            names(&["王五"]),
        );
        let msg = summary.message("全班");
        assert_eq!(msg.title, "晚点名：3 人情况汇总");

        let unchecked = join_names(&names(&["李四", "张三"]));
        assert_eq!(
            msg.body,
            format!("**全班今日24人在校**，{unchecked} 未打卡，王五 不在校\n\n")
        );
    }

    #[test]
    fn only_approved_absences() {
        let summary = AttendanceSummary::compute(10, &names(&["王五"]), names(&["王五"]));
        assert!(summary.unchecked.is_empty());
        assert!(!summary.all_present());
        let msg = summary.message("全班");
        assert_eq!(msg.title, "晚点名：1 人情况汇总");
        assert_eq!(msg.body, "**全班今日9人在校**，王五 不在校\n\n");
    }

    #[test]
    fn present_count_never_underflows() {
        let summary = AttendanceSummary::compute(1, &names(&["a", "b", "c"]), BTreeSet::new());
        assert_eq!(summary.present_count(), 0);
    }

    #[test]
    fn failure_message_quotes_detail() {
        let msg = failure_message("http error: timed out");
        assert_eq!(msg.title, FAILURE_TITLE);
        assert_eq!(
            msg.body,
            "## ❌ 脚本执行异常\n\n**错误详情**: `http error: timed out`\n"
        );
    }

    #[tokio::test]
    async fn take_attendance_reads_both_lists() {
        let source = StaticSource(HashMap::from([
            ("daily", Ok(names(&["张三", "王五"]))),
            ("approved", Ok(names(&["王五"]))),
        ]));
        let summary = take_attendance(&source, 5, "daily", "approved").await.unwrap();
        assert_eq!(summary.unchecked, names(&["张三"]));
        assert_eq!(summary.approved, names(&["王五"]));
    }

    #[tokio::test]
    async fn take_attendance_propagates_fetch_errors() {
        let source = StaticSource(HashMap::from([(
            "approved",
            Err("connection reset".to_string()),
        )]));
        let err = take_attendance(&source, 5, "daily", "approved")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
