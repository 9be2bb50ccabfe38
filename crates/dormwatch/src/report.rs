// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown messages for the balance job.
//!
//! Every function here is pure: the report time is passed in.

use dormwatch_core::{NotificationMessage, QueryOutcome};
use rust_decimal::Decimal;

/// Format used for report timestamps.
pub const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FOOTER_STYLE: &str = "<font color='#808080' size=2>";

/// Regular balance report for one room.
pub fn balance_report(room: &str, remaining_units: Decimal, report_time: &str) -> NotificationMessage {
    let title = format!("电费报告 - {room}");
    let body = format!(
        "### ☀️ 电费小报告\n\n\
         寝室 **{room}** 当前电费情况如下：\n\n\
         ## **剩余电量**: <font color='#228B22' size=5>{remaining_units}</font> 度\n\n\
         > 💡 电量充足，请放心使用。\n\n\
         ***\n\
         {FOOTER_STYLE}报告时间: {report_time}</font>"
    );
    NotificationMessage::new(title, body)
}

/// Follow-up alert sent after the report when the balance is low.
pub fn low_balance_alert(room: &str, remaining_units: Decimal, report_time: &str) -> NotificationMessage {
    let title = format!("⚠️ 电量预警 - {room}");
    let body = format!(
        "### 🚨 {title}\n\n\
         **紧急提醒**：寝室 **{room}** 的电量即将耗尽！\n\n\
         ## **剩余电量**: <font color='#FF0000' size=5>{remaining_units}</font> 度\n\n\
         > 😱 为避免突然断电，请尽快充值。\n\n\
         ***\n\
         {FOOTER_STYLE}预警时间: {report_time}</font>"
    );
    NotificationMessage::new(title, body)
}

/// Sent in place of a report when the query failed.
pub fn query_failure(room: &str, reason: &str, report_time: &str) -> NotificationMessage {
    let title = format!("查询失败 - {room}");
    let body = format!(
        "### 🚨 {title}\n\n\
         未能获取 **{room}** 的电费信息。\n\n\
         **失败详情**:\n\
         > {reason}\n\n\
         **可能原因**:\n\
         > 1. **`JSESSIONID` 已过期** (最常见)。\n\
         > 2. 学校服务器暂时不稳定。\n\n\
         ***\n\
         {FOOTER_STYLE}报告时间: {report_time}</font>"
    );
    NotificationMessage::new(title, body)
}

/// Whether a balance warrants the follow-up alert.
pub fn is_low(remaining_units: Decimal, threshold: Decimal) -> bool {
    remaining_units < threshold
}

/// Messages for one room's outcome, in delivery order.
///
/// The alert, when present, is always second.
pub fn messages_for(
    room: &str,
    outcome: &QueryOutcome,
    threshold: Decimal,
    report_time: &str,
) -> Vec<NotificationMessage> {
    match outcome {
        QueryOutcome::Success {
            room_label,
            remaining_units,
        } => {
            let mut messages = vec![balance_report(room_label, *remaining_units, report_time)];
            if is_low(*remaining_units, threshold) {
                messages.push(low_balance_alert(room_label, *remaining_units, report_time));
            }
            messages
        }
        QueryOutcome::Failure { reason, .. } => vec![query_failure(room, reason, report_time)],
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const TIME: &str = "2026-10-18 21:00:00";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn report_shows_exact_balance_and_time() {
        let msg = balance_report("西苑7号楼 1栋609", dec("33.456"), TIME);
        assert_eq!(msg.title, "电费报告 - 西苑7号楼 1栋609");
        assert!(msg.body.contains(">33.456</font> 度"));
        assert!(msg.body.contains("报告时间: 2026-10-18 21:00:00"));
    }

    #[test]
    fn alert_title_and_body() {
        let msg = low_balance_alert("1栋430", dec("8.5"), TIME);
        assert_eq!(msg.title, "⚠️ 电量预警 - 1栋430");
        assert!(msg.body.starts_with("### 🚨 ⚠️ 电量预警 - 1栋430"));
        assert!(msg.body.contains(">8.5</font> 度"));
    }

    #[test]
    fn failure_includes_reason_and_hint() {
        let msg = query_failure("1栋609", "network request failed: timed out", TIME);
        assert_eq!(msg.title, "查询失败 - 1栋609");
        assert!(msg.body.contains("> network request failed: timed out"));
        assert!(msg.body.contains("JSESSIONID"));
    }

    #[test]
    fn threshold_is_strict() {
        let threshold = dec("10");
        assert!(is_low(dec("9.99"), threshold));
        assert!(!is_low(dec("10"), threshold));
        assert!(!is_low(dec("10.00"), threshold));
    }

    #[test]
    fn low_balance_yields_report_then_alert() {
        let outcome = QueryOutcome::Success {
            room_label: "1栋609".into(),
            remaining_units: dec("8.5"),
        };
        let titles: Vec<String> = messages_for("1栋609", &outcome, dec("10"), TIME)
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, ["电费报告 - 1栋609", "⚠️ 电量预警 - 1栋609"]);
    }

    #[test]
    fn healthy_balance_yields_only_report() {
        let outcome = QueryOutcome::Success {
            room_label: "1栋609".into(),
            remaining_units: dec("120"),
        };
        assert_eq!(messages_for("1栋609", &outcome, dec("10"), TIME).len(), 1);
    }

    #[test]
    fn failure_yields_one_message() {
        let outcome = QueryOutcome::terminal("会话已过期");
        let messages = messages_for("1栋609", &outcome, dec("10"), TIME);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].title, "查询失败 - 1栋609");
    }
}
