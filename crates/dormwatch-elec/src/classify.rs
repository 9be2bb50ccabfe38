// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interpretation of the portal's free-text status message.
//!
//! The endpoint answers HTTP 200 for everything, so this message is the only
//! carrier of both the balance and every error condition.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// `剩余购电量:<N>度`, where `<N>` is digits with an optional fractional part.
static BALANCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"剩余购电量:(\d+\.?\d*)度").unwrap());

/// How a server message affects the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    /// The known "temporary device/network issue" message. Worth another attempt.
    Transient,
    /// Anything else, successful or not. Never retried.
    Terminal,
}

/// Classify a server message by exact comparison with the transient literal.
///
/// Other messages are terminal even when they look temporary.
pub fn classify(message: &str, transient_message: &str) -> MessageClass {
    if message == transient_message {
        MessageClass::Transient
    } else {
        MessageClass::Terminal
    }
}

/// Extract the remaining balance from a server message.
///
/// Returns `None` when the pattern is absent or the number does not fit a
/// [`Decimal`]; callers must then report a failure.
pub fn parse_remaining_units(message: &str) -> Option<Decimal> {
    let captures = BALANCE_PATTERN.captures(message)?;
    let number = captures.get(1)?.as_str().trim_end_matches('.');
    Decimal::from_str(number).ok()
}
