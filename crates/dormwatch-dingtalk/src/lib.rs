// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DingTalk custom robot notifier.
//!
//! Messages are posted as markdown to the robot webhook. Every request
//! carries a fresh millisecond timestamp and its HMAC signature.

pub mod notifier;
pub mod signing;

pub use notifier::DingTalkNotifier;
pub use signing::{encode_sign, sign, signed_url};
