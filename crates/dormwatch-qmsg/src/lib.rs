// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Qmsg (QQ push) notifier.
//!
//! Qmsg has no markdown support and authenticates by an API key in the URL
//! path, so messages are flattened to plain text and no signature is sent.

pub mod format;
pub mod notifier;

pub use format::flatten_markdown;
pub use notifier::QmsgNotifier;
