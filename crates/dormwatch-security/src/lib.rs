// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret handling for dormwatch.
//!
//! Webhook URLs, session cookies and API keys end up inside reqwest error
//! strings and log lines. Everything forwarded to a chat or written to
//! stderr passes through [`redact`] first.

pub mod redact;

pub use redact::{redact, RedactingWriter};
