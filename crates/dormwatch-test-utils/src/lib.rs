// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for dormwatch integration tests.
//!
//! - [`MockNotifier`] - Notification sink with message capture and scripted results

pub mod mock_notifier;

pub use mock_notifier::MockNotifier;
