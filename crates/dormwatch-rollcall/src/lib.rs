// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evening roll-call.
//!
//! Two sign-up list pages are read: the daily check-in list (whose inactive
//! block holds everyone who has not checked in) and the approved-absence
//! list. The difference becomes a short summary for the class group.

pub mod roster;
pub mod summary;

pub use roster::{extract_names, HttpRosterSource, RosterSource, APPROVED_SELECTOR, PENDING_SELECTOR};
pub use summary::{failure_message, take_attendance, AttendanceSummary};
