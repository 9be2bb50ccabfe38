// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job runners behind the `dormwatch` binary.
//!
//! The runners take their sinks and sources as trait objects so the whole
//! flow can be driven from tests against mock servers.

pub mod elec;
pub mod logging;
pub mod report;
pub mod rollcall;

pub use elec::{run_elec, run_elec_with_clock, ElecRun};
pub use rollcall::{rollcall_message, run_rollcall, RollcallRun};
