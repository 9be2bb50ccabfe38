// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dormitory electricity balance client for the campus one-card portal.
//!
//! The portal exposes one undocumented form-POST endpoint. [`BalanceClient`]
//! rebuilds that request for each configured room and turns the answer into
//! a [`QueryOutcome`](dormwatch_core::QueryOutcome).

pub mod classify;
pub mod client;
pub mod types;

pub use classify::{classify, parse_remaining_units, MessageClass};
pub use client::BalanceClient;
pub use types::{Account, QueryRequest, RetryPolicy, Room};
