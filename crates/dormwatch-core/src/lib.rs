// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for dormwatch.
//!
//! This crate provides the error type, the tagged outcome types exchanged
//! between query clients and notifiers, and the [`Notifier`] trait every
//! sink implements.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DormwatchError;
pub use traits::Notifier;
pub use types::{DeliveryResult, NotificationMessage, QueryOutcome, SinkKind};
