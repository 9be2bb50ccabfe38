// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions shared by the sink crates.

pub mod notifier;

pub use notifier::Notifier;
