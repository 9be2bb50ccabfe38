// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for dormwatch.

use thiserror::Error;

/// The error type shared by client constructors and job runners.
///
/// Query and delivery failures are not errors at this level: they are
/// carried as [`QueryOutcome::Failure`](crate::types::QueryOutcome) and
/// [`DeliveryResult`](crate::types::DeliveryResult) values so a run always
/// reaches its notification step.
#[derive(Debug, Error)]
pub enum DormwatchError {
    /// Configuration errors (missing secrets, invalid header values, bad URLs).
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client construction or request failures outside the query/notify contracts.
    #[error("http error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Remote content could not be interpreted (HTML, JSON).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DormwatchError {
    /// Wraps a reqwest error with a short description of what was attempted.
    pub fn http<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Http {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
