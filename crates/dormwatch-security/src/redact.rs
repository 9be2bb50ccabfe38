// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for log output and forwarded error messages.
//!
//! Two complementary mechanisms:
//! 1. **Pattern-based**: credential shapes that show up inside URLs and
//!    headers (`access_token=`, `sign=`, `JSESSIONID=`, Qmsg `/send/<key>`).
//! 2. **Exact-match**: the configured secret values themselves.

use std::io::Write;
use std::sync::{Arc, LazyLock, RwLock};

use regex::Regex;

/// The redaction placeholder.
const REDACTED: &str = "[REDACTED]";

/// Credential shapes with the part to keep in group 1.
static REDACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // DingTalk robot URLs: ?access_token=...&timestamp=...&sign=...
        Regex::new(r#"((?:access_token|sign)=)[^&\s)"']+"#).unwrap(),
        // Session cookie header values.
        Regex::new(r#"(JSESSIONID=)[^;\s"']+"#).unwrap(),
        // Qmsg API key embedded as a path segment.
        Regex::new(r"(/send/)[A-Za-z0-9]+").unwrap(),
    ]
});

/// Redact secrets from a string using known patterns and exact secret values.
///
/// Exact values are replaced longest first so a secret that contains another
/// secret is removed whole.
pub fn redact(input: &str, secrets: &[String]) -> String {
    let mut result = input.to_string();

    for pattern in REDACTION_PATTERNS.iter() {
        result = pattern
            .replace_all(&result, format!("${{1}}{REDACTED}"))
            .into_owned();
    }

    let mut sorted: Vec<&String> = secrets.iter().collect();
    sorted.sort_by_key(|v| std::cmp::Reverse(v.len()));
    for value in sorted {
        if !value.is_empty() {
            result = result.replace(value.as_str(), REDACTED);
        }
    }

    result
}

/// A writer wrapper that redacts secrets from output.
///
/// Installed as the tracing writer so a secret that leaks into a log field
/// is replaced before it reaches stderr.
pub struct RedactingWriter<W> {
    inner: W,
    secrets: Arc<RwLock<Vec<String>>>,
}

impl<W: Write> RedactingWriter<W> {
    /// Create a new redacting writer.
    pub fn new(inner: W, secrets: Arc<RwLock<Vec<String>>>) -> Self {
        Self { inner, secrets }
    }

    /// Add a secret value to the shared redaction list.
    pub fn add_secret(secrets: &Arc<RwLock<Vec<String>>>, value: String) {
        if value.is_empty() {
            return;
        }
        if let Ok(mut values) = secrets.write()
            && !values.contains(&value)
        {
            values.push(value);
        }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let input = String::from_utf8_lossy(buf);
        let secrets = self
            .secrets
            .read()
            .map(|v| v.clone())
            .unwrap_or_default();
        let redacted = redact(&input, &secrets);
        self.inner.write_all(redacted.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
