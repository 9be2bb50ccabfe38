// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HMAC-SHA256 request signing for DingTalk custom robots.
//!
//! The robot accepts a request when `sign` is
//! `quote_plus(base64(HMAC-SHA256(secret, "{timestamp}\n{secret}")))` and
//! `timestamp` is within an hour of the server clock.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use dormwatch_core::DormwatchError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// The exact bytes that get signed.
pub fn string_to_sign(timestamp_ms: i64, secret: &str) -> String {
    format!("{timestamp_ms}\n{secret}")
}

/// Base64 HMAC-SHA256 signature, before URL encoding.
pub fn sign(timestamp_ms: i64, secret: &str) -> Result<String, DormwatchError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| DormwatchError::Internal(format!("invalid signing key: {e}")))?;
    mac.update(string_to_sign(timestamp_ms, secret).as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

/// Form-style percent encoding: `+` → `%2B`, `/` → `%2F`, `=` → `%3D`.
pub fn encode_sign(signature: &str) -> String {
    url::form_urlencoded::byte_serialize(signature.as_bytes()).collect()
}

/// Appends `timestamp` and `sign` to the robot webhook URL.
pub fn signed_url(base: &str, timestamp_ms: i64, secret: &str) -> Result<String, DormwatchError> {
    let sign = encode_sign(&sign(timestamp_ms, secret)?);
    let separator = if base.contains('?') { '&' } else { '?' };
    Ok(format!("{base}{separator}timestamp={timestamp_ms}&sign={sign}"))
}
