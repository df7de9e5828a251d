//! Subject extraction from compact JSON Web Tokens.
//!
//! Only the payload segment is read; signatures are never checked here since
//! the backend remains the authority on token validity.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use log::*;

/// Return the `sub` claim of a `header.payload.signature` token, or an empty
/// string if the token is malformed in any way.
///
/// This never fails: too few segments, bad base64url, invalid JSON and a
/// missing or non-string `sub` all resolve to `""`.
pub fn decode_subject(token: &str) -> String {
    let payload = match token.split('.').nth(1) {
        Some(segment) => segment,
        None => return String::new(),
    };
    let bytes = match decode_segment(payload) {
        Some(bytes) => bytes,
        None => {
            trace!("Token payload is not valid base64url");
            return String::new();
        }
    };
    let claims: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(claims) => claims,
        Err(e) => {
            trace!("Token payload is not valid JSON: {}", e);
            return String::new();
        }
    };
    claims
        .get("sub")
        .and_then(|sub| sub.as_str())
        .map(str::to_owned)
        .unwrap_or_default()
}

// Issuers disagree on whether the payload keeps its '=' padding.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    if segment.ends_with('=') {
        URL_SAFE.decode(segment).ok()
    } else {
        URL_SAFE_NO_PAD.decode(segment).ok()
    }
}
