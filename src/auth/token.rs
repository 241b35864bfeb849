//! Decoding of the bearer tokens issued by the expense API.
//!
//! The client never verifies the token signature, that is the API's job. It
//! only reads the payload to learn who is logged in and when the token expires.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::Error;

/// The claims the client reads from a token payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    /// The username of the token holder.
    pub sub: String,
    /// The expiry time as seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// The expiry time of the token.
    ///
    /// # Errors
    /// Returns [Error::InvalidToken] if `exp` is out of range.
    pub fn expires_at(&self) -> Result<OffsetDateTime, Error> {
        OffsetDateTime::from_unix_timestamp(self.exp)
            .map_err(|error| Error::InvalidToken(format!("invalid expiry {}: {error}", self.exp)))
    }
}

/// Decode the payload of a JWT without verifying its signature.
///
/// # Errors
/// Returns [Error::InvalidToken] if the token does not have three segments,
/// the payload is not base64url or the payload JSON is missing `sub` or `exp`.
pub fn decode_token(token: &str) -> Result<Claims, Error> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(Error::InvalidToken(format!(
            "expected 3 segments, got {}",
            segments.len()
        )));
    }

    // Some issuers keep the padding even though JWTs should omit it.
    let payload = segments[1].trim_end_matches('=');
    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|error| Error::InvalidToken(format!("payload is not base64url: {error}")))?;

    serde_json::from_slice(&decoded)
        .map_err(|error| Error::InvalidToken(format!("invalid payload: {error}")))
}
