//! Request authentication and integrity.
//!
//! Every request carries a bearer token, a unix timestamp, a single-use
//! nonce, and an HMAC-SHA256 signature over the canonical string
//! `"<ts>\n<nonce>\n<hex(sha256(body))>"`. Signature and token comparisons
//! are constant time.

use crate::error::ValidationError;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Shared authentication settings for both sides of the protocol.
#[derive(Debug, Clone)]
pub struct McpAuthConfig {
    /// Shared bearer token for caller identity.
    pub auth_token: String,
    /// Shared secret used to sign request bodies.
    pub hmac_secret: String,
    /// Acceptance window for timestamp drift, in seconds.
    pub allowed_clock_skew_seconds: i64,
}

impl McpAuthConfig {
    pub fn new(auth_token: impl Into<String>, hmac_secret: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            hmac_secret: hmac_secret.into(),
            allowed_clock_skew_seconds: 60,
        }
    }

    pub fn with_allowed_clock_skew(mut self, seconds: i64) -> Self {
        self.allowed_clock_skew_seconds = seconds;
        self
    }
}

/// Compute the request signature as a lowercase hex string.
pub fn compute_signature(secret: &str, timestamp: &str, nonce: &str, body: &[u8]) -> String {
    let body_hash = hex::encode(Sha256::digest(body));
    let canonical = format!("{timestamp}\n{nonce}\n{body_hash}");

    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("hmac accepts any key length"));
    mac.update(canonical.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time string equality.
pub fn constant_time_equal(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Parse `Authorization: Bearer <token>`.
pub fn parse_bearer_token(header: &str) -> Result<&str, ValidationError> {
    let mut parts = header.split_whitespace();
    let scheme = parts
        .next()
        .ok_or_else(|| ValidationError::new("invalid authorization header"))?;
    let token = parts
        .next()
        .ok_or_else(|| ValidationError::new("invalid authorization header"))?;
    if parts.next().is_some() {
        return Err(ValidationError::new("invalid authorization header"));
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ValidationError::new("invalid authorization scheme"));
    }
    if token.is_empty() {
        return Err(ValidationError::new("empty token"));
    }
    Ok(token)
}
