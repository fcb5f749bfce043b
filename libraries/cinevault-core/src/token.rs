//! Bearer token inspection.
//!
//! The token is opaque to CineVault except for its `exp` claim, which is read
//! to decide whether a stored session is still usable. The signature is never
//! verified here; only the API can do that.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

/// The claims CineVault reads from a session token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (Unix seconds)
    pub exp: i64,

    /// Issued at (Unix seconds)
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Expiry as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Decode the claims of a JWT without verifying its signature.
///
/// Returns `None` for anything that is not a structurally valid JWT with a
/// numeric `exp` claim.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    match decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            debug!(error = %e, "Session token could not be decoded");
            None
        }
    }
}

/// Whether the token is unusable at `now`: undecodable, or `exp` not in the future.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token).and_then(|claims| claims.expires_at()) {
        Some(expires_at) => expires_at <= now,
        None => true,
    }
}
