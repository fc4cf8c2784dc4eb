//! Access token expiry inspection
//!
//! The API issues short-lived access tokens and long-lived refresh tokens.
//! The client does not hold the signing secret, so tokens are decoded without
//! signature verification purely to read the `exp` claim and decide whether a
//! refresh exchange is needed before attaching the token to a request.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token pair returned by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer token attached to authenticated requests
    pub access: String,
    /// Long-lived token exchanged for new access tokens
    pub refresh: String,
}

/// Claims the client reads from an access token
#[derive(Debug, Clone, Deserialize)]
pub struct AccessClaims {
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// User id claim, string or numeric depending on the issuer
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
}

/// Decode token claims without verifying the signature.
///
/// Returns `None` for anything that is not a structurally valid JWT.
pub fn decode_unverified(token: &str) -> Option<AccessClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

/// Whether the token is expired (or close enough that it must be refreshed
/// before use). Undecodable tokens count as expired.
pub fn is_expired(token: &str, leeway_secs: u64) -> bool {
    match decode_unverified(token) {
        Some(claims) => claims.exp <= unix_now() + leeway_secs,
        None => true,
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
