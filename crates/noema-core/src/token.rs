//! Signed API keys.
//!
//! Keys are compact HS256 JWTs carrying `{plan, org, iat, exp}`, produced and
//! checked with `jsonwebtoken`. Verification checks the signature and the
//! expiry only; there is no revocation list. Expiry is compared against the
//! caller's `now` rather than the system clock.
//!
//! The storage identity of a key is `key_hash(token)`, never the token itself.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{NoemaError, NoemaResult};

/// Claims carried by an API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyClaims {
    pub plan: String,
    pub org: String,
    pub iat: i64,
    pub exp: i64,
}

/// Result of key issuance, shaped like the `/api/keys/new` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedKey {
    pub api_key: String,
    pub plan: String,
    pub expires_at: i64,
}

/// Issue a key valid for `ttl_hours` from `now` (unix seconds).
pub fn issue(secret: &str, plan: &str, org: &str, ttl_hours: u64, now: i64) -> NoemaResult<IssuedKey> {
    let ttl_secs = i64::try_from(ttl_hours.saturating_mul(3600))
        .map_err(|_| NoemaError::invalid_argument("key ttl out of range"))?;
    let claims = ApiKeyClaims {
        plan: plan.to_string(),
        org: org.to_string(),
        iat: now,
        exp: now.saturating_add(ttl_secs),
    };
    let api_key = sign(secret, &claims)?;
    Ok(IssuedKey {
        api_key,
        plan: claims.plan,
        expires_at: claims.exp,
    })
}

/// Encode and sign arbitrary claims.
pub fn sign(secret: &str, claims: &ApiKeyClaims) -> NoemaResult<String> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| NoemaError::serialization(format!("sign api key: {e}")))
}

/// Verify a key's signature and expiry against `now` (unix seconds).
pub fn verify(secret: &str, token: &str, now: i64) -> NoemaResult<ApiKeyClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;

    let data = jsonwebtoken::decode::<ApiKeyClaims>(
        token.trim(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => NoemaError::unauthorized("invalid signature"),
        ErrorKind::InvalidAlgorithm => NoemaError::unauthorized("invalid algorithm"),
        _ => NoemaError::unauthorized("jwt malformed"),
    })?;

    if data.claims.exp <= now {
        return Err(NoemaError::Expired);
    }
    Ok(data.claims)
}

/// Lowercase hex SHA-256 of the token.
pub fn key_hash(token: &str) -> String {
    let mut h = Sha256::new();
    h.update(token.as_bytes());
    hex::encode(h.finalize())
}
