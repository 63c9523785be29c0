// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local inspection of backend-issued session tokens.
//!
//! The client never holds the signing key, so nothing here verifies a token.
//! It only reads the `exp` claim to flag stale credentials in logs.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::Deserialize;

/// The subset of claims the client looks at.
#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Expiry time of a JWT, if `token` is a JWT carrying an `exp` claim.
///
/// Opaque (non-JWT) tokens yield `None`.
pub fn peek_expiry(token: &str) -> Option<DateTime<Utc>> {
    let header = decode_header(token).ok()?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    DateTime::from_timestamp(data.claims.exp?, 0)
}

/// Whether `token` is a JWT that expired before `now`.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    peek_expiry(token).is_some_and(|exp| exp <= now)
}
