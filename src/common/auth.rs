//! JWT request signing and verification
//!
//! Tokens are HS256 with one shared secret per issuer. Besides the usual
//! `iss`/`iat`/`exp` claims every token carries a `qsh` claim, the
//! [`generate_qsh`] of the single request it was minted for.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::common::hash::generate_qsh;

/// Default token lifetime for signed client requests
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60);

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer (application id)
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Query-string hash of the signed request
    pub qsh: String,
}

/// Result of an authentication attempt
#[derive(Debug, PartialEq, Eq)]
pub enum AuthResult {
    /// Token valid for this request; carries the issuer
    Ok(String),
    /// No token provided
    Missing,
    /// Invalid token
    Invalid(String),
    /// Token expired
    Expired,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT error: {0}")]
    JwtError(String),
}

/// Mint a token authorizing exactly one `method` + `path` request
pub fn sign_request(
    issuer: &str,
    secret: &str,
    method: &str,
    path: &str,
    ttl: Duration,
) -> Result<String, AuthError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        iss: issuer.to_string(),
        iat: now,
        exp: now + ttl.as_secs() as i64,
        qsh: generate_qsh(method, path),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::JwtError(e.to_string()))
}

/// Verifies bearer tokens against the configured issuer secrets
#[derive(Debug, Clone, Default)]
pub struct TokenVerifier {
    issuers: HashMap<String, String>,
}

impl TokenVerifier {
    pub fn new(issuers: HashMap<String, String>) -> Self {
        Self { issuers }
    }

    /// Validate `token` for the request whose query-string hash is
    /// `expected_qsh`
    pub fn verify(&self, token: &str, expected_qsh: &str) -> AuthResult {
        // The issuer picks the secret, so it has to be read before the
        // signature can be checked.
        let issuer = match peek_issuer(token) {
            Some(iss) => iss,
            None => return AuthResult::Invalid("Token has no issuer".to_string()),
        };
        let secret = match self.issuers.get(&issuer) {
            Some(secret) => secret,
            None => return AuthResult::Invalid(format!("Unknown issuer: {}", issuer)),
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.leeway = 0;

        let claims = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => data.claims,
            Err(e) => {
                return match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthResult::Expired,
                    _ => AuthResult::Invalid(format!("Invalid JWT: {}", e)),
                }
            }
        };

        if claims.qsh != expected_qsh {
            return AuthResult::Invalid("Query-string hash mismatch".to_string());
        }

        AuthResult::Ok(claims.iss)
    }

    /// Authenticate from an Authorization header value (`Bearer <token>`)
    pub fn authenticate(&self, auth_header: &str, expected_qsh: &str) -> AuthResult {
        let parts: Vec<&str> = auth_header.splitn(2, ' ').collect();
        if parts.len() != 2 {
            return AuthResult::Invalid("Invalid Authorization header format".to_string());
        }

        match parts[0].to_lowercase().as_str() {
            "bearer" => self.verify(parts[1].trim(), expected_qsh),
            _ => AuthResult::Invalid(format!("Unknown auth scheme: {}", parts[0])),
        }
    }
}

/// Read the `iss` claim without checking the signature
fn peek_issuer(token: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Unverified {
        iss: Option<String>,
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<Unverified>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .and_then(|data| data.claims.iss)
}
