use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use super::Claims;
use crate::error::AppError;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("token encoding failed: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidToken(_) => AppError::invalid_credentials(),
            other => {
                tracing::error!(error = %other, "credential failure");
                AppError::internal(other.to_string())
            }
        }
    }
}

pub fn now_unix() -> usize {
    chrono::Utc::now().timestamp().max(0) as usize
}

pub fn make_claims(subject: &str, ttl: Duration) -> Claims {
    let iat = now_unix();
    Claims {
        sub: subject.to_string(),
        iat,
        exp: iat.saturating_add(ttl.as_secs() as usize),
    }
}

/// Signs an HS256 token for `subject` valid for `ttl`.
pub fn issue_token(
    keys: &JwtKeys,
    subject: &str,
    ttl: Duration,
) -> Result<String, CredentialError> {
    encode_token(keys, &make_claims(subject, ttl))
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, CredentialError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc).map_err(CredentialError::Encoding)
}

/// Checks signature and expiry (no leeway) and returns the claims.
pub fn verify_token(keys: &JwtKeys, token: &str) -> Result<Claims, CredentialError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(token, &keys.dec, &validation)
        .map(|data| data.claims)
        .map_err(CredentialError::InvalidToken)
}
