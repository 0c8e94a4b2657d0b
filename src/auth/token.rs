use chrono::Utc;
use error_stack::{Result, ResultExt};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokens are valid for 24 hours after issuance.
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Claims carried by every identity token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Claims {
    /// Account id of the bearer.
    pub sub: String,
    pub is_admin: bool,
    /// Expiry as unix seconds.
    pub exp: i64,
}

/// Reasons a token is rejected. All of them end up as
/// `401 Unauthorized` at the HTTP boundary.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
}

#[derive(Debug, Error)]
#[error("Failed to issue identity token")]
pub struct IssueTokenError;

/// Signing and verification keys derived from the server secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

#[tracing::instrument(skip_all, name = "auth.issue_token")]
pub fn issue_token(
    subject: &str,
    is_admin: bool,
    keys: &TokenKeys,
) -> Result<String, IssueTokenError> {
    issue_token_at(subject, is_admin, keys, Utc::now().timestamp())
}

/// Issues a token as if the current time were `now` (unix seconds).
pub fn issue_token_at(
    subject: &str,
    is_admin: bool,
    keys: &TokenKeys,
    now: i64,
) -> Result<String, IssueTokenError> {
    let claims = Claims {
        sub: subject.to_string(),
        is_admin,
        exp: now + TOKEN_LIFETIME_SECS,
    };

    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
        .change_context(IssueTokenError)
}

pub fn validate_token(token: &str, keys: &TokenKeys) -> std::result::Result<Claims, AuthError> {
    validate_token_at(token, keys, Utc::now().timestamp())
}

/// Validates `token` as if the current time were `now` (unix seconds).
///
/// The signature is checked before the expiry, so a forged token is
/// always reported as [`AuthError::InvalidSignature`].
pub fn validate_token_at(
    token: &str,
    keys: &TokenKeys,
    now: i64,
) -> std::result::Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // expiry is checked below without any leeway
    validation.validate_exp = false;

    let claims = jsonwebtoken::decode::<Claims>(token, &keys.decoding, &validation)
        .map_err(|error| match error.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::Malformed,
        })?
        .claims;

    if now >= claims.exp {
        return Err(AuthError::Expired);
    }

    Ok(claims)
}

/// Returns the admin flag of a valid token. Any validation failure is
/// returned as is and never treated as "not an admin".
pub fn authorize_admin(token: &str, keys: &TokenKeys) -> std::result::Result<bool, AuthError> {
    validate_token(token, keys).map(|claims| claims.is_admin)
}
