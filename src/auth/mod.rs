//! Credential and token handling.
//!
//! Passwords are stored as Argon2id hashes and are only ever checked
//! through [`password::verify`]. Identity tokens are stateless HS256
//! JWTs that expire [`token::TOKEN_LIFETIME_SECS`] after issuance.
pub mod password;
pub mod token;

pub use password::PasswordError;
pub use token::{authorize_admin, issue_token, validate_token, AuthError, Claims, TokenKeys};
