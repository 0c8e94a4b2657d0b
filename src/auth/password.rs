use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use error_stack::{Report, Result, ResultExt};
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::util::Sensitive;

// m = 19 MiB, t = 2, p = 1
static CONTEXT: Lazy<Argon2<'static>> = Lazy::new(|| {
    Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::DEFAULT,
    )
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password does not match the stored hash")]
    Mismatch,
    #[error("Stored password hash is malformed")]
    MalformedHash,
    #[error("Failed to generate password hash")]
    Hash,
}

/// Hashes a password with a freshly generated salt.
///
/// Empty passwords are accepted here; request forms reject them
/// before they reach this point.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = CONTEXT
        .hash_password(password.as_bytes(), &salt)
        .change_context(PasswordError::Hash)?;

    Ok(hash.to_string())
}

/// Checks `password` against a hash produced by [`hash`].
pub fn verify(hash: &str, password: &str) -> Result<(), PasswordError> {
    let hash = PasswordHash::new(hash)
        .change_context(PasswordError::MalformedHash)
        .attach_printable("could not parse password hash")?;

    match CONTEXT.verify_password(password.as_bytes(), &hash) {
        Ok(..) => Ok(()),
        Err(argon2::password_hash::Error::Password) => Err(Report::new(PasswordError::Mismatch)),
        Err(error) => Err(error).change_context(PasswordError::MalformedHash),
    }
}

/// [`hash`] on the blocking thread pool.
#[tracing::instrument(skip_all, name = "auth.hash_password")]
pub async fn hash_blocking(password: Sensitive<String>) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash(&password))
        .await
        .change_context(PasswordError::Hash)
        .attach_printable("hashing task panicked")?
}

/// [`verify`] on the blocking thread pool.
#[tracing::instrument(skip_all, name = "auth.verify_password")]
pub async fn verify_blocking(hash: String, password: Sensitive<String>) -> Result<(), PasswordError> {
    tokio::task::spawn_blocking(move || verify(&hash, &password))
        .await
        .change_context(PasswordError::MalformedHash)
        .attach_printable("verification task panicked")?
}
