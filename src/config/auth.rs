use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::auth::TokenKeys;
use crate::util::Sensitive;

#[derive(Debug, Deserialize, Validate)]
pub struct Auth {
    /// Secret used to sign identity tokens.
    ///
    /// **Environment variables**:
    /// - `INNKEEP_AUTH_JWT_SECRET` or `JWT_SECRET`
    #[validate(custom = "validate_jwt_secret")]
    pub jwt_secret: Sensitive<String>,
}

impl Auth {
    pub const MIN_SECRET_LEN: usize = 12;

    #[must_use]
    pub fn token_keys(&self) -> TokenKeys {
        TokenKeys::new(self.jwt_secret.as_bytes())
    }
}

fn validate_jwt_secret(value: &Sensitive<String>) -> Result<(), ValidationError> {
    if value.len() < Auth::MIN_SECRET_LEN {
        return Err(ValidationError::new("JWT secret must be at least 12 characters long"));
    }
    Ok(())
}
