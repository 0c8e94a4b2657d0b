use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::util::Sensitive;

/// Configuration for connecting to the Postgres database.
#[derive(Debug, Deserialize, Validate)]
pub struct Database {
    /// Connection URL of the Postgres database.
    ///
    /// **Environment variables**:
    /// - `INNKEEP_DB_URL` or `DATABASE_URL`
    #[validate(custom = "validate_postgres_url")]
    pub url: Sensitive<String>,
    /// Maximum amount of connections the pool may open.
    ///
    /// **Environment variables**:
    /// - `INNKEEP_DB_POOL_SIZE`
    #[serde(default = "Database::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// Minimum idle connections kept open.
    ///
    /// **Environment variables**:
    /// - `INNKEEP_DB_MIN_IDLE`
    pub min_idle: Option<NonZeroU32>,
    /// How long a request may wait for a connection.
    ///
    /// **Environment variables**:
    /// - `INNKEEP_DB_TIMEOUT_SECS`
    #[serde(default = "Database::default_timeout_secs")]
    pub timeout_secs: NonZeroU64,
    /// Refuses to connect to the database without TLS.
    ///
    /// **Environment variables**:
    /// - `INNKEEP_DB_ENFORCE_TLS`
    #[serde(default)]
    pub enforce_tls: bool,
}

impl Database {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_TIMEOUT_SECS: u64 = 5;

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.get())
    }

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }
}

fn validate_postgres_url(value: &Sensitive<String>) -> Result<(), ValidationError> {
    match url::Url::parse(value.as_str()) {
        Ok(url) if matches!(url.scheme(), "postgres" | "postgresql") => Ok(()),
        _ => Err(ValidationError::new("invalid Postgres connection URL")),
    }
}
