use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::types::id::{marker::UserMarker, Id};

/// Every account is created with this role.
pub const DEFAULT_ROLE: &str = "GUEST";

#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id<UserMarker>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: i64,
    pub location: String,
    pub date_of_birth: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
