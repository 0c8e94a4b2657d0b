//! Request bodies accepted by the HTTP API.
//!
//! Required fields default to their empty value when absent from the
//! request body so that a missing field and an empty one are reported
//! the same way, as `<field> is required`.
pub mod auth;
pub mod bookings;
pub mod listings;
pub mod rooms;
pub mod users;

/// Treats an empty string the same as an absent field in partial
/// updates, so clients may send `""` to keep the old value.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
