use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::{Room, User};
use crate::types::id::{
    marker::{BookingMarker, RoomMarker, UserMarker},
    Id,
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Id<BookingMarker>,
    pub room_id: Id<RoomMarker>,
    /// Always the subject of the token that made the booking.
    pub guest_id: Id<UserMarker>,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub booking_date: DateTime<Utc>,
    pub booking_updated_date: DateTime<Utc>,
}

/// A booking together with the room and guest it refers to. Either
/// may be `null` if the record was deleted after the booking was made.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub room: Option<Room>,
    pub guest: Option<User>,
}
