use serde::Serialize;
use sqlx::FromRow;

use crate::types::id::{marker::RoomMarker, Id};

#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Id<RoomMarker>,
    /// Secure URL returned by the media provider.
    pub room_image: Option<String>,
    pub room_name: String,
    pub room_facilities: Vec<String>,
    pub room_booking_status: String,
    pub room_floor: i64,
    pub room_block: String,
    pub room_number: i64,
    pub room_category: String,
}
