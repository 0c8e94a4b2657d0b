use serde::Serialize;
use sqlx::FromRow;

use crate::types::id::{marker::ListingMarker, Id};

#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Id<ListingMarker>,
    pub location: String,
    pub room_name: String,
    pub room_price: i64,
    pub room_image: Option<String>,
    pub room_bed_type: String,
}
