use serde::Deserialize;
use validator::Validate;

use super::non_empty;
use crate::schema::Listing;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListing {
    #[serde(default)]
    #[validate(range(min = 1, message = "is required"))]
    pub room_price: i64,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub location: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub room_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub room_bed_type: String,
    /// Optional remote URL or `data:` URI of the listing image.
    pub room_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListing {
    pub room_price: Option<i64>,
    pub location: Option<String>,
    pub room_name: Option<String>,
    pub room_bed_type: Option<String>,
    pub room_image: Option<String>,
}

impl UpdateListing {
    pub fn take_image(&mut self) -> Option<String> {
        non_empty(self.room_image.take())
    }

    pub fn apply(self, listing: &mut Listing) {
        if let Some(price) = self.room_price.filter(|v| *v != 0) {
            listing.room_price = price;
        }
        if let Some(location) = non_empty(self.location) {
            listing.location = location;
        }
        if let Some(room_name) = non_empty(self.room_name) {
            listing.room_name = room_name;
        }
        if let Some(bed_type) = non_empty(self.room_bed_type) {
            listing.room_bed_type = bed_type;
        }
    }
}
