use serde::Deserialize;
use validator::Validate;

use super::non_empty;
use crate::schema::Room;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    /// A remote URL or a `data:` URI of the image, uploaded to the
    /// media provider before the room is stored.
    pub room_image: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub room_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub room_facilities: Vec<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub room_booking_status: String,
    #[serde(default)]
    #[validate(range(min = 1, message = "is required"))]
    pub room_floor: i64,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub room_block: String,
    #[serde(default)]
    #[validate(range(min = 1, message = "is required"))]
    pub room_number: i64,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub room_category: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoom {
    pub room_image: Option<String>,
    pub room_name: Option<String>,
    pub room_facilities: Option<Vec<String>>,
    pub room_booking_status: Option<String>,
    pub room_floor: Option<i64>,
    pub room_block: Option<String>,
    pub room_number: Option<i64>,
    pub room_category: Option<String>,
}

impl UpdateRoom {
    /// Takes the new image source out of the form, if any.
    pub fn take_image(&mut self) -> Option<String> {
        non_empty(self.room_image.take())
    }

    pub fn apply(self, room: &mut Room) {
        if let Some(room_name) = non_empty(self.room_name) {
            room.room_name = room_name;
        }
        if let Some(facilities) = self.room_facilities {
            room.room_facilities = facilities;
        }
        if let Some(status) = non_empty(self.room_booking_status) {
            room.room_booking_status = status;
        }
        if let Some(floor) = self.room_floor.filter(|v| *v != 0) {
            room.room_floor = floor;
        }
        if let Some(block) = non_empty(self.room_block) {
            room.room_block = block;
        }
        if let Some(number) = self.room_number.filter(|v| *v != 0) {
            room.room_number = number;
        }
        if let Some(category) = non_empty(self.room_category) {
            room.room_category = category;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::Id;

    fn sample_room() -> Room {
        Room {
            id: Id::generate(),
            room_image: Some("https://img/1.png".into()),
            room_name: "Deluxe".into(),
            room_facilities: vec!["Wifi".into()],
            room_booking_status: "Available".into(),
            room_floor: 1,
            room_block: "A".into(),
            room_number: 101,
            room_category: "Single".into(),
        }
    }

    #[test]
    fn test_partial_update_keeps_old_values() {
        let mut room = sample_room();
        let form: UpdateRoom =
            serde_json::from_str(r#"{ "roomName": "Suite", "roomBlock": "", "roomFloor": 0 }"#)
                .unwrap();

        form.apply(&mut room);
        assert_eq!(room.room_name, "Suite");
        assert_eq!(room.room_block, "A");
        assert_eq!(room.room_floor, 1);
        assert_eq!(room.room_facilities, vec!["Wifi".to_string()]);
    }

    #[test]
    fn test_create_requires_fields() {
        let form: CreateRoom = serde_json::from_str(r#"{ "roomName": "Suite" }"#).unwrap();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("room_facilities"));
        assert!(fields.contains_key("room_floor"));
        assert!(!fields.contains_key("room_name"));
        assert!(!fields.contains_key("room_image"));
    }
}
