use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_new_stay"))]
pub struct CreateBooking {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub room_id: String,
    #[validate(required(message = "is required"))]
    pub check_in: Option<DateTime<Utc>>,
    #[validate(required(message = "is required"))]
    pub check_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_changed_stay"))]
pub struct UpdateBooking {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub room_id: String,
    #[validate(required(message = "is required"))]
    pub check_in: Option<DateTime<Utc>>,
    #[validate(required(message = "is required"))]
    pub check_out: Option<DateTime<Utc>>,
}

fn validate_new_stay(form: &CreateBooking) -> Result<(), ValidationError> {
    validate_stay(form.check_in, form.check_out)
}

fn validate_changed_stay(form: &UpdateBooking) -> Result<(), ValidationError> {
    validate_stay(form.check_in, form.check_out)
}

fn validate_stay(
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) if check_out <= check_in => {
            let mut error = ValidationError::new("stay");
            error.message = Some(Cow::Borrowed("checkOut must be after checkIn"));
            Err(error)
        }
        _ => Ok(()),
    }
}
