use serde::Deserialize;

use super::non_empty;
use crate::schema::User;

/// Only profile fields can be changed through `PUT /users/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<i64>,
    pub location: Option<String>,
    pub date_of_birth: Option<String>,
}

impl UpdateUser {
    pub fn apply(self, user: &mut User) {
        if let Some(first_name) = non_empty(self.first_name) {
            user.first_name = first_name;
        }
        if let Some(last_name) = non_empty(self.last_name) {
            user.last_name = last_name;
        }
        if let Some(phone_number) = self.phone_number.filter(|v| *v != 0) {
            user.phone_number = phone_number;
        }
        if let Some(location) = non_empty(self.location) {
            user.location = location;
        }
        if let Some(date_of_birth) = non_empty(self.date_of_birth) {
            user.date_of_birth = date_of_birth;
        }
    }
}
