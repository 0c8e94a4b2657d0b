use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "is required"),
        email(message = "must be a valid email address")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: i64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date_of_birth: String,
}

impl std::fmt::Debug for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Register")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize, Validate)]
pub struct Login {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Used by both `forget-password` and `verify-account`.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailOnly {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub email: String,
}

#[derive(Deserialize, Validate)]
pub struct ResetPassword {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

impl std::fmt::Debug for ResetPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPassword")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_requires_email_and_password() {
        let form: Register = serde_json::from_str(r#"{ "firstName": "Chi" }"#).unwrap();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));

        let form: Register =
            serde_json::from_str(r#"{ "email": "a@b.com", "password": "secret123" }"#).unwrap();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let form: Register =
            serde_json::from_str(r#"{ "email": "nada_neutho", "password": "secret123" }"#)
                .unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let form: Login =
            serde_json::from_str(r#"{ "email": "a@b.com", "password": "secret123" }"#).unwrap();
        assert!(!format!("{form:?}").contains("secret123"));
    }
}
