use serde::Deserialize;
use validator::Validate;

use crate::util::Sensitive;

/// Transactional mail provider settings. Mail is disabled when this
/// section is absent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Mail {
    /// **Environment variables**:
    /// - `INNKEEP_MAIL_API_KEY`
    pub api_key: Sensitive<String>,
    #[serde(default = "Mail::default_api_url")]
    #[validate(url)]
    pub api_url: String,
    #[serde(default = "Mail::default_sender_name")]
    pub sender_name: String,
    #[validate(email)]
    pub sender_email: String,
    /// Base URL of the web client, used for links inside mails.
    #[validate(url)]
    pub frontend_url: String,
}

impl Mail {
    fn default_api_url() -> String {
        "https://api.brevo.com/v3/smtp/email".into()
    }

    fn default_sender_name() -> String {
        "Hotel Booking System".into()
    }
}
