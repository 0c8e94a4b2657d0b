use serde::Deserialize;
use std::num::NonZeroU64;
use std::time::Duration;
use validator::Validate;

use crate::util::Sensitive;

/// Image hosting settings. Uploads fail with 500 when this section is
/// absent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Media {
    #[validate(length(min = 1))]
    pub cloud_name: String,
    pub api_key: Sensitive<String>,
    pub api_secret: Sensitive<String>,
    #[serde(default = "Media::default_upload_folder")]
    pub upload_folder: String,
    #[serde(default = "Media::default_api_base")]
    #[validate(url)]
    pub api_base: String,
    #[serde(default = "Media::default_timeout_secs")]
    pub timeout_secs: NonZeroU64,
}

impl Media {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.get())
    }

    fn default_upload_folder() -> String {
        "hotel-booking".into()
    }

    fn default_api_base() -> String {
        "https://api.cloudinary.com/v1_1".into()
    }

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }
}
