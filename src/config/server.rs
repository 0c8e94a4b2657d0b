use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use validator::Validate;

use super::{Auth, Database, Http, Logging, Mail, Media, ParseError};
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

#[derive(Debug, Deserialize, Validate)]
pub struct Server {
    #[serde(default)]
    pub http: Http,
    #[validate]
    pub db: Database,
    #[validate]
    pub auth: Auth,
    #[serde(default)]
    pub log: Logging,
    #[validate]
    pub mail: Option<Mail>,
    #[validate]
    pub media: Option<Media>,
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();
        Self::from_figment(&Self::figment())
    }

    pub(crate) fn from_figment(figment: &figment::Figment) -> Result<Self, ParseError> {
        let config = figment
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "innkeep.toml";

    /// Creates a default [`Figment`](figment::Figment) object to load
    /// server configuration.
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // Section names have no underscores, so only the first one
            // separates the section from the key.
            .merge(
                Env::prefixed("INNKEEP_").map(|key| key.as_str().replacen('_', ".", 1).into()),
            )
            // Environment variable aliases
            .merge(Env::raw().filter_map(|key| {
                match key.as_str().to_ascii_uppercase().as_str() {
                    "DATABASE_URL" => Some("db.url".into()),
                    "JWT_SECRET" => Some("auth.jwt_secret".into()),
                    "PORT" => Some("http.port".into()),
                    _ => None,
                }
            }))
    }
}
