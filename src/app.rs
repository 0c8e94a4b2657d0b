use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{
    auth::TokenKeys,
    config,
    database::{Database, PgStore},
    mail::{BrevoMailer, DisabledMailer, Mailer},
    media::{CloudinaryUploader, DisabledUploader, MediaUploader},
};

/// Shared state of every request handler.
#[derive(Debug, Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub db: Arc<dyn Database>,
    pub tokens: TokenKeys,
    pub mailer: Arc<dyn Mailer>,
    pub media: Arc<dyn MediaUploader>,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    /// Connects to the database, runs pending migrations and sets up
    /// the mail and media clients from `cfg`.
    #[tracing::instrument(skip_all)]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        let db = PgStore::connect(&cfg.db).await.change_context(AppError)?;
        db.migrate().await.change_context(AppError)?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("innkeep/", env!("CARGO_PKG_VERSION")))
            .build()
            .change_context(AppError)
            .attach_printable("could not build HTTP client")?;

        let mailer: Arc<dyn Mailer> = match cfg.mail.as_ref() {
            Some(mail) => Arc::new(BrevoMailer::new(client.clone(), mail.clone())),
            None => {
                tracing::warn!("mail is not configured, password reset mails will fail");
                Arc::new(DisabledMailer)
            }
        };

        let media: Arc<dyn MediaUploader> = match cfg.media.as_ref() {
            Some(media) => Arc::new(CloudinaryUploader::new(client, media.clone())),
            None => {
                tracing::warn!("media uploads are not configured, image uploads will fail");
                Arc::new(DisabledUploader)
            }
        };

        Ok(Self::from_parts(cfg, Arc::new(db), mailer, media))
    }

    #[must_use]
    pub fn from_parts(
        cfg: config::Server,
        db: Arc<dyn Database>,
        mailer: Arc<dyn Mailer>,
        media: Arc<dyn MediaUploader>,
    ) -> Self {
        Self {
            tokens: cfg.auth.token_keys(),
            config: Arc::new(cfg),
            db,
            mailer,
            media,
        }
    }
}
