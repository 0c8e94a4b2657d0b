//! Server configuration.
//!
//! Everything is read once by [`Server::load`] from `innkeep.toml` and
//! `INNKEEP_`-prefixed environment variables (plus a few common
//! aliases like `DATABASE_URL`), then shared read-only through
//! [`App`](crate::App).
use thiserror::Error;

mod auth;
mod database;
mod http;
mod logging;
mod mail;
mod media;
mod server;

pub use auth::Auth;
pub use database::Database;
pub use http::Http;
pub use logging::{LogStyle, Logging};
pub use mail::Mail;
pub use media::Media;
pub use server::Server;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
