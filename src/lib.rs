pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod http;
pub mod logging;
pub mod mail;
pub mod media;
pub mod schema;
pub mod types;
pub mod util;

pub use app::App;

pub(crate) mod internal;

#[cfg(test)]
mod test_utils;
