//! Process-wide `tracing` subscriber setup.
use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::{LogStyle, Logging};

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

pub fn init(config: &Logging) -> Result<(), TracingInitError> {
    let targets = std::env::var("RUST_LOG").unwrap_or_else(|_| config.filter.clone());
    let filter = make_env_filter(&targets);

    let console = match config.style {
        LogStyle::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
        LogStyle::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LogStyle::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    let registry = tracing_subscriber::Registry::default()
        .with(console.with_filter(filter))
        .with(tracing_error::ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")
}

fn make_env_filter(targets: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(targets)
}
