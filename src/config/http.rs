use serde::Deserialize;
use std::num::NonZeroUsize;

#[derive(Debug, Deserialize)]
pub struct Http {
    /// **Environment variables**:
    /// - `INNKEEP_HTTP_HOST`
    #[serde(default = "Http::default_host")]
    pub host: String,
    /// **Environment variables**:
    /// - `INNKEEP_HTTP_PORT` or `PORT`
    #[serde(default = "Http::default_port")]
    pub port: u16,
    /// Worker threads of the HTTP server. Defaults to the number of
    /// physical CPUs.
    ///
    /// **Environment variables**:
    /// - `INNKEEP_HTTP_WORKERS`
    pub workers: Option<NonZeroUsize>,
    /// Origins allowed to call the API from a browser.
    ///
    /// **Environment variables**:
    /// - `INNKEEP_HTTP_ALLOWED_ORIGINS` (as `[a, b]`)
    #[serde(default = "Http::default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Http {
    const DEFAULT_PORT: u16 = 8080;

    fn default_host() -> String {
        "0.0.0.0".into()
    }

    const fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_allowed_origins() -> Vec<String> {
        vec!["http://localhost:3000".into(), "http://localhost:3001".into()]
    }
}

impl Default for Http {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            workers: None,
            allowed_origins: Self::default_allowed_origins(),
        }
    }
}
