use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogStyle {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct Logging {
    /// `tracing_subscriber::EnvFilter` directives. `RUST_LOG` takes
    /// precedence when set.
    ///
    /// **Environment variables**:
    /// - `INNKEEP_LOG_FILTER`
    #[serde(default = "Logging::default_filter")]
    pub filter: String,
    /// **Environment variables**:
    /// - `INNKEEP_LOG_STYLE`
    #[serde(default)]
    pub style: LogStyle,
}

impl Logging {
    fn default_filter() -> String {
        "info".into()
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
            style: LogStyle::default(),
        }
    }
}
