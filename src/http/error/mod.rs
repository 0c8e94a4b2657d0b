use error_stack::{Context, Report};
use thiserror::Error as ThisError;
use tracing_error::SpanTrace;

use crate::types;

mod impls;

pub type Result<T> = std::result::Result<T, Error>;

/// Request level failure.
///
/// Pairs the error kind shown to the client with the internal report
/// and the span trace of where it happened. Only the kind leaves the
/// server, the rest is logged for 5xx responses.
pub struct Error {
    error_type: types::Error,
    report: Report<RequestError>,
    trace: SpanTrace,
}

#[derive(Debug, ThisError)]
#[error("Failed to process request")]
pub struct RequestError;

impl Error {
    #[must_use]
    pub fn from_context(error_type: types::Error, context: impl Context) -> Self {
        Self::from_report(error_type, Report::new(context))
    }

    #[must_use]
    pub fn from_report(error_type: types::Error, report: Report<impl Context>) -> Self {
        Self {
            error_type,
            report: report.change_context(RequestError),
            trace: SpanTrace::capture(),
        }
    }

    /// Shorthand for errors that need no context beyond their kind.
    #[must_use]
    pub fn new(error_type: types::Error) -> Self {
        #[derive(Debug, ThisError)]
        #[error("{0}")]
        struct Plain(types::Error);
        Self::from_context(error_type.clone(), Plain(error_type))
    }
}

impl Error {
    #[must_use]
    pub fn as_type(&self) -> &types::Error {
        &self.error_type
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("type", &self.error_type)
            .field("report", &self.report)
            .field("trace", &self.trace)
            .finish()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", &self.error_type)?;
        writeln!(f, "{:?}", self.report)?;
        std::fmt::Display::fmt(&self.trace, f)
    }
}
