use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    error::JsonPayloadError,
    web, HttpRequest,
};
use std::str::FromStr;
use tracing::Span;
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder};

use super::Error;
use crate::types::{
    self,
    id::{marker::Marker, Id},
};

/// Same as [`DefaultRootSpanBuilder`] but request spans are only
/// emitted at `DEBUG`.
pub struct QuieterRootSpanBuilder;

impl RootSpanBuilder for QuieterRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> Span {
        tracing_actix_web::root_span!(level = tracing::Level::DEBUG, request)
    }

    fn on_request_end<B: MessageBody>(
        span: Span,
        outcome: &Result<ServiceResponse<B>, actix_web::Error>,
    ) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

/// Largest accepted JSON body. Images arrive inline as base64 `data:`
/// URIs, which are a third bigger than the file itself.
pub const MAX_JSON_BODY: usize = 8 * 1024 * 1024;

/// JSON extractor settings shared by every route: unreadable bodies
/// are reported in the usual envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY)
        .error_handler(handle_json_error)
}

#[derive(Debug, thiserror::Error)]
#[error("Could not read JSON body: {0}")]
struct InvalidBody(String);

fn handle_json_error(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = match &error {
        JsonPayloadError::Deserialize(e) if !e.is_eof() => {
            format!("Invalid request body: {e}")
        }
        _ => "Please provide request body".to_string(),
    };
    let context = InvalidBody(error.to_string());
    Error::from_context(types::Error::InvalidRequest(detail.into()), context).into()
}

/// Parses a path segment into a record id, failing with
/// `400 Invalid Id`.
pub fn parse_id<T: Marker>(value: &str) -> Result<Id<T>, Error> {
    Id::from_str(value).map_err(|e| Error::from_context(types::Error::InvalidId, e))
}
