use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

/// Success body. Error bodies have the same shape, see
/// [`types::Error`](crate::types::Error).
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T> {
    pub status: u16,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn respond<T: Serialize>(status: StatusCode, message: &str, data: Option<T>) -> HttpResponse {
    HttpResponse::build(status).json(Envelope {
        status: status.as_u16(),
        message,
        data,
    })
}

pub fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::OK, message, Some(data))
}

pub fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::CREATED, message, Some(data))
}

/// `200` with a message and no `data`.
pub fn ok_message(message: &str) -> HttpResponse {
    respond::<()>(StatusCode::OK, message, None)
}
