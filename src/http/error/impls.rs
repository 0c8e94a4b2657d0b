use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;
use heck::ToLowerCamelCase;
use validator::{ValidationErrors, ValidationErrorsKind};

use super::Error;
use crate::{
    auth::{token::IssueTokenError, AuthError, PasswordError},
    database,
    mail::MailError,
    media::UploadError,
    types::Error as ErrorType,
    util::validator::describe,
};

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.error_type.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = ?self.error_type, "request rejected");
        }
        HttpResponse::build(status).json(&self.error_type)
    }
}

impl From<Report<database::Error>> for Error {
    fn from(value: Report<database::Error>) -> Self {
        match value.current_context() {
            database::Error::Readonly => Error::from_report(ErrorType::ReadonlyMode, value),
            _ => Error::from_report(ErrorType::Internal, value),
        }
    }
}

impl From<Report<PasswordError>> for Error {
    fn from(value: Report<PasswordError>) -> Self {
        Error::from_report(ErrorType::Internal, value)
    }
}

impl From<Report<IssueTokenError>> for Error {
    fn from(value: Report<IssueTokenError>) -> Self {
        Error::from_report(ErrorType::Internal, value)
    }
}

impl From<Report<MailError>> for Error {
    fn from(value: Report<MailError>) -> Self {
        Error::from_report(ErrorType::MailFailed, value)
    }
}

impl From<Report<UploadError>> for Error {
    fn from(value: Report<UploadError>) -> Self {
        Error::from_report(ErrorType::UploadFailed, value)
    }
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        let reason = match value {
            AuthError::Expired => "Token has expired",
            AuthError::InvalidSignature | AuthError::Malformed => "Invalid token",
        };
        Error::from_context(ErrorType::Unauthorized(reason), value)
    }
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        let detail = first_problem(&value).unwrap_or_else(|| "Invalid request body".into());
        Error::from_context(ErrorType::InvalidRequest(detail.into()), value)
    }
}

/// Picks one problem to report, in field name order so the same body
/// always yields the same message. Field names are reported in the
/// casing clients use (`roomName is required`).
fn first_problem(errors: &ValidationErrors) -> Option<String> {
    let mut fields = errors.errors().iter().collect::<Vec<_>>();
    fields.sort_by_key(|(field, _)| **field);

    fields.into_iter().find_map(|(field, kind)| match kind {
        ValidationErrorsKind::Field(errors) => errors.first().map(|error| {
            if *field == "__all__" {
                describe(error)
            } else {
                format!("{} {}", field.to_lower_camel_case(), describe(error))
            }
        }),
        ValidationErrorsKind::Struct(inner) => first_problem(inner),
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| first_problem(inner)),
    })
}
