use error_stack::Report;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

/// Turns [`ValidationErrors`] into a report with one attachment per
/// failed field, keyed by its dotted path (`db.url: ...`).
pub trait IntoValidatorReport<T> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidationErrors> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
        self.map_err(|errors| {
            let mut lines = Vec::new();
            collect(&errors, &mut Vec::new(), &mut lines);
            lines.sort();

            lines
                .into_iter()
                .fold(Report::new(Wrapper), Report::attach_printable)
        })
    }
}

/// Human readable text of a single validation error: its message if
/// one was given, its code otherwise.
#[must_use]
pub fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}

fn collect(errors: &ValidationErrors, path: &mut Vec<String>, lines: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        path.push((*field).to_string());
        match kind {
            ValidationErrorsKind::Field(errors) => {
                let key = path.join(".");
                for error in errors {
                    lines.push(format!("{key}: {}", describe(error)));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, path, lines),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    path.push(index.to_string());
                    collect(inner, path, lines);
                    path.pop();
                }
            }
        }
        path.pop();
    }
}
