//! Outgoing transactional mail.
use async_trait::async_trait;
use error_stack::{Report, Result};
use thiserror::Error;

use crate::schema::User;

mod brevo;
pub use brevo::BrevoMailer;

#[derive(Debug, Error)]
#[error("Failed to send mail")]
pub struct MailError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    ForgetPassword,
    PasswordChanged,
}

impl Template {
    #[must_use]
    pub const fn subject(self) -> &'static str {
        match self {
            Self::ForgetPassword => "Forget Password",
            Self::PasswordChanged => "Password Changed",
        }
    }

    const fn source(self) -> &'static str {
        match self {
            Self::ForgetPassword => include_str!("../../templates/forget-password.html"),
            Self::PasswordChanged => include_str!("../../templates/password-changed.html"),
        }
    }

    /// Fills in the `{{...}}` placeholders of the template for `user`.
    #[must_use]
    pub fn render(self, user: &User, frontend_url: &str) -> String {
        let id = user.id.to_string();
        let frontend_url = frontend_url.trim_end_matches('/');
        let values = [
            ("{{id}}", id.as_str()),
            ("{{email}}", user.email.as_str()),
            ("{{firstName}}", user.first_name.as_str()),
            ("{{lastName}}", user.last_name.as_str()),
            ("{{frontendUrl}}", frontend_url),
        ];

        values
            .iter()
            .fold(self.source().to_string(), |body, (placeholder, value)| {
                body.replace(placeholder, &escape_html(value))
            })
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    async fn send(&self, template: Template, recipient: &User) -> Result<(), MailError>;
}

/// Used when no mail provider is configured. Every send fails.
#[derive(Debug, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, template: Template, _recipient: &User) -> Result<(), MailError> {
        Err(Report::new(MailError)
            .attach_printable(format!("mail is not configured, dropped {template:?}")))
    }
}
