use async_trait::async_trait;
use error_stack::{Result, ResultExt};
use serde::Serialize;

use super::{MailError, Mailer, Template};
use crate::{config, schema::User};

/// Sends mail through Brevo's transactional email API.
#[derive(Debug)]
pub struct BrevoMailer {
    client: reqwest::Client,
    config: config::Mail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmail<'a> {
    sender: Contact<'a>,
    to: [Contact<'a>; 1],
    subject: &'a str,
    html_content: String,
}

#[derive(Serialize)]
struct Contact<'a> {
    name: &'a str,
    email: &'a str,
}

impl BrevoMailer {
    #[must_use]
    pub fn new(client: reqwest::Client, config: config::Mail) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    #[tracing::instrument(skip_all, fields(template = ?template), name = "mail.send")]
    async fn send(&self, template: Template, recipient: &User) -> Result<(), MailError> {
        let full_name = format!("{} {}", recipient.first_name, recipient.last_name);
        let recipient_name = match full_name.trim() {
            "" => recipient.email.as_str(),
            name => name,
        };
        let body = SendEmail {
            sender: Contact {
                name: &self.config.sender_name,
                email: &self.config.sender_email,
            },
            to: [Contact {
                name: recipient_name,
                email: &recipient.email,
            }],
            subject: template.subject(),
            html_content: template.render(recipient, &self.config.frontend_url),
        };

        self.client
            .post(&self.config.api_url)
            .header("api-key", self.config.api_key.as_str())
            .json(&body)
            .send()
            .await
            .change_context(MailError)
            .attach_printable("could not reach mail provider")?
            .error_for_status()
            .change_context(MailError)
            .attach_printable("mail provider rejected the request")?;

        tracing::debug!("Email sent successfully");
        Ok(())
    }
}
