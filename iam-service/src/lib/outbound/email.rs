use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::user::models::EmailAddress;
use crate::user::errors::EmailDeliveryError;
use crate::user::ports::EmailSender;

/// Sender that logs the verification link instead of delivering it.
///
/// Used when no relay is configured, typically in local development.
#[derive(Clone, Debug)]
pub struct LogEmailSender {
    from: String,
}

impl LogEmailSender {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_verification_email(
        &self,
        to: &EmailAddress,
        verification_link: &str,
    ) -> Result<(), EmailDeliveryError> {
        tracing::info!(from = %self.from, to = %to, "Verification email (log only)");
        tracing::debug!(link = %verification_link, "Verification link");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    link: &'a str,
}

/// Sender that posts the verification message to an HTTP mail relay.
#[derive(Clone, Debug)]
pub struct HttpEmailSender {
    client: Client,
    relay_url: String,
    from: String,
    subject: String,
}

impl HttpEmailSender {
    /// # Arguments
    /// * `relay_url` - Endpoint accepting a JSON `{from, to, subject, link}` body
    /// * `from` - Sender address
    /// * `subject` - Subject line for verification emails
    pub fn new(
        relay_url: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            relay_url: relay_url.into(),
            from: from.into(),
            subject: subject.into(),
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send_verification_email(
        &self,
        to: &EmailAddress,
        verification_link: &str,
    ) -> Result<(), EmailDeliveryError> {
        let message = RelayMessage {
            from: &self.from,
            to: to.as_str(),
            subject: &self.subject,
            link: verification_link,
        };

        let response = self
            .client
            .post(&self.relay_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| EmailDeliveryError::SendFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                relay_url = %self.relay_url,
                status = status.as_u16(),
                "Email relay rejected verification email"
            );
            return Err(EmailDeliveryError::Rejected(status.as_u16()));
        }

        tracing::debug!(to = %to, "Verification email handed to relay");
        Ok(())
    }
}
