//! Outbound email with pluggable providers.
//!
//! Supports two providers:
//! - `console`: logs the message (development default)
//! - `webhook`: POSTs a JSON payload to a configured delivery endpoint
//!
//! Email is strictly best-effort throughout the service: registration and
//! credit state commit first, and a failed send is logged and swallowed by
//! callers. Missing or duplicate confirmation emails are an accepted
//! outcome, not a bug.

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::RegistryConfig;

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Provider name in configuration is not recognized.
    #[error("unknown email provider: {0}")]
    UnknownProvider(String),

    /// Webhook provider selected but no URL configured.
    #[error("email webhook URL not configured")]
    NotConfigured,

    /// Delivery endpoint rejected or failed the request.
    #[error("failed to send email: {0}")]
    SendFailed(String),
}

/// The three notification kinds the platform sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    /// Sponsor registered: welcome plus their redemption codes.
    SponsorWelcome,
    /// A redemption code forwarded to a team captain.
    CaptainCode,
    /// Team registration confirmed against a sponsor credit.
    TeamConfirmation,
}

impl EmailTemplate {
    /// Template discriminator used in logs and webhook payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SponsorWelcome => "sponsor_welcome",
            Self::CaptainCode => "captain_code",
            Self::TeamConfirmation => "team_confirmation",
        }
    }
}

/// An email ready for delivery.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Which template produced this message.
    pub template: EmailTemplate,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
}

/// Transactional email sender.
#[derive(Debug, Clone)]
pub struct EmailService {
    enabled: bool,
    provider: String,
    webhook_url: String,
    sender: String,
    base_url: String,
    client: reqwest::Client,
}

impl EmailService {
    /// Creates an email service from configuration.
    #[must_use]
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            enabled: config.email_enabled,
            provider: config.email_provider.clone(),
            webhook_url: config.email_webhook_url.clone(),
            sender: config.email_sender.clone(),
            base_url: config.base_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Returns whether outbound email is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sends one message through the configured provider.
    ///
    /// A disabled service silently succeeds.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] when the provider is unknown,
    /// unconfigured, or the delivery endpoint fails.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.enabled {
            debug!(
                to = %message.to,
                template = message.template.as_str(),
                "email disabled, skipping send"
            );
            return Ok(());
        }

        match self.provider.as_str() {
            "console" => {
                info!(
                    to = %message.to,
                    from = %self.sender,
                    template = message.template.as_str(),
                    subject = %message.subject,
                    body = %message.body,
                    "email (console provider)"
                );
                Ok(())
            }
            "webhook" => self.send_webhook(message).await,
            other => {
                error!(provider = %other, "unknown email provider");
                Err(EmailError::UnknownProvider(other.to_string()))
            }
        }
    }

    /// Welcome email for a newly registered sponsor, listing their codes.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] on delivery failure.
    pub async fn send_sponsor_welcome(
        &self,
        to: &str,
        sponsor_name: &str,
        codes: &[String],
    ) -> Result<(), EmailError> {
        let code_list = codes.join("\n  ");
        let body = format!(
            "Thank you for sponsoring, {sponsor_name}!\n\n\
             Your team registration codes:\n  {code_list}\n\n\
             Forward a code to each team captain. They register at\n\
             {base}/register\n",
            base = self.base_url,
        );
        self.send(EmailMessage {
            template: EmailTemplate::SponsorWelcome,
            to: to.to_string(),
            subject: format!("Welcome, {sponsor_name} — your team codes"),
            body,
        })
        .await
    }

    /// Forwards one redemption code to a team captain.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] on delivery failure.
    pub async fn send_captain_code(
        &self,
        to: &str,
        sponsor_name: &str,
        code: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "{sponsor_name} has sponsored a team spot for you.\n\n\
             Your registration code: {code}\n\n\
             Register your team at {base}/register and enter the code\n\
             when prompted.\n",
            base = self.base_url,
        );
        self.send(EmailMessage {
            template: EmailTemplate::CaptainCode,
            to: to.to_string(),
            subject: format!("Your team registration code from {sponsor_name}"),
            body,
        })
        .await
    }

    /// Confirms a completed sponsor-code team registration.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] on delivery failure.
    pub async fn send_team_confirmation(
        &self,
        to: &str,
        team_name: Option<&str>,
        sponsor_name: &str,
    ) -> Result<(), EmailError> {
        let team = team_name.unwrap_or("Your team");
        let body = format!(
            "{team} is registered, sponsored by {sponsor_name}.\n\n\
             Tee times and pairings will be emailed before the event.\n",
        );
        self.send(EmailMessage {
            template: EmailTemplate::TeamConfirmation,
            to: to.to_string(),
            subject: "Team registration confirmed".to_string(),
            body,
        })
        .await
    }

    /// Webhook provider: POST the message as JSON to the delivery endpoint.
    async fn send_webhook(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.webhook_url.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let payload = serde_json::json!({
            "template": message.template.as_str(),
            "from": self.sender,
            "to": message.to,
            "subject": message.subject,
            "body": message.body,
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        if response.status().is_success() {
            info!(to = %message.to, template = message.template.as_str(), "email sent via webhook");
            Ok(())
        } else {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!(%status, %detail, "email webhook error");
            Err(EmailError::SendFailed(format!("webhook returned {status}")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;

    fn test_config(enabled: bool, provider: &str) -> RegistryConfig {
        RegistryConfig {
            listen_addr: "127.0.0.1:0".parse().ok().unwrap_or_else(|| {
                panic!("valid addr");
            }),
            database_url: String::new(),
            database_max_connections: 1,
            database_min_connections: 0,
            database_connect_timeout_secs: 1,
            admin_password: String::new(),
            code_prefix: "FROG".to_string(),
            base_url: "https://golf.example.com".to_string(),
            email_enabled: enabled,
            email_provider: provider.to_string(),
            email_webhook_url: String::new(),
            email_sender: "tournament@example.com".to_string(),
            player_cache_ttl_secs: 300,
        }
    }

    #[tokio::test]
    async fn console_provider_succeeds() {
        let service = EmailService::new(&test_config(true, "console"));
        let result = service
            .send_team_confirmation("captain@example.com", Some("The Mulligans"), "Acme Corp")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn disabled_service_silently_succeeds() {
        let service = EmailService::new(&test_config(false, "webhook"));
        let result = service
            .send_captain_code("captain@example.com", "Acme Corp", "FROG-2026-K7PD")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn unknown_provider_errors() {
        let service = EmailService::new(&test_config(true, "carrier-pigeon"));
        let result = service
            .send_sponsor_welcome("owner@example.com", "Acme Corp", &[])
            .await;
        assert!(matches!(result, Err(EmailError::UnknownProvider(_))));
    }

    #[tokio::test]
    async fn webhook_without_url_is_not_configured() {
        let service = EmailService::new(&test_config(true, "webhook"));
        let result = service
            .send_captain_code("captain@example.com", "Acme Corp", "FROG-2026-K7PD")
            .await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[test]
    fn template_discriminators_are_stable() {
        assert_eq!(EmailTemplate::SponsorWelcome.as_str(), "sponsor_welcome");
        assert_eq!(EmailTemplate::CaptainCode.as_str(), "captain_code");
        assert_eq!(
            EmailTemplate::TeamConfirmation.as_str(),
            "team_confirmation"
        );
    }
}
