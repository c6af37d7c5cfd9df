//! SMTP delivery using lettre

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    Message, SmtpTransport, Transport, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use serde::Deserialize;

use crate::{MailError, Mailer, OutgoingEmail};

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_smtp_timeout_secs")]
    pub smtp_timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: default_from_address(),
            smtp_timeout_secs: default_smtp_timeout_secs(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "noreply@overseace.com".to_string()
}

fn default_smtp_timeout_secs() -> u64 {
    30
}

/// Email service backed by an SMTP relay
#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from: String,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let timeout = Some(Duration::from_secs(config.smtp_timeout_secs));

        let mailer = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection (e.g., MailDev)"
            );
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .timeout(timeout)
                .build()
        } else {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                from = %config.from_address,
                "Email service initialized with authentication and TLS"
            );

            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

            SmtpTransport::relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(creds)
                .timeout(timeout)
                .build()
        };

        Ok(Self {
            mailer,
            from: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for EmailService {
    #[tracing::instrument(skip_all, fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        tracing::info!("Sending email");

        let message = Message::builder()
            .from(self.from.parse()?)
            .reply_to(email.reply_to.parse()?)
            .to(email.to.parse()?)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body)?;

        let mailer = self.mailer.clone();

        // lettre's SmtpTransport blocks until the relay answers
        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}
