// src/services/mail_service.rs

use actix_web::web;
use async_trait::async_trait;
use html_escape::encode_text;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail sender is not configured")]
    NotConfigured,

    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("mail task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &[String], subject: &str, html: &str) -> Result<(), MailError>;
}

/// Sends HTML mail through an authenticated SMTP relay using the shared sender account.
pub struct SmtpMailer {
    sender: String,
    transport: Option<SmtpTransport>,
}

impl SmtpMailer {
    pub fn new(smtp_host: &str, sender: &str, password: &str) -> Result<Self, MailError> {
        if sender.is_empty() {
            log::warn!("COMMON_EMAIL is empty, outgoing mail is disabled");
            return Ok(Self {
                sender: String::new(),
                transport: None,
            });
        }
        let creds = Credentials::new(sender.to_string(), password.to_string());
        let transport = SmtpTransport::relay(smtp_host)?.credentials(creds).build();
        Ok(Self {
            sender: sender.to_string(),
            transport: Some(transport),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &[String], subject: &str, html: &str) -> Result<(), MailError> {
        let transport = self.transport.clone().ok_or(MailError::NotConfigured)?;

        let mut builder = Message::builder()
            .from(self.sender.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML);
        for address in to {
            builder = builder.to(address.parse::<Mailbox>()?);
        }
        let message = builder.body(html.to_string())?;

        // SmtpTransport is synchronous.
        web::block(move || transport.send(&message)).await??;
        Ok(())
    }
}

/// HTML body for the password reset notification. Interpolated values are escaped.
pub fn reset_password_template(name: &str, password: &str) -> String {
    format!(
        "<tr><td><p>Hi, {}</p><br><br><p>Your password has been reset to: {}<br><br></td></tr>",
        encode_text(name),
        encode_text(password)
    )
}
