use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::config::SmtpConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()>;
}

/// SMTP over implicit TLS. A new transport is built for every message.
#[derive(Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        let from: Mailbox = self.config.from.parse().context("parse sender address")?;
        let to_box: Mailbox = to.parse().context("parse recipient address")?;

        let message = Message::builder()
            .from(from)
            .to(to_box)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .context("build email")?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
            .context("smtp relay")?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        transport.send(message).await.context("smtp send")?;
        debug!(to, subject, "email sent");
        Ok(())
    }
}

pub fn verify_email_template(url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif;">
    <h2>Confirm your email address</h2>
    <p>Thanks for signing up. Click the link below to verify your account.</p>
    <p><a href="{url}">Verify my email</a></p>
    <p>If the link does not work, paste this address into your browser:<br>{url}</p>
  </body>
</html>"#
    )
}
