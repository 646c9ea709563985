//! Outgoing mail delivery.
//!
//! `SmtpMailer` talks to an SMTP relay over STARTTLS using the credentials
//! from `AppConfig` (`SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`,
//! `SMTP_PASSWORD`, `EMAIL_FROM_NAME`).

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header},
    transport::smtp::authentication::Credentials,
};
use util::config::AppConfig;

use crate::error::MailError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_name: String,
}

impl SmtpMailer {
    pub fn from_config() -> Result<Self, MailError> {
        let cfg = AppConfig::global();

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(
                cfg.smtp_username.clone(),
                cfg.smtp_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from_name: cfg.email_from_name.clone(),
        })
    }

    fn build_message(&self, mail: OutgoingMail) -> Result<Message, MailError> {
        let from: Mailbox = format!("{} <{}>", self.from_name, mail.from).parse()?;
        let to: Mailbox = mail.to.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(mail.text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(mail.html_body),
                    ),
            )?;

        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = self.build_message(mail)?;
        self.transport.send(message).await?;
        Ok(())
    }
}
