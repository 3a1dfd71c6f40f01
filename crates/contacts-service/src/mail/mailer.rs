//! Mail delivery backends.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use contacts_core::config::MailConfig;
use contacts_core::error::{AppError, ErrorKind};
use contacts_core::result::AppResult;

use super::templates::MailTemplate;

/// One message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Recipient address.
    pub to: String,
    /// Rendered body source.
    pub template: MailTemplate,
}

/// Sends outgoing mail.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver `mail`. Failures are `DependencyUnavailable`.
    async fn send(&self, mail: OutgoingMail) -> AppResult<()>;
}

/// SMTP delivery through lettre's async transport.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Builds a transport from configuration. Does not connect.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        }
        .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid SMTP relay", e))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let address: Address = config.from.parse().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid mail.from address", e)
        })?;

        Ok(Self {
            transport,
            from: Mailbox::new(Some(config.from_name.clone()), address),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()> {
        let to: Address = mail
            .to
            .parse()
            .map_err(|e| AppError::with_source(ErrorKind::Invalid, "Invalid recipient", e))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, to))
            .subject(mail.template.subject())
            .header(ContentType::TEXT_HTML)
            .body(mail.template.render_html())
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to build email", e))?;

        self.transport.send(message).await.map_err(|e| {
            AppError::with_source(ErrorKind::DependencyUnavailable, "SMTP delivery failed", e)
        })?;

        info!(subject = mail.template.subject(), "Email sent");
        Ok(())
    }
}

/// Writes mail to the log instead of sending it. Used when SMTP is disabled.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()> {
        info!(
            to = %mail.to,
            subject = mail.template.subject(),
            link = mail.template.link(),
            "Mail delivery disabled, logging message instead"
        );
        Ok(())
    }
}
