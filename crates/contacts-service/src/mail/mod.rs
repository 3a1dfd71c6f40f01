//! Outbound email.

pub mod mailer;
pub mod templates;

pub use mailer::{LogMailer, Mailer, OutgoingMail, SmtpMailer};
pub use templates::{MailTemplate, reset_password_form};
