//! # contacts-service
//!
//! Business logic for the contacts service. Each service orchestrates the
//! stores, the token service, the session cache and the outbound mail and
//! image-host clients to implement one group of use cases.
//!
//! Services take all their dependencies at construction time as `Arc`
//! references.

pub mod account;
pub mod avatar;
pub mod contact;
pub mod mail;

pub use account::{AccountService, TokenPair};
pub use avatar::{AvatarUploader, CloudinaryUploader, DisabledUploader};
pub use contact::ContactService;
pub use mail::{LogMailer, Mailer, OutgoingMail, SmtpMailer};
