//! Account lifecycle orchestration.
//!
//! Every path that writes an account row invalidates the subject's session
//! cache entry afterwards. A failed invalidation is logged and does not
//! fail the write; the entry then ages out with its TTL.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use contacts_auth::{PasswordHasher, SessionCache, TokenPurpose, TokenService};
use contacts_core::error::{AppError, ErrorKind};
use contacts_core::result::AppResult;
use contacts_database::AccountStore;
use contacts_entity::account::{Account, NewAccount};

use crate::avatar::{AvatarImage, AvatarUploader, gravatar_url};
use crate::mail::{Mailer, MailTemplate, OutgoingMail};

pub const ACCOUNT_EXISTS: &str = "Account already exists";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const EMAIL_NOT_CONFIRMED: &str = "Email not confirmed";
pub const INVALID_PASSWORD: &str = "Invalid password";
pub const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";
pub const VERIFICATION_ERROR: &str = "Verification error";
pub const EMAIL_CONFIRMED: &str = "Email confirmed";
pub const ALREADY_CONFIRMED: &str = "Your email is already confirmed";
pub const CHECK_EMAIL: &str = "Check your email for confirmation.";
pub const RESET_LINK_SENT: &str = "If the email exists, a password reset link will be sent.";
pub const INVALID_RESET_TOKEN: &str = "Invalid or expired token";
pub const USER_NOT_FOUND: &str = "User not found";
pub const PASSWORD_RESET: &str = "Password reset successful";

/// Access and refresh tokens returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

/// Account use cases.
#[derive(Debug, Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    sessions: SessionCache,
    mailer: Arc<dyn Mailer>,
    avatars: Arc<dyn AvatarUploader>,
    public_base_url: String,
    password_min_length: usize,
}

impl AccountService {
    /// Creates a new account service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        sessions: SessionCache,
        mailer: Arc<dyn Mailer>,
        avatars: Arc<dyn AvatarUploader>,
        public_base_url: impl Into<String>,
        password_min_length: usize,
    ) -> Self {
        Self {
            accounts,
            tokens,
            hasher,
            sessions,
            mailer,
            avatars,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            password_min_length,
        }
    }

    /// Registers an unconfirmed account and mails a confirmation link.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> AppResult<Account> {
        if self.accounts.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict(ACCOUNT_EXISTS));
        }
        self.check_password(password)?;

        let account = self
            .accounts
            .insert(&NewAccount {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: self.hasher.hash_password(password)?,
                avatar: Some(gravatar_url(email)),
            })
            .await?;
        info!(account_id = account.id, "Account created");

        self.send_confirmation(&account)?;
        Ok(account)
    }

    /// Exchanges credentials for a token pair.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<TokenPair> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthenticated(INVALID_EMAIL))?;

        if !account.confirmed {
            return Err(AppError::unauthenticated(EMAIL_NOT_CONFIRMED));
        }
        if !self.hasher.verify_password(password, &account.password_hash) {
            return Err(AppError::unauthenticated(INVALID_PASSWORD));
        }

        let pair = self.issue_pair(&account.email).await?;
        info!(account_id = account.id, "Login succeeded");
        Ok(pair)
    }

    /// Rotates the token pair. The presented token must match the stored one.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let subject = self
            .tokens
            .validate(refresh_token, TokenPurpose::Refresh)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Unauthenticated, INVALID_REFRESH_TOKEN, e)
            })?;

        let account = self
            .accounts
            .find_by_email(&subject)
            .await?
            .ok_or_else(|| AppError::unauthenticated(INVALID_REFRESH_TOKEN))?;

        if account.refresh_token.as_deref() != Some(refresh_token) {
            warn!(account_id = account.id, "Refresh token mismatch, revoking");
            self.accounts.update_refresh_token(&subject, None).await?;
            self.sessions.invalidate_quietly(&subject).await;
            return Err(AppError::unauthenticated(INVALID_REFRESH_TOKEN));
        }

        self.issue_pair(&subject).await
    }

    /// Confirms the email a confirmation token was issued for. Idempotent.
    pub async fn confirm_email(&self, token: &str) -> AppResult<&'static str> {
        let subject = self
            .tokens
            .validate(token, TokenPurpose::EmailAction)
            .map_err(|e| AppError::with_source(ErrorKind::Invalid, VERIFICATION_ERROR, e))?;

        let account = self
            .accounts
            .find_by_email(&subject)
            .await?
            .ok_or_else(|| AppError::invalid(VERIFICATION_ERROR))?;

        if account.confirmed {
            return Ok(ALREADY_CONFIRMED);
        }

        self.accounts
            .mark_confirmed(&subject)
            .await?
            .ok_or_else(|| AppError::invalid(VERIFICATION_ERROR))?;
        self.sessions.invalidate_quietly(&subject).await;
        info!(account_id = account.id, "Email confirmed");
        Ok(EMAIL_CONFIRMED)
    }

    /// Re-sends the confirmation link to an unconfirmed account.
    pub async fn request_email(&self, email: &str) -> AppResult<&'static str> {
        match self.accounts.find_by_email(email).await? {
            Some(account) if account.confirmed => Ok(ALREADY_CONFIRMED),
            Some(account) => {
                self.send_confirmation(&account)?;
                Ok(CHECK_EMAIL)
            }
            None => Ok(CHECK_EMAIL),
        }
    }

    /// Mails a reset link if the account exists. The reply is the same either way.
    pub async fn forgot_password(&self, email: &str) -> AppResult<&'static str> {
        if let Some(account) = self.accounts.find_by_email(email).await? {
            let token = self.tokens.issue_email_action(&account.email)?;
            self.dispatch(OutgoingMail {
                to: account.email.clone(),
                template: MailTemplate::ResetPassword {
                    username: account.username.clone(),
                    link: format!("{}/api/auth/reset-password/{token}", self.public_base_url),
                },
            });
        }
        Ok(RESET_LINK_SENT)
    }

    /// Overwrites the password of the account a reset token was issued for.
    pub async fn reset_password(&self, token: &str, password: &str) -> AppResult<&'static str> {
        let subject = self
            .tokens
            .validate(token, TokenPurpose::EmailAction)
            .map_err(|e| AppError::with_source(ErrorKind::Invalid, INVALID_RESET_TOKEN, e))?;

        if self.accounts.find_by_email(&subject).await?.is_none() {
            return Err(AppError::not_found(USER_NOT_FOUND));
        }
        self.check_password(password)?;

        let hash = self.hasher.hash_password(password)?;
        let account = self
            .accounts
            .update_password(&subject, &hash)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        self.sessions.invalidate_quietly(&subject).await;
        info!(account_id = account.id, "Password reset");
        Ok(PASSWORD_RESET)
    }

    /// All accounts.
    pub async fn list_users(&self) -> AppResult<Vec<Account>> {
        self.accounts.list().await
    }

    /// One account by id.
    pub async fn get_user(&self, id: i64) -> AppResult<Account> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Not Found"))
    }

    /// Uploads a new avatar for `account` and stores its URL.
    pub async fn update_avatar(&self, account: &Account, image: AvatarImage) -> AppResult<Account> {
        let url = self.avatars.upload(&account.username, image).await?;
        let updated = self
            .accounts
            .update_avatar(&account.email, &url)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        self.sessions.invalidate_quietly(&account.email).await;
        Ok(updated)
    }

    async fn issue_pair(&self, subject: &str) -> AppResult<TokenPair> {
        let access_token = self.tokens.issue_access(subject)?;
        let refresh_token = self.tokens.issue_refresh(subject)?;
        self.accounts
            .update_refresh_token(subject, Some(&refresh_token))
            .await?
            .ok_or_else(|| AppError::unauthenticated(INVALID_EMAIL))?;
        self.sessions.invalidate_quietly(subject).await;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        })
    }

    fn check_password(&self, password: &str) -> AppResult<()> {
        if password.chars().count() < self.password_min_length {
            return Err(AppError::invalid(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }
        Ok(())
    }

    fn send_confirmation(&self, account: &Account) -> AppResult<()> {
        let token = self.tokens.issue_email_action(&account.email)?;
        self.dispatch(OutgoingMail {
            to: account.email.clone(),
            template: MailTemplate::ConfirmEmail {
                username: account.username.clone(),
                link: format!("{}/api/auth/confirmed_email/{token}", self.public_base_url),
            },
        });
        Ok(())
    }

    /// Sends `mail` on a background task. Failures are logged only.
    fn dispatch(&self, mail: OutgoingMail) {
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            let subject = mail.template.subject();
            if let Err(e) = mailer.send(mail).await {
                warn!(subject, error = %e, "Failed to send email");
            }
        });
    }
}
