//! HTML bodies for account emails and the password reset form.

/// The emails the service sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTemplate {
    /// Link to confirm a new account's email address.
    ConfirmEmail { username: String, link: String },
    /// Link to the password reset form.
    ResetPassword { username: String, link: String },
}

impl MailTemplate {
    /// Subject line.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::ConfirmEmail { .. } => "Confirm your email",
            Self::ResetPassword { .. } => "Password Reset Request",
        }
    }

    /// The action link embedded in the body.
    pub fn link(&self) -> &str {
        match self {
            Self::ConfirmEmail { link, .. } | Self::ResetPassword { link, .. } => link,
        }
    }

    /// Render the HTML body.
    pub fn render_html(&self) -> String {
        match self {
            Self::ConfirmEmail { username, link } => page(
                "Confirm your email",
                &format!(
                    "<p>Hi {},</p>\
                     <p>Thanks for signing up. Please confirm your email address.</p>\
                     <p><a href=\"{}\">Confirm email</a></p>\
                     <p>The link is valid for one hour.</p>",
                    escape_html(username),
                    escape_html(link)
                ),
            ),
            Self::ResetPassword { username, link } => page(
                "Password reset",
                &format!(
                    "<p>Hi {},</p>\
                     <p>We received a request to reset your password.</p>\
                     <p><a href=\"{}\">Choose a new password</a></p>\
                     <p>If you did not ask for this, ignore this email.</p>",
                    escape_html(username),
                    escape_html(link)
                ),
            ),
        }
    }
}

/// Form served at `GET /api/auth/reset-password/{token}`.
pub fn reset_password_form(token: &str) -> String {
    page(
        "Reset password",
        &format!(
            "<form method=\"post\" action=\"/api/auth/reset-password/{}\">\
             <label for=\"password\">New password</label>\
             <input type=\"password\" id=\"password\" name=\"password\" minlength=\"6\" required>\
             <button type=\"submit\">Reset password</button>\
             </form>",
            escape_html(token)
        ),
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body>{body}</body></html>"
    )
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
