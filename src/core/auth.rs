//! Credential exchange against the catalog's login form
//!
//! The landing page embeds a one-time token that must accompany the login
//! POST. Success leaves a session cookie in the shared cookie store; nothing
//! is returned to the caller.

use crate::core::error::{Error, Result};
use crate::core::pages;
use crate::core::session::Session;

/// Logs the shared session in. Authentication is a hard prerequisite for
/// downloading, so every failure here is fatal to the run.
pub struct Authenticator {
    session: Session,
}

impl Authenticator {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Fetch the landing page and pull the login token out of it.
    pub async fn fetch_token(&self) -> Result<String> {
        let url = self.session.join("/")?;
        let html = self.session.get_page(url.as_str()).await?;
        pages::login_token(&html).ok_or(Error::TokenNotFound)
    }

    /// Exchange credentials plus token for a session cookie.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let token = self.fetch_token().await?;
        self.session
            .post_form(
                "/sessions",
                &[
                    ("email", username),
                    ("password", password),
                    ("_token", &token),
                ],
            )
            .await?;
        Ok(())
    }
}
