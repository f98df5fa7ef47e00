//! Registration, login, and logout flows

use std::sync::Arc;

use dashwrite_account::{AccountClient, AccountError, Session};
use tracing::debug;

use crate::error::Error;
use crate::form::FormPhase;
use crate::session::Route;

/// Auth flow component backing the register and login forms.
///
/// Wraps the account client with the dashboard's client-side guards and
/// inline status messages.
pub struct AuthFlow {
    account: Arc<AccountClient>,
    verification_url: String,
    form: FormPhase,
}

impl AuthFlow {
    pub(crate) fn new(account: Arc<AccountClient>, verification_url: String) -> Self {
        Self {
            account,
            verification_url,
            form: FormPhase::default(),
        }
    }

    /// State of the last submission, for inline rendering.
    pub fn form(&self) -> &FormPhase {
        &self.form
    }

    /// Register a new user: create the account, establish a session, then
    /// request a verification mail.
    ///
    /// Empty email or password is rejected before any service call. Any
    /// sub-step failing surfaces as one generic service error; a partially
    /// created account is not rolled back.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, Error> {
        if email.trim().is_empty() || password.is_empty() {
            self.form.fail("Email and password are required.");
            return Err(Error::validation("email and password are required"));
        }

        self.form.begin();

        match self.register_steps(name, email, password).await {
            Ok(session) => {
                self.form
                    .succeed("Registration successful! Please check your email for verification.");
                Ok(session)
            }
            Err(err) => {
                self.form.fail("An error occurred during registration.");
                Err(err.into())
            }
        }
    }

    async fn register_steps(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AccountError> {
        self.account.create(email, password, name).await?;
        let session = self.account.create_email_session(email, password).await?;
        self.account
            .create_verification(&self.verification_url)
            .await?;
        Ok(session)
    }

    /// Log in with existing credentials.
    ///
    /// Returns the route to take next. The dashboard route is produced
    /// only on success; a failed attempt keeps the caller on the login
    /// view.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(Session, Route), Error> {
        if email.trim().is_empty() || password.is_empty() {
            self.form.fail("Email and password are required.");
            return Err(Error::validation("email and password are required"));
        }

        self.form.begin();

        match self.account.create_email_session(email, password).await {
            Ok(session) => {
                debug!(email, "login succeeded");
                self.form.succeed("Login successful!");
                Ok((session, Route::Dashboard))
            }
            Err(err) => {
                self.form.fail("An error occurred during login.");
                Err(err.into())
            }
        }
    }

    /// Destroy the current session. The caller navigates to login.
    pub async fn logout(&mut self) -> Result<Route, Error> {
        self.account.delete_current_session().await?;
        Ok(Route::Login)
    }
}
