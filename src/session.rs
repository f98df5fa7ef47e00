//! Session gate for authenticated views

use std::sync::Arc;

use dashwrite_account::{AccountClient, Session};

use crate::error::Error;

/// Client-side routes of the dashboard app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Register,
    Login,
    Dashboard,
    Storage,
}

/// Verifies an active session on entry to an authenticated view.
///
/// One check at view-entry time; no retry, no polling, no token refresh.
/// Session lifetime is owned entirely by the service.
pub struct SessionGate {
    account: Arc<AccountClient>,
}

impl SessionGate {
    pub(crate) fn new(account: Arc<AccountClient>) -> Self {
        Self { account }
    }

    /// Verify the cached session against the service.
    ///
    /// Any failure counts as [`Error::Unauthenticated`] — the service's
    /// word is final, whatever the underlying cause.
    pub async fn current(&self) -> Result<Session, Error> {
        let session = self
            .account
            .current_session()
            .ok_or(Error::Unauthenticated)?;

        match self.account.get().await {
            Ok(_) => Ok(session),
            Err(_) => Err(Error::Unauthenticated),
        }
    }

    /// Gate for dashboard entry.
    ///
    /// On failure the caller's required action is to navigate to
    /// [`Route::Login`], before fetching any data.
    pub async fn dashboard_entry(&self) -> Result<Session, Route> {
        self.current().await.map_err(|_| Route::Login)
    }
}
