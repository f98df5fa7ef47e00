//! Error handling for the dashwrite client

use std::fmt;
use thiserror::Error;

use dashwrite_account::AccountError;
use dashwrite_databases::DatabasesError;
use dashwrite_storage::StorageError;

/// Unified error type for the dashwrite client
///
/// The flow layer deliberately collapses every service-side failure into
/// [`Error::Service`]: the dashboard never distinguishes network trouble
/// from a not-found or a quota rejection, and no retry policy exists.
#[derive(Error, Debug)]
pub enum Error {
    /// Client-side input validation failures; no request was issued
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any failure surfaced by the external service
    #[error("Service error: {0}")]
    Service(String),

    /// No active authenticated session
    #[error("Unauthenticated")]
    Unauthenticated,

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new service error
    pub fn service<T: fmt::Display>(msg: T) -> Self {
        Error::Service(msg.to_string())
    }
}

impl From<AccountError> for Error {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::MissingSession => Error::Unauthenticated,
            other => Error::Service(other.to_string()),
        }
    }
}

impl From<DatabasesError> for Error {
    fn from(err: DatabasesError) -> Self {
        Error::Service(err.to_string())
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Service(err.to_string())
    }
}
