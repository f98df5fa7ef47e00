//! Dashwrite client library
//!
//! A typed Rust client for an Appwrite-backed personal dashboard:
//! registration and login, a per-user todo list, and bucket file
//! management. Authentication, document storage, and object storage are
//! all delegated to the external service; this library contributes the
//! typed adapter boundary and the auth-gated data-access flow on top of
//! the three service crates.

pub mod auth;
pub mod config;
pub mod error;
pub mod files;
pub mod form;
pub mod refresh;
pub mod session;
pub mod todos;

use std::sync::Arc;

use reqwest::Client;

use dashwrite_account::AccountClient;
use dashwrite_databases::DatabasesClient;
use dashwrite_storage::StorageClient;

use crate::auth::AuthFlow;
use crate::config::AppConfig;
use crate::files::FileStore;
use crate::session::SessionGate;
use crate::todos::TodoStore;

pub use dashwrite_account::{Session, User};

/// The main entry point for the dashwrite client
///
/// Constructed once from an explicit [`AppConfig`] and handed to the view
/// layer; every flow component is built from it and shares the same HTTP
/// client and cached session.
pub struct Dashwrite {
    config: AppConfig,
    http_client: Client,
    account: Arc<AccountClient>,
    databases: DatabasesClient,
    storage: StorageClient,
}

impl Dashwrite {
    /// Create a new client from deployment configuration
    ///
    /// # Example
    ///
    /// ```
    /// use dashwrite::config::AppConfig;
    /// use dashwrite::Dashwrite;
    ///
    /// let config = AppConfig::new("https://cloud.appwrite.io/v1", "my-project")
    ///     .unwrap()
    ///     .with_database("main", "todos")
    ///     .with_bucket("pictures");
    /// let client = Dashwrite::new(config);
    /// ```
    pub fn new(config: AppConfig) -> Self {
        let http_client = Client::new();

        let account = Arc::new(AccountClient::new(
            &config.endpoint,
            &config.project_id,
            http_client.clone(),
        ));
        let databases = DatabasesClient::new(&config.endpoint, &config.project_id, http_client.clone());
        let storage = StorageClient::new(&config.endpoint, &config.project_id, http_client.clone());

        Self {
            config,
            http_client,
            account,
            databases,
            storage,
        }
    }

    /// The deployment configuration this client was built from
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The underlying HTTP client
    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// The account client shared by all flow components
    pub fn account(&self) -> &AccountClient {
        &self.account
    }

    /// Gate for entering authenticated views
    pub fn session_gate(&self) -> SessionGate {
        SessionGate::new(self.account.clone())
    }

    /// Flow component for the register and login forms
    pub fn auth_flow(&self) -> AuthFlow {
        AuthFlow::new(self.account.clone(), self.config.verification_url.clone())
    }

    /// Flow component for the dashboard's todo list
    pub fn todo_store(&self) -> TodoStore {
        TodoStore::new(
            self.account.clone(),
            self.databases.clone(),
            self.config.database_id.clone(),
            self.config.collection_id.clone(),
        )
    }

    /// Flow component for the storage view's file list
    pub fn file_store(&self) -> FileStore {
        FileStore::new(
            self.account.clone(),
            self.storage.clone(),
            self.config.bucket_id.clone(),
        )
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::error::Error;
    pub use crate::form::FormPhase;
    pub use crate::session::Route;
    pub use crate::Dashwrite;
}
