//! Configuration for the dashwrite client

use url::Url;

use crate::error::Error;

/// Deployment configuration for the dashwrite client.
///
/// Every id is an opaque string supplied at composition time. The library
/// never reads the ambient environment; callers that want env-driven
/// configuration assemble it themselves (see the demos).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the Appwrite deployment, e.g. `https://cloud.appwrite.io/v1`
    pub endpoint: String,

    /// Project id sent as `X-Appwrite-Project` on every request
    pub project_id: String,

    /// Database holding the todo collection
    pub database_id: String,

    /// Collection holding the todo documents
    pub collection_id: String,

    /// Bucket holding the uploaded files
    pub bucket_id: String,

    /// Link target for verification mails sent at registration
    pub verification_url: String,
}

impl AppConfig {
    /// Create a configuration, validating the endpoint URL.
    pub fn new(endpoint: &str, project_id: &str) -> Result<Self, Error> {
        Url::parse(endpoint)?;
        if project_id.is_empty() {
            return Err(Error::validation("project_id cannot be empty"));
        }

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            database_id: String::new(),
            collection_id: String::new(),
            bucket_id: String::new(),
            verification_url: String::new(),
        })
    }

    /// Set the database and collection holding the todos
    pub fn with_database(mut self, database_id: &str, collection_id: &str) -> Self {
        self.database_id = database_id.to_string();
        self.collection_id = collection_id.to_string();
        self
    }

    /// Set the bucket holding the uploaded files
    pub fn with_bucket(mut self, bucket_id: &str) -> Self {
        self.bucket_id = bucket_id.to_string();
        self
    }

    /// Set the verification mail link target
    pub fn with_verification_url(mut self, url: &str) -> Self {
        self.verification_url = url.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_endpoint() {
        let result = AppConfig::new("not a url", "proj");
        assert!(matches!(result, Err(Error::Url(_))));
    }

    #[test]
    fn rejects_empty_project_id() {
        let result = AppConfig::new("https://cloud.appwrite.io/v1", "");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn builder_fills_collection_ids() {
        let config = AppConfig::new("https://cloud.appwrite.io/v1", "proj")
            .unwrap()
            .with_database("main", "todos")
            .with_bucket("pictures");

        assert_eq!(config.database_id, "main");
        assert_eq!(config.collection_id, "todos");
        assert_eq!(config.bucket_id, "pictures");
    }
}
