//! Appwrite Databases client for Rust
//!
//! This crate provides document CRUD against one Appwrite database
//! collection: listing, creation, update, and deletion. Query building,
//! pagination, and subscriptions are out of scope for the dashboard.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// ID生成をサーバーに任せるためのセンチネル値
pub const UNIQUE_ID: &str = "unique()";

/// 結果型
pub type Result<T> = std::result::Result<T, DatabasesError>;

/// Appwrite APIエラーの詳細情報
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DatabasesApiErrorDetails {
    pub message: Option<String>,
    pub code: Option<i64>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

// エラー詳細を整形して表示するための Display 実装
impl fmt::Display for DatabasesApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(code) = &self.code {
            parts.push(format!("Code: {}", code));
        }
        if let Some(error_type) = &self.error_type {
            parts.push(format!("Type: {}", error_type));
        }
        if let Some(message) = &self.message {
            parts.push(format!("Message: {}", message));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// エラー型
#[derive(Error, Debug)]
pub enum DatabasesError {
    #[error("API error: {details} (Status: {status})")]
    ApiError {
        details: DatabasesApiErrorDetails,
        status: reqwest::StatusCode,
    },

    #[error("API error (unparsed): {message} (Status: {status})")]
    UnparsedApiError {
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// ドキュメント
///
/// `$`付きのシステムフィールドと、コレクション固有の属性(`data`)を分けて
/// 保持する。属性の型付けは呼び出し側の責務。
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$collectionId", default)]
    pub collection_id: String,
    #[serde(rename = "$databaseId", default)]
    pub database_id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: String,
    #[serde(flatten)]
    pub data: serde_json::Map<String, Value>,
}

impl Document {
    /// 属性を文字列として取り出す
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// ドキュメント一覧レスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Document>,
}

/// Databases クライアント
#[derive(Clone)]
pub struct DatabasesClient {
    endpoint: String,
    project_id: String,
    http_client: Client,
    session_secret: Option<String>,
}

/// コレクション単位のクライアント
pub struct CollectionClient<'a> {
    parent: &'a DatabasesClient,
    database_id: String,
    collection_id: String,
}

impl DatabasesClient {
    /// 新しい Databases クライアントを作成
    pub fn new(endpoint: &str, project_id: &str, http_client: Client) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            http_client,
            session_secret: None,
        }
    }

    /// セッションシークレットを設定した認証付きクライアントを返す
    pub fn with_session(mut self, secret: &str) -> Self {
        self.session_secret = Some(secret.to_string());
        self
    }

    /// コレクションを指定
    pub fn collection<'a>(&'a self, database_id: &str, collection_id: &str) -> CollectionClient<'a> {
        CollectionClient {
            parent: self,
            database_id: database_id.to_string(),
            collection_id: collection_id.to_string(),
        }
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http_client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id);
        if let Some(secret) = &self.session_secret {
            builder = builder.header("X-Appwrite-Session", secret);
        }
        builder
    }
}

// ステータスとボディからエラーを組み立てる
async fn error_from_response(response: reqwest::Response) -> DatabasesError {
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => return DatabasesError::NetworkError(err),
    };

    warn!(%status, "document request rejected");

    match serde_json::from_str::<DatabasesApiErrorDetails>(&body) {
        Ok(details) => DatabasesError::ApiError { details, status },
        Err(_) => DatabasesError::UnparsedApiError {
            message: body,
            status,
        },
    }
}

impl<'a> CollectionClient<'a> {
    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.parent.endpoint, self.database_id, self.collection_id
        )
    }

    /// コレクション内の全ドキュメントを取得
    pub async fn list_documents(&self) -> Result<DocumentList> {
        let response = self
            .parent
            .request(reqwest::Method::GET, &self.documents_url())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let list = response.json::<DocumentList>().await?;

        Ok(list)
    }

    /// ドキュメントを作成
    ///
    /// ID はサーバー生成 (`unique()`) に任せる。
    pub async fn create_document<T: Serialize>(&self, data: &T) -> Result<Document> {
        let payload = serde_json::json!({
            "documentId": UNIQUE_ID,
            "data": data,
        });

        let response = self
            .parent
            .request(reqwest::Method::POST, &self.documents_url())
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let document = response.json::<Document>().await?;

        Ok(document)
    }

    /// ドキュメントを更新
    pub async fn update_document<T: Serialize>(
        &self,
        document_id: &str,
        data: &T,
    ) -> Result<Document> {
        let url = format!("{}/{}", self.documents_url(), document_id);

        let payload = serde_json::json!({
            "data": data,
        });

        let response = self
            .parent
            .request(reqwest::Method::PATCH, &url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let document = response.json::<Document>().await?;

        Ok(document)
    }

    /// ドキュメントを削除
    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        let url = format!("{}/{}", self.documents_url(), document_id);

        let response = self
            .parent
            .request(reqwest::Method::DELETE, &url)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }
}
