//! Appwrite Storage client for Rust
//!
//! This crate provides the bucket operations used by the dashwrite
//! dashboard: listing files, multipart upload, deletion, and resolving
//! download URLs for browser-native saves.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// ID生成をサーバーに任せるためのセンチネル値
pub const UNIQUE_ID: &str = "unique()";

/// 結果型
pub type Result<T> = std::result::Result<T, StorageError>;

/// エラー型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
}

/// ファイル情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "sizeOriginal")]
    pub size_original: u64,
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
}

/// ファイル一覧レスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct FileList {
    pub total: u64,
    pub files: Vec<FileObject>,
}

/// Storage クライアント
#[derive(Clone)]
pub struct StorageClient {
    endpoint: String,
    project_id: String,
    http_client: Client,
    session_secret: Option<String>,
}

/// バケット単位のクライアント
pub struct BucketClient<'a> {
    parent: &'a StorageClient,
    bucket_id: String,
}

impl StorageClient {
    /// 新しい Storage クライアントを作成
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

    /// バケットを指定
    pub fn bucket<'a>(&'a self, bucket_id: &str) -> BucketClient<'a> {
        BucketClient {
            parent: self,
            bucket_id: bucket_id.to_string(),
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

impl<'a> BucketClient<'a> {
    fn files_url(&self) -> String {
        format!(
            "{}/storage/buckets/{}/files",
            self.parent.endpoint, self.bucket_id
        )
    }

    /// バケット内のファイル一覧を取得
    pub async fn list_files(&self) -> Result<FileList> {
        let response = self
            .parent
            .request(reqwest::Method::GET, &self.files_url())
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            warn!(%error_text, "file listing rejected");
            return Err(StorageError::ApiError(error_text));
        }

        let list = response.json::<FileList>().await?;

        Ok(list)
    }

    /// ファイルをアップロード
    ///
    /// ID はサーバー生成 (`unique()`) に任せる。中身はマルチパートで送り、
    /// クライアント側には転送後残さない。
    pub async fn create_file(&self, file_name: &str, contents: Bytes) -> Result<FileObject> {
        debug!(file_name, size = contents.len(), "uploading file");

        // マルチパートフォームデータの作成
        let part = Part::bytes(contents.to_vec()).file_name(file_name.to_string());
        let form = Form::new().text("fileId", UNIQUE_ID).part("file", part);

        let response = self
            .parent
            .request(reqwest::Method::POST, &self.files_url())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            warn!(%error_text, "file upload rejected");
            return Err(StorageError::ApiError(error_text));
        }

        let file_object = response.json::<FileObject>().await?;

        Ok(file_object)
    }

    /// ファイルを削除
    pub async fn delete_file(&self, file_id: &str) -> Result<()> {
        let url = format!("{}/{}", self.files_url(), file_id);

        let response = self
            .parent
            .request(reqwest::Method::DELETE, &url)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(StorageError::ApiError(error_text));
        }

        Ok(())
    }

    /// ダウンロードURLを解決
    ///
    /// ブラウザ保存向けのリンク。プロジェクトIDをクエリに含める。
    pub fn download_url(&self, file_id: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}/download", self.files_url(), file_id))?;
        url.query_pairs_mut()
            .append_pair("project", &self.parent.project_id);
        Ok(url)
    }

    /// ファイルの中身を取得
    pub async fn download(&self, file_id: &str) -> Result<Bytes> {
        let url = format!("{}/{}/download", self.files_url(), file_id);

        let response = self
            .parent
            .request(reqwest::Method::GET, &url)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(StorageError::ApiError(error_text));
        }

        let bytes = response.bytes().await?;

        Ok(bytes)
    }
}
