//! Appwrite Account client for Rust
//!
//! This crate provides the account-facing slice of the Appwrite API used by
//! the dashwrite dashboard: account creation, email/password sessions,
//! fetching the signed-in user, logout, and verification mail requests.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

/// ID生成をサーバーに任せるためのセンチネル値
pub const UNIQUE_ID: &str = "unique()";

/// エラー型
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing session")]
    MissingSession,
}

/// ユーザー情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "emailVerification", default)]
    pub email_verification: bool,
}

/// セッション情報
///
/// `secret` はセッション作成時にのみ返される不透明トークンで、以降の
/// 認証付きリクエストの `X-Appwrite-Session` ヘッダに載せる。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "providerUid", default)]
    pub provider_uid: String,
    #[serde(default)]
    pub expire: String,
    #[serde(default)]
    pub secret: String,
}

/// Account クライアント
pub struct AccountClient {
    endpoint: String,
    project_id: String,
    http_client: Client,
    current_session: Arc<RwLock<Option<Session>>>,
}

impl AccountClient {
    /// 新しい Account クライアントを作成
    pub fn new(endpoint: &str, project_id: &str, http_client: Client) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            http_client,
            current_session: Arc::new(RwLock::new(None)),
        }
    }

    /// 現在キャッシュされているセッションを取得
    pub fn current_session(&self) -> Option<Session> {
        let read_guard = self.current_session.read().unwrap();
        read_guard.clone()
    }

    /// 認証付きリクエスト用のセッションシークレットを取得
    pub fn session_secret(&self) -> Option<String> {
        self.current_session().map(|s| s.secret)
    }

    /// アカウントを作成
    ///
    /// ID はサーバー生成 (`unique()`) に任せる。作成だけではセッションは
    /// 張られない。
    pub async fn create(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AccountError> {
        let url = format!("{}/account", self.endpoint);

        let payload = serde_json::json!({
            "userId": UNIQUE_ID,
            "email": email,
            "password": password,
            "name": name,
        });

        debug!(email, "creating account");

        let response = self
            .http_client
            .post(&url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            warn!(%error_text, "account creation rejected");
            return Err(AccountError::ApiError(error_text));
        }

        let user: User = response.json().await?;

        Ok(user)
    }

    /// メール・パスワードでセッションを作成
    pub async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AccountError> {
        let url = format!("{}/account/sessions/email", self.endpoint);

        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .http_client
            .post(&url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            warn!(%error_text, "session creation rejected");
            return Err(AccountError::ApiError(error_text));
        }

        let session: Session = response.json().await?;

        // セッションを保存
        {
            let mut write_guard = self.current_session.write().unwrap();
            *write_guard = Some(session.clone());
        }

        debug!(user_id = %session.user_id, "session established");

        Ok(session)
    }

    /// 現在のユーザーを取得
    pub async fn get(&self) -> Result<User, AccountError> {
        let session = self
            .current_session()
            .ok_or(AccountError::MissingSession)?;

        let url = format!("{}/account", self.endpoint);

        let response = self
            .http_client
            .get(&url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Session", &session.secret)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AccountError::ApiError(error_text));
        }

        let user: User = response.json().await?;

        Ok(user)
    }

    /// 現在のセッションを破棄（ログアウト）
    pub async fn delete_current_session(&self) -> Result<(), AccountError> {
        let session = self
            .current_session()
            .ok_or(AccountError::MissingSession)?;

        let url = format!("{}/account/sessions/current", self.endpoint);

        let response = self
            .http_client
            .delete(&url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Session", &session.secret)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AccountError::ApiError(error_text));
        }

        // セッションをクリア
        let mut write_guard = self.current_session.write().unwrap();
        *write_guard = None;

        Ok(())
    }

    /// 確認メールの送信をリクエスト
    ///
    /// `redirect_url` はメール内リンクの遷移先。セッションが必要。
    pub async fn create_verification(&self, redirect_url: &str) -> Result<(), AccountError> {
        let session = self
            .current_session()
            .ok_or(AccountError::MissingSession)?;

        let url = format!("{}/account/verification", self.endpoint);

        let payload = serde_json::json!({
            "url": redirect_url,
        });

        let response = self
            .http_client
            .post(&url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Session", &session.secret)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AccountError::ApiError(error_text));
        }

        Ok(())
    }
}
