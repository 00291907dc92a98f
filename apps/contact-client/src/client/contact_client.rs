//! Contact API クライアントのトレイトと reqwest 実装

use async_trait::async_trait;
use serde::Serialize;
use sysdak_domain::contact::ContactSubmission;
use sysdak_shared::{
    ApiResponse,
    HealthData,
    event_log::error::{category, kind},
};

use super::{error::ContactApiError, response::handle_response};
use crate::config::ClientConfig;

/// Contact API クライアントトレイト
///
/// テスト時にはスタブに差し替えられる。
#[async_trait]
pub trait ContactApiClient: Send + Sync {
    /// 問い合わせを送信する
    ///
    /// `POST {base_url}/contact` を呼び出す。ボディは 4 フィールドのみの JSON。
    async fn submit_contact_form(
        &self,
        submission: &ContactSubmission,
    ) -> Result<ApiResponse, ContactApiError>;

    /// テストメールの送信を依頼する
    ///
    /// `POST {base_url}/test-email` を呼び出す。
    async fn test_email(&self, email: &str) -> Result<ApiResponse, ContactApiError>;

    /// 稼働状態を確認する
    ///
    /// `GET {base_url}/health` を呼び出す。
    async fn health_check(&self) -> Result<ApiResponse<HealthData>, ContactApiError>;
}

#[derive(Debug, Serialize)]
struct TestEmailRequest<'a> {
    email: &'a str,
}

/// Contact API クライアント実装
#[derive(Clone)]
pub struct ContactApiClientImpl {
    base_url:              String,
    network_error_message: String,
    client:                reqwest::Client,
}

impl ContactApiClientImpl {
    /// 設定から Contact API クライアントを作成する
    ///
    /// # エラー
    ///
    /// HTTP クライアントを初期化できない場合は `ContactApiError::Network` を返す。
    pub fn new(config: &ClientConfig) -> Result<Self, ContactApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url:              config.base_url.trim_end_matches('/').to_string(),
            network_error_message: config.network_error_message.clone(),
            client:                builder.build()?,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// 送信と共通ハンドリングを行い、失敗をログに残す
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse<T>, ContactApiError> {
        let result = match request.send().await {
            Ok(response) => handle_response(response, &self.network_error_message).await,
            Err(e) => Err(ContactApiError::from(e)),
        };

        if let Err(e) = &result {
            tracing::error!(
                error.category = category::EXTERNAL_SERVICE,
                error.kind = kind::SERVICE_COMMUNICATION,
                endpoint,
                status = e.status(),
                error = %e,
                "Contact API の呼び出しに失敗"
            );
        }

        result
    }
}

#[async_trait]
impl ContactApiClient for ContactApiClientImpl {
    async fn submit_contact_form(
        &self,
        submission: &ContactSubmission,
    ) -> Result<ApiResponse, ContactApiError> {
        let request = self.client.post(self.url("/contact")).json(submission);
        self.execute("/contact", request).await
    }

    async fn test_email(&self, email: &str) -> Result<ApiResponse, ContactApiError> {
        let request = self
            .client
            .post(self.url("/test-email"))
            .json(&TestEmailRequest { email });
        self.execute("/test-email", request).await
    }

    async fn health_check(&self) -> Result<ApiResponse<HealthData>, ContactApiError> {
        let request = self.client.get(self.url("/health"));
        self.execute("/health", request).await
    }
}
