//! # Contact Service エラー定義
//!
//! Contact Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//! レスポンスは常に失敗エンベロープ（`success: false`）で、内部の詳細は返さずログに残す。

use std::time::Duration;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use sysdak_domain::{contact::ContactValidationError, notification::NotificationError};
use sysdak_shared::{
    ApiResponse,
    event_log::error::{category, kind},
};
use thiserror::Error;

/// Contact Service で発生するエラー
#[derive(Debug, Error)]
pub enum ContactServiceError {
    /// 問い合わせの検証エラー
    #[error("{0}")]
    Validation(#[from] ContactValidationError),

    /// リクエストボディを JSON として解釈できない
    #[error("Invalid request body")]
    InvalidRequestBody,

    /// テスト送信先のアドレスが不正
    #[error("Invalid email address")]
    InvalidEmailAddress,

    /// リクエストボディが上限を超えた
    #[error("Request too large")]
    PayloadTooLarge,

    /// 送信元 IP のレート制限を超えた
    #[error("Too many requests. Please try again later.")]
    RateLimited { retry_after: Duration },

    /// 存在しないルート
    #[error("Resource not found")]
    NotFound,

    /// メール送信設定が揃っていない
    #[error("Email service not configured")]
    NotConfigured,

    /// 社内通知の送信に失敗（詳細は送信時にログ出力済み）
    #[error("Failed to send email. Please try again.")]
    DeliveryFailed,

    /// テストメールの送信に失敗
    #[error("テストメールの送信に失敗: {0}")]
    TestEmailFailed(NotificationError),
}

impl From<JsonRejection> for ContactServiceError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::PayloadTooLarge;
        }
        tracing::debug!(error = %rejection.body_text(), "リクエストボディの解析に失敗");
        Self::InvalidRequestBody
    }
}

impl IntoResponse for ContactServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::InvalidRequestBody | Self::InvalidEmailAddress => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            Self::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Self::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            Self::NotConfigured => {
                tracing::error!(
                    error.category = category::CONFIGURATION,
                    error.kind = kind::NOT_CONFIGURED,
                    "メール送信設定が不足しています"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            Self::DeliveryFailed => {
                tracing::error!(
                    error.category = category::INFRASTRUCTURE,
                    error.kind = kind::MAIL_TRANSPORT,
                    "社内通知の送信に失敗したため問い合わせを受け付けられません"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            Self::TestEmailFailed(e) => {
                tracing::error!(
                    error.category = category::INFRASTRUCTURE,
                    error.kind = notification_error_kind(e),
                    error = %e,
                    "テストメールの送信に失敗"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send test email".to_string(),
                )
            }
        };

        let mut response = (status, Json(ApiResponse::<()>::failure(message))).into_response();
        if let Self::RateLimited { retry_after } = self {
            // 端数は切り上げ、0 秒は返さない
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds.max(1)));
        }
        response
    }
}

fn notification_error_kind(error: &NotificationError) -> &'static str {
    match error {
        NotificationError::NotConfigured => kind::NOT_CONFIGURED,
        NotificationError::TemplateFailed(_) => kind::TEMPLATE,
        NotificationError::SendFailed(_) | NotificationError::ConnectionFailed(_) => {
            kind::MAIL_TRANSPORT
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;
    use sysdak_domain::contact::ContactSubmission;

    use super::*;

    async fn into_parts(error: ContactServiceError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn 検証エラーは400で違反メッセージを返す() {
        let validation = ContactSubmission::new("", "", "Sales", "Hi").unwrap_err();

        let (status, body) = into_parts(validation.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "message": "name is required; email is required"
            })
        );
    }

    #[tokio::test]
    async fn 社内通知の失敗は500になる() {
        let (status, body) = into_parts(ContactServiceError::DeliveryFailed).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to send email. Please try again.");
    }

    #[tokio::test]
    async fn テスト送信の失敗は詳細を返さず500になる() {
        let error = ContactServiceError::TestEmailFailed(NotificationError::SendFailed(
            "535 authentication failed for mailer".to_string(),
        ));

        let (status, body) = into_parts(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to send test email");
        assert!(!body.to_string().contains("535"));
    }

    #[tokio::test]
    async fn レート制限超過は429で待ち時間をヘッダーに入れる() {
        let response = ContactServiceError::RateLimited {
            retry_after: Duration::from_millis(2_500),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "3");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "message": "Too many requests. Please try again later."
            })
        );
    }

    #[tokio::test]
    async fn 未設定は500で設定不足を返す() {
        let (status, body) = into_parts(ContactServiceError::NotConfigured).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Email service not configured");
    }
}
