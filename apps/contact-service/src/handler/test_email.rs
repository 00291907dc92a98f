//! # テスト送信ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/test-email` - 送信設定の確認用メールを 1 通送信する
//!
//! `email` キーを省略した場合のみ設定済みの送信元アドレスに送る。
//! 空文字列・`null` は宛先の指定とみなし、`Invalid email address` を返す。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Deserializer};
use sysdak_domain::contact::is_valid_email;
use sysdak_shared::ApiResponse;

use super::ContactState;
use crate::error::ContactServiceError;

/// テスト送信リクエスト
#[derive(Debug, Default, Deserialize)]
pub struct TestEmailRequest {
    /// `None` はキーの省略。`null` は `Some("")` として受け取る
    #[serde(default, deserialize_with = "present_or_null")]
    pub email: Option<String>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(
        Option::<String>::deserialize(deserializer)?.unwrap_or_default(),
    ))
}

/// POST /api/test-email
pub async fn send_test_email(
    State(state): State<Arc<ContactState>>,
    payload: Result<Json<TestEmailRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ContactServiceError> {
    if !state.email_configured {
        return Err(ContactServiceError::NotConfigured);
    }

    let Json(request) = payload?;

    let to = match request.email {
        Some(email) => email,
        None => state
            .notifier
            .from_address()
            .map(str::to_string)
            .unwrap_or_default(),
    };

    if !is_valid_email(&to) {
        return Err(ContactServiceError::InvalidEmailAddress);
    }

    state
        .notifier
        .send_test_email(&to)
        .await
        .map_err(ContactServiceError::TestEmailFailed)?;

    Ok(Json(ApiResponse::ok(format!(
        "Test email sent successfully to {to}"
    ))))
}
