//! Contact API レスポンスの共通ハンドリング

use serde::de::DeserializeOwned;
use sysdak_shared::ApiResponse;

use super::error::ContactApiError;

/// Contact API レスポンスの共通ハンドリング
///
/// 成功時はレスポンスボディを `ApiResponse<T>` にデシリアライズしてそのまま返す。
/// エラー時はボディの `message` を取り出して `ContactApiError::Api` にする:
///
/// - ボディが JSON でない: `fallback_message`
/// - JSON だが `message` が空または存在しない: `HTTP error! status: {code}`
pub(super) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback_message: &str,
) -> Result<ApiResponse<T>, ContactApiError> {
    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice::<ApiResponse<T>>(&body)
            .map_err(|e| ContactApiError::Decode(e.to_string()));
    }

    let message = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
        Err(_) => fallback_message.to_string(),
    };

    Err(ContactApiError::Api {
        status: status.as_u16(),
        message,
    })
}
