//! # API レスポンスエンベロープ
//!
//! コンタクト API の統一レスポンス形式
//! `{ "success": bool, "message": string, "data"?: T }` を提供する。

use serde::{Deserialize, Serialize};

/// 失敗レスポンスのメッセージが空だった場合に使用する汎用メッセージ
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred";

/// コンタクト API の統一レスポンス型
///
/// この型は以下の場所で使用される:
/// - Contact Service ハンドラ（Serialize でレスポンスを返す）
/// - Contact Client（Deserialize でレスポンスを受け取る）
///
/// `data` はエンドポイントごとに型を決める。既定は任意の JSON 値。
///
/// ## 使用例
///
/// ```
/// use sysdak_shared::ApiResponse;
///
/// let response = ApiResponse::<()>::ok("OK");
/// assert!(response.success);
/// assert_eq!(response.message, "OK");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data:    Option<T>,
}

impl<T> ApiResponse<T> {
    /// データなしの成功レスポンスを作成する
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data:    None,
        }
    }

    /// データ付きの成功レスポンスを作成する
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data:    Some(data),
        }
    }

    /// 失敗レスポンスを作成する
    ///
    /// 失敗レスポンスは必ず空でないメッセージを持つ。
    /// 空白のみのメッセージは [`GENERIC_FAILURE_MESSAGE`] に置き換える。
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            success: false,
            message,
            data: None,
        }
    }
}
