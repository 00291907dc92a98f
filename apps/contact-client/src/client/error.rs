//! Contact API クライアントのエラー型

use thiserror::Error;

/// Contact API クライアントエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactApiError {
    /// 2xx 以外のレスポンス
    ///
    /// 表示文字列はサーバーのメッセージ（または代替メッセージ）そのもの。
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 接続・送受信の失敗
    #[error("ネットワークエラー: {0}")]
    Network(String),

    /// 成功レスポンスのボディを解釈できない
    #[error("レスポンスの解析に失敗: {0}")]
    Decode(String),
}

impl ContactApiError {
    /// HTTP ステータスコード（`Api` の場合のみ）
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for ContactApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ContactApiError::Decode(err.to_string())
        } else {
            ContactApiError::Network(err.to_string())
        }
    }
}
