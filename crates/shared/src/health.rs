//! # ヘルスチェック共通型
//!
//! Contact Service の `/api/health` が `data` に格納するペイロードを提供する。
//! サービス側で Serialize、クライアント側で Deserialize される。

use serde::{Deserialize, Serialize};

/// ヘルスチェックのペイロード
///
/// ## 使用例
///
/// ```
/// use sysdak_shared::HealthData;
///
/// let data = HealthData {
///     status:           "healthy".to_string(),
///     version:          "0.1.0".to_string(),
///     timestamp:        "2026-01-05T15:04:00+00:00".to_string(),
///     email_configured: true,
/// };
/// assert_eq!(data.status, "healthy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthData {
    /// 稼働状態（`"healthy"`）
    pub status:           String,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version:          String,
    /// 応答時刻（RFC 3339）
    pub timestamp:        String,
    /// メール送信設定が揃っているか
    pub email_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_dataのserializeで正しいjson形状にする() {
        let data = HealthData {
            status:           "healthy".to_string(),
            version:          "0.1.0".to_string(),
            timestamp:        "2026-01-05T15:04:00+00:00".to_string(),
            email_configured: false,
        };
        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "healthy",
                "version": "0.1.0",
                "timestamp": "2026-01-05T15:04:00+00:00",
                "email_configured": false
            })
        );
    }
}
