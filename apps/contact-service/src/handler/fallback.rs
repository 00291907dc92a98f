//! 未定義ルートのハンドラ

use crate::error::ContactServiceError;

/// 404 の失敗エンベロープを返す
pub async fn not_found() -> ContactServiceError {
    ContactServiceError::NotFound
}
