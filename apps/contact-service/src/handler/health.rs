//! # ヘルスチェックハンドラ
//!
//! Contact Service の稼働状態とメール送信設定の有無を返す。
//!
//! ## エンドポイント
//!
//! ```text
//! GET /api/health
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Service is healthy",
//!   "data": {
//!     "status": "healthy",
//!     "version": "0.1.0",
//!     "timestamp": "2026-01-05T15:04:00+00:00",
//!     "email_configured": true
//!   }
//! }
//! ```

use std::sync::Arc;

use axum::{Json, extract::State};
use sysdak_shared::{ApiResponse, HealthData};

use super::ContactState;

/// ヘルスチェックエンドポイント
pub async fn health_check(
    State(state): State<Arc<ContactState>>,
) -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse::with_data(
        "Service is healthy",
        HealthData {
            status:           "healthy".to_string(),
            version:          env!("CARGO_PKG_VERSION").to_string(),
            timestamp:        state.clock.now().to_rfc3339(),
            email_configured: state.email_configured,
        },
    ))
}
