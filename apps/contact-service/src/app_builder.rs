//! # Contact Service アプリケーション構築
//!
//! ルーター定義と共通レイヤー（CORS・セキュリティヘッダー・リクエスト ID・
//! トレース・ボディサイズ上限）、ルート単位のレート制限の組み立てを担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{MethodRouter, get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::{
    config::{RateLimitConfig, ServiceConfig},
    handler::{ContactState, health_check, not_found, send_test_email, submit_contact},
    rate_limit::{RateLimit, RateLimiter, enforce_rate_limit},
};

/// リクエストボディの上限（16 KiB）
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// ルーターを構築する
///
/// API は `/api` 配下にマウントし、未定義ルートは 404 の失敗エンベロープを返す。
/// レート制限の記録はこの関数で作るルーターごとに独立する。
pub fn build_app(config: &ServiceConfig, state: Arc<ContactState>) -> Router {
    let limits = &config.rate_limit;
    let api = Router::new()
        .route(
            "/contact",
            limited(post(submit_contact), "contact", &limits.contact, limits),
        )
        .route(
            "/test-email",
            limited(post(send_test_email), "test_email", &limits.test_email, limits),
        )
        .route(
            "/health",
            limited(get(health_check), "default", &limits.default, limits),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(&config.allowed_origins))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn limited(
    route: MethodRouter<Arc<ContactState>>,
    name: &'static str,
    rules: &[RateLimit],
    config: &RateLimitConfig,
) -> MethodRouter<Arc<ContactState>> {
    if !config.enabled {
        return route;
    }
    let limiter = Arc::new(RateLimiter::new(name, rules.to_vec()));
    route.layer(middleware::from_fn_with_state(limiter, enforce_rate_limit))
}

/// 設定済みオリジンからの GET/POST（`Content-Type` ヘッダー付き）を許可する
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "不正なオリジンを CORS 設定から除外します");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
