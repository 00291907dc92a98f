//! # Contact Service サーバー
//!
//! Web サイトのコンタクトフォームを受け付け、メールで通知する API サーバー。
//!
//! ## 役割
//!
//! - **入力検証**: 必須項目・文字数・メール形式・スクリプト注入パターン
//! - **社内通知**: 設定済みの宛先リストへ問い合わせ内容を送信
//! - **自動返信**: 送信者へ受付確認を送信
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │   Browser    │────▶│ Contact Service  │────▶│ SMTP Server  │
//! │ (フォーム)    │     │   port: 5000     │     │              │
//! └──────────────┘     └──────────────────┘     └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CONTACT_HOST` | No | バインドアドレス（デフォルト: `127.0.0.1`） |
//! | `CONTACT_PORT` | No | ポート番号（デフォルト: `5000`） |
//! | `ALLOWED_ORIGINS` | No | CORS 許可オリジン（カンマ区切り、デフォルト: `http://localhost:5173`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp`（デフォルト）または `noop` |
//! | `EMAIL_HOST` / `EMAIL_PORT` | No | SMTP サーバー（デフォルト: `smtp.gmail.com:587`） |
//! | `EMAIL_SECURE` | No | `true` で接続直後から TLS |
//! | `EMAIL_USERNAME` / `EMAIL_PASSWORD` | **Yes** | SMTP 認証情報 |
//! | `EMAIL_FROM` | **Yes** | 送信元アドレス |
//! | `EMAIL_TO` | **Yes** | 社内通知の宛先（カンマ区切り） |
//! | `RATE_LIMIT_ENABLED` | No | `false` で送信元 IP ごとのレート制限を無効化 |
//! | `RATE_LIMIT_CONTACT` / `RATE_LIMIT_TEST_EMAIL` / `RATE_LIMIT_DEFAULT` | No | 上限（例: `5/hour`、`200/day,50/hour`） |
//!
//! 送信設定が揃っていない場合も起動はするが、`/api/contact` と `/api/test-email` は
//! `Email service not configured` を返す。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（メールを送らない）
//! NOTIFICATION_BACKEND=noop cargo run -p sysdak-contact-service
//!
//! # 本番環境
//! EMAIL_USERNAME=... EMAIL_PASSWORD=... EMAIL_FROM=... EMAIL_TO=... \
//!   cargo run -p sysdak-contact-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use sysdak_contact_service::{
    app_builder::build_app,
    config::{NotificationBackend, ServiceConfig},
    handler::ContactState,
    usecase::notification::{ContactNotifier, TemplateRenderer},
};
use sysdak_domain::clock::{Clock, SystemClock};
use sysdak_infra::notification::NoopNotificationSender;
use sysdak_shared::{
    event_log::error::{category, kind},
    observability::TracingConfig,
};
use tokio::net::TcpListener;

/// Contact Service サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. 通知サービスの構築
/// 5. ルーターの構築と HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("contact-service");
    sysdak_shared::observability::init_tracing(tracing_config)?;
    let _tracing_guard = tracing::info_span!("app", service = "contact-service").entered();

    // 設定読み込み
    let config = ServiceConfig::from_env().context("設定の読み込みに失敗しました")?;
    let email_configured = config.notification.is_email_configured();

    tracing::info!(
        "Contact Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // 通知サービスの構築
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let renderer = TemplateRenderer::new(clock.clone())
        .context("メールテンプレートの読み込みに失敗しました")?;
    let mut notifier = ContactNotifier::new(renderer);

    match config.notification.backend {
        NotificationBackend::Smtp => notifier
            .configure(config.notification.mail.clone())
            .context("SMTP 送信設定の構築に失敗しました")?,
        NotificationBackend::Noop => notifier.configure_with_sender(
            config.notification.mail.clone(),
            Arc::new(NoopNotificationSender),
        ),
    }
    tracing::info!(backend = %config.notification.backend, "通知バックエンドを設定しました");

    if !email_configured {
        tracing::warn!(
            error.category = category::CONFIGURATION,
            error.kind = kind::NOT_CONFIGURED,
            "メール送信設定が不足しています（EMAIL_USERNAME / EMAIL_PASSWORD / EMAIL_FROM / EMAIL_TO）"
        );
    }

    let state = Arc::new(ContactState {
        notifier: Arc::new(notifier),
        email_configured,
        clock,
    });

    // ルーター構築
    let app = build_app(&config, state);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Contact Service サーバーが起動しました: {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
