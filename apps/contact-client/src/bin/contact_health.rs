//! # Contact API 死活確認
//!
//! `SYSDAK_API_URL` の Contact Service に `GET /health` を送り、結果を出力する。
//! 稼働していない、またはメール送信設定が揃っていない場合は終了コード 1 で終了する。
//!
//! ```bash
//! SYSDAK_API_URL=https://api.sysdak.com/api cargo run -p sysdak-contact-client --bin contact-health
//! ```

use anyhow::Context as _;
use sysdak_contact_client::{ClientConfig, ContactApiClient, ContactApiClientImpl};
use sysdak_shared::observability::TracingConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("contact-health");
    sysdak_shared::observability::init_tracing(tracing_config)?;

    let config = ClientConfig::from_env().context("設定の読み込みに失敗しました")?;
    let client = ContactApiClientImpl::new(&config).context("HTTP クライアントの初期化に失敗しました")?;

    let response = client
        .health_check()
        .await
        .with_context(|| format!("{} に接続できません", config.base_url))?;

    let Some(health) = response.data else {
        anyhow::bail!("ヘルスチェックの応答にデータが含まれていません: {}", response.message);
    };

    tracing::info!(
        status = %health.status,
        version = %health.version,
        timestamp = %health.timestamp,
        email_configured = health.email_configured,
        "Contact Service は稼働しています"
    );

    if !health.email_configured {
        anyhow::bail!("Contact Service のメール送信設定が揃っていません");
    }

    Ok(())
}
