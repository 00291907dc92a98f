//! # コンタクトフォーム送信 CLI
//!
//! Web サイトのフォームと同じ経路（CAPTCHA 確認 → 検証 → `POST /contact`）で
//! 問い合わせを 1 件送信する。送信に成功したら、フッターと同じソーシャルリンクを表示する。
//!
//! ```bash
//! cargo run -p sysdak-contact-client --bin contact-submit -- \
//!   --name "Priya Raman" --email priya@example.com \
//!   --subject Sales --message "Please send a quote." --captcha-token manual
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use sysdak_contact_client::{ClientConfig, ContactApiClientImpl, ContactFormController, SubmitOutcome};
use sysdak_domain::contact::ContactForm;
use sysdak_shared::observability::TracingConfig;

#[derive(Parser)]
#[command(name = "contact-submit")]
#[command(about = "Submit a contact request to the SysDak Contact API")]
struct Args {
    #[arg(long)]
    name:          String,
    #[arg(long)]
    email:         String,
    /// `General Inquiry` / `Support` / `Sales` / `Project Discussion` / `Other` または自由記述
    #[arg(long, default_value = "General Inquiry")]
    subject:       String,
    #[arg(long)]
    message:       String,
    /// 人間確認のトークン（未指定なら送信しない）
    #[arg(long)]
    captcha_token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let tracing_config =
        TracingConfig::from_env("contact-submit").with_default_filter("warn,sysdak=info");
    sysdak_shared::observability::init_tracing(tracing_config)?;

    let config = ClientConfig::from_env().context("設定の読み込みに失敗しました")?;
    let client =
        ContactApiClientImpl::new(&config).context("HTTP クライアントの初期化に失敗しました")?;
    let controller = ContactFormController::new(Arc::new(client));

    let form = ContactForm {
        name:    args.name,
        email:   args.email,
        subject: args.subject,
        message: args.message,
    };
    let SubmitOutcome::Completed(status) =
        controller.submit(form, args.captcha_token.as_deref()).await
    else {
        anyhow::bail!("別の送信が処理中です");
    };

    if !status.is_success() {
        anyhow::bail!("{}", status.message);
    }

    println!("{}", status.message);
    let links: Vec<_> = config.enabled_social_links().collect();
    if !links.is_empty() {
        println!();
        println!("Follow SysDak:");
        for link in links {
            println!("  {:<10} {}", link.platform, link.url);
        }
    }

    Ok(())
}
