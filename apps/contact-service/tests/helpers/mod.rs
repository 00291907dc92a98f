//! 統合テスト用のアプリケーションビルダー
//!
//! `MockNotificationSender` と固定時刻でルーターを組み立てる。

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use chrono::{TimeZone, Utc};
use sysdak_contact_service::{
    app_builder::build_app,
    config::ServiceConfig,
    handler::ContactState,
    usecase::notification::{ContactNotifier, TemplateRenderer},
};
use sysdak_domain::{
    clock::{Clock, FixedClock},
    notification::MailTransportConfig,
};
use sysdak_infra::mock::MockNotificationSender;

pub const FROM_ADDRESS: &str = "noreply@sysdak.com";
pub const INTERNAL_RECIPIENT: &str = "contact@sysdak.com";

/// テスト用アプリケーションビルダー
pub struct TestAppBuilder {
    sender:           MockNotificationSender,
    email_configured: bool,
    configure:        bool,
    env:              Vec<(&'static str, &'static str)>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            sender:           MockNotificationSender::new(),
            email_configured: true,
            configure:        true,
            env:              vec![("ALLOWED_ORIGINS", "https://sysdak.com")],
        }
    }

    /// 送信設定が揃っていない状態で起動する
    pub fn without_email_config(mut self) -> Self {
        self.email_configured = false;
        self.configure = false;
        self
    }

    /// 環境変数として読み込ませる値を追加する
    pub fn with_env(mut self, key: &'static str, value: &'static str) -> Self {
        self.env.push((key, value));
        self
    }

    /// 送信記録を検証するためのモック（クローンは記録を共有する）
    pub fn sender(&self) -> MockNotificationSender {
        self.sender.clone()
    }

    pub fn build(&self) -> Router {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 15, 4, 0).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now));

        let mut notifier = ContactNotifier::new(TemplateRenderer::new(clock.clone()).unwrap());
        if self.configure {
            notifier.configure_with_sender(mail_config(), Arc::new(self.sender.clone()));
        }

        let config = ServiceConfig::from_lookup(|key| {
            self.env
                .iter()
                .rev()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        })
        .unwrap();

        build_app(
            &config,
            Arc::new(ContactState {
                notifier: Arc::new(notifier),
                email_configured: self.email_configured,
                clock,
            }),
        )
    }
}

fn mail_config() -> MailTransportConfig {
    MailTransportConfig {
        host:         "smtp.example.com".to_string(),
        port:         587,
        secure:       false,
        username:     "mailer".to_string(),
        password:     "s3cret".to_string(),
        from_address: FROM_ADDRESS.to_string(),
        to_addresses: vec![INTERNAL_RECIPIENT.to_string()],
    }
}
