//! # コンタクト通知
//!
//! 問い合わせ 1 件につき社内通知と自動返信の 2 通を送信する。
//!
//! ## 状態遷移
//!
//! ```text
//! Unconfigured ──configure()──▶ Configured
//! ```
//!
//! 未設定のまま呼び出された操作はすべて `NotificationError::NotConfigured` になる。
//! 設定済みから未設定へ戻る遷移はない。
//!
//! ## 設計方針
//!
//! - **独立した 2 通**: `notify_submission()` は 2 通を並行に送信し、
//!   一方の失敗で他方を打ち切らない
//! - **共有は読み取り専用**: 設定後は `Arc` 越しに共有し、リクエスト間で可変状態を持たない
//! - **依存性注入**: 送信基盤は `NotificationSender` トレイトで抽象化

use std::sync::Arc;

use sysdak_domain::{
    contact::{ContactSubmission, redact_email},
    notification::{
        DeliveryReport,
        DeliveryStatus,
        EmailMessage,
        MailTransportConfig,
        NotificationError,
    },
};
use sysdak_infra::notification::{NotificationSender, SmtpNotificationSender};
use sysdak_shared::{event_log::event, log_business_event};

use super::TemplateRenderer;

/// 送信設定の状態
enum TransportState {
    Unconfigured,
    Configured {
        config: MailTransportConfig,
        sender: Arc<dyn NotificationSender>,
    },
}

/// コンタクト通知サービス
///
/// テンプレートレンダリング → メール送信 → ログ記録を統合する。
pub struct ContactNotifier {
    state:    TransportState,
    renderer: TemplateRenderer,
}

impl ContactNotifier {
    /// 未設定状態で作成する
    pub fn new(renderer: TemplateRenderer) -> Self {
        Self {
            state: TransportState::Unconfigured,
            renderer,
        }
    }

    /// SMTP 送信基盤を構築して設定済みにする
    ///
    /// 値の妥当性（認証情報など）は検証しない。不正な値は送信時に失敗する。
    pub fn configure(&mut self, config: MailTransportConfig) -> Result<(), NotificationError> {
        let sender = SmtpNotificationSender::new(&config)?;
        self.configure_with_sender(config, Arc::new(sender));
        Ok(())
    }

    /// 送信基盤を差し替えて設定済みにする
    pub fn configure_with_sender(
        &mut self,
        config: MailTransportConfig,
        sender: Arc<dyn NotificationSender>,
    ) {
        tracing::info!(
            host = %config.host,
            port = config.port,
            secure = config.secure,
            recipients = config.to_addresses.len(),
            "メール送信設定を適用しました"
        );
        self.state = TransportState::Configured { config, sender };
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, TransportState::Configured { .. })
    }

    /// 設定済みの送信元アドレス
    pub fn from_address(&self) -> Option<&str> {
        match &self.state {
            TransportState::Configured { config, .. } => Some(config.from_address.as_str()),
            TransportState::Unconfigured => None,
        }
    }

    fn transport(
        &self,
    ) -> Result<(&MailTransportConfig, &Arc<dyn NotificationSender>), NotificationError> {
        match &self.state {
            TransportState::Configured { config, sender } => Ok((config, sender)),
            TransportState::Unconfigured => Err(NotificationError::NotConfigured),
        }
    }

    /// 社内の宛先リストへ問い合わせ内容を通知する
    ///
    /// `Ok(())` は送信基盤が受け付けたことを意味する。
    pub async fn send_contact_email(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), NotificationError> {
        let (config, sender) = self.transport()?;
        let email = self
            .renderer
            .render_contact_notification(submission, &config.to_addresses)?;

        deliver(
            sender.as_ref(),
            &email,
            event::entity_type::INTERNAL_NOTIFICATION,
        )
        .await
    }

    /// 送信者へ受付確認を返信する
    pub async fn send_auto_reply(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), NotificationError> {
        let (_, sender) = self.transport()?;
        let email = self.renderer.render_auto_reply(submission)?;

        deliver(sender.as_ref(), &email, event::entity_type::AUTO_REPLY).await
    }

    /// 社内通知と自動返信を並行に送信し、それぞれの結果を返す
    ///
    /// 部分配信（一方のみ成功）もそのまま結果として返す。
    pub async fn notify_submission(&self, submission: &ContactSubmission) -> DeliveryReport {
        let (internal, auto_reply) = tokio::join!(
            self.send_contact_email(submission),
            self.send_auto_reply(submission),
        );

        let report = DeliveryReport {
            internal:   to_status(internal),
            auto_reply: to_status(auto_reply),
        };

        tracing::info!(
            report = %report,
            submitter = %redact_email(submission.email()),
            "問い合わせ通知の配信結果"
        );

        report
    }

    /// メールを送らずに送信基盤への接続を確認する
    pub async fn test_connection(&self) -> Result<(), NotificationError> {
        let (_, sender) = self.transport()?;
        sender.verify_connection().await
    }

    /// 送信設定の確認用メールを 1 通送信する
    pub async fn send_test_email(&self, to: &str) -> Result<(), NotificationError> {
        let (_, sender) = self.transport()?;
        let email = self.renderer.render_test_email(to)?;

        deliver(sender.as_ref(), &email, event::entity_type::TEST_EMAIL).await?;

        log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::TEST_EMAIL_SENT,
            event.entity_type = event::entity_type::TEST_EMAIL,
            event.result = event::result::SUCCESS,
            notification.recipient = %redact_email(to),
            "テストメール送信成功"
        );
        Ok(())
    }
}

/// 1 通送信し、成否をビジネスイベントとして記録する
async fn deliver(
    sender: &dyn NotificationSender,
    email: &EmailMessage,
    entity_type: &'static str,
) -> Result<(), NotificationError> {
    let recipients = email
        .to
        .iter()
        .map(String::as_str)
        .map(redact_email)
        .collect::<Vec<_>>()
        .join(", ");

    match sender.send_email(email).await {
        Ok(()) => {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SENT,
                event.entity_type = entity_type,
                event.result = event::result::SUCCESS,
                notification.recipient = %recipients,
                "通知メール送信成功"
            );
            Ok(())
        }
        Err(e) => {
            log_business_event!(warn;
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_FAILED,
                event.entity_type = entity_type,
                event.result = event::result::FAILURE,
                notification.recipient = %recipients,
                error = %e,
                "通知メール送信失敗"
            );
            Err(e)
        }
    }
}

fn to_status(result: Result<(), NotificationError>) -> DeliveryStatus {
    match result {
        Ok(()) => DeliveryStatus::Delivered,
        Err(_) => DeliveryStatus::Failed,
    }
}
