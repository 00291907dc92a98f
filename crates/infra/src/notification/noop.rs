//! 送信しない実装
//!
//! `NOTIFICATION_BACKEND=noop` のとき使われる。件名と宛先数だけを記録し、
//! 接続確認も常に成功する。

use async_trait::async_trait;
use sysdak_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            notification.backend = "noop",
            recipients = email.to.len(),
            has_reply_to = email.reply_to.is_some(),
            subject = %email.subject,
            "送信を省略しました"
        );
        Ok(())
    }

    async fn verify_connection(&self) -> Result<(), NotificationError> {
        tracing::debug!(notification.backend = "noop", "接続確認を省略しました");
        Ok(())
    }
}
