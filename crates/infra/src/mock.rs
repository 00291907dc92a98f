//! # テスト用モック送信
//!
//! ユースケーステストで使用するインメモリの `NotificationSender`。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! sysdak-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sysdak_domain::notification::{EmailMessage, NotificationError};

use crate::notification::NotificationSender;

// ===== MockNotificationSender =====

/// 送信試行を記録するモック
///
/// `fail_for` で登録した宛先を含むメールは送信拒否として扱う。
/// クローンは記録を共有するため、テスト側でクローンを保持して検証できる。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    attempts:           Arc<Mutex<Vec<EmailMessage>>>,
    sent:               Arc<Mutex<Vec<EmailMessage>>>,
    rejected:           Arc<Mutex<Vec<String>>>,
    verification_error: Arc<Mutex<Option<String>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先への送信を拒否させる
    pub fn fail_for(&self, recipient: impl Into<String>) {
        self.rejected.lock().unwrap().push(recipient.into());
    }

    /// 接続確認を失敗させる
    pub fn fail_verification(&self, reason: impl Into<String>) {
        *self.verification_error.lock().unwrap() = Some(reason.into());
    }

    /// 送信試行（成功・失敗を問わない）
    pub fn attempts(&self) -> Vec<EmailMessage> {
        self.attempts.lock().unwrap().clone()
    }

    /// 送信に成功したメール
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.attempts.lock().unwrap().push(email.clone());

        let rejected = self.rejected.lock().unwrap();
        if let Some(recipient) = email.to.iter().find(|to| rejected.contains(to)) {
            return Err(NotificationError::SendFailed(format!(
                "550 recipient rejected: {recipient}"
            )));
        }
        drop(rejected);

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }

    async fn verify_connection(&self) -> Result<(), NotificationError> {
        match self.verification_error.lock().unwrap().clone() {
            Some(reason) => Err(NotificationError::ConnectionFailed(reason)),
            None => Ok(()),
        }
    }
}
