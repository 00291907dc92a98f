//! # メール送信基盤
//!
//! 問い合わせ通知・自動返信・テストメールはすべて [`NotificationSender`] を通って送られる。
//!
//! | 実装 | `NOTIFICATION_BACKEND` | 用途 |
//! |---|---|---|
//! | [`SmtpNotificationSender`] | `smtp`（既定） | 本番・ステージング |
//! | [`NoopNotificationSender`] | `noop` | ローカル開発・デモ環境 |
//!
//! 1 回の呼び出しは 1 回の送信試行に対応する。再送は行わない。

mod noop;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopNotificationSender;
pub use smtp::SmtpNotificationSender;
use sysdak_domain::notification::{EmailMessage, NotificationError};

/// 送信元アドレスを保持し、[`EmailMessage`] を配送する
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// `Ok(())` は送信基盤が受け付けたことだけを表す（受信箱への到達は保証しない）
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;

    /// 何も送らずに接続と認証だけを確認する
    async fn verify_connection(&self) -> Result<(), NotificationError>;
}
