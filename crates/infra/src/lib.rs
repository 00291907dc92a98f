//! # Sysdak インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **メール送信**: SMTP サーバーへの接続、メッセージ構築、送信
//! - **テスト用モック**: `test-utils` feature でインメモリ実装を公開
//!
//! ## 依存関係
//!
//! ```text
//! apps → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`notification`] - メール送信トレイトと実装（SMTP / Noop）
//! - `mock` - テスト用インメモリ送信（`test-utils` feature）

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;

pub use notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender};
