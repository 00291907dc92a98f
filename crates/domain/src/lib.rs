//! # Sysdak ドメイン層
//!
//! コンタクトフォームとメール通知のドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! apps → infra → domain
//!   ↘____________↗
//! ```
//!
//! ドメイン層は HTTP・SMTP などの外部システムに一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ（メール本文の送信日時、ヘルスチェック）
//! - [`contact`] - 問い合わせ（Submission）とその検証ルール
//! - [`notification`] - メールメッセージ、送信設定、配信結果、通知エラー
//!
//! ## 使用例
//!
//! ```rust
//! use sysdak_domain::contact::ContactSubmission;
//!
//! let submission = ContactSubmission::new(
//!     "Priya",
//!     "priya@example.com",
//!     "General Inquiry",
//!     "Hello!",
//! )?;
//! assert_eq!(submission.email(), "priya@example.com");
//! # Ok::<(), sysdak_domain::contact::ContactValidationError>(())
//! ```

pub mod clock;
pub mod contact;
pub mod notification;
