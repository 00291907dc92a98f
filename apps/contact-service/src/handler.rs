//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、送信処理は `ContactNotifier` に委譲

pub mod contact;
pub mod fallback;
pub mod health;
pub mod test_email;

pub use contact::{ContactState, submit_contact};
pub use fallback::not_found;
pub use health::health_check;
pub use test_email::{TestEmailRequest, send_test_email};
