//! # Contact API クライアント
//!
//! Contact Service との通信を担当する。
//!
//! ## エンドポイント
//!
//! - `POST {base_url}/contact` - 問い合わせを送信
//! - `POST {base_url}/test-email` - テストメールを送信
//! - `GET {base_url}/health` - 稼働状態を確認
//!
//! 1 回の呼び出しにつき 1 リクエストのみ送信する。リトライはしない。

pub mod contact_client;
pub mod error;
mod response;

pub use contact_client::{ContactApiClient, ContactApiClientImpl};
pub use error::ContactApiError;
