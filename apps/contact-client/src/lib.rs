//! # Contact Client
//!
//! Contact Service の API（`/contact`・`/test-email`・`/health`）を呼び出すクライアントと、
//! コンタクトフォームの送信状態を管理するコントローラーを提供する。
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの接続設定・フッターのソーシャルリンク
//! - [`client`] - HTTP クライアント（`ContactApiClient` トレイトと reqwest 実装）
//! - [`form`] - フォーム送信の状態遷移（CAPTCHA 確認・二重送信防止・表示メッセージ）

pub mod client;
pub mod config;
pub mod form;

pub use client::{ContactApiClient, ContactApiClientImpl, ContactApiError};
pub use config::ClientConfig;
pub use form::{ContactFormController, FormStatus, StatusKind, SubmitOutcome};
