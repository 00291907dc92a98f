//! # Contact Service ライブラリ
//!
//! コンタクトフォームの受付 API（`/api/contact`・`/api/test-email`・`/api/health`）と、
//! 問い合わせ通知（社内通知 + 自動返信）のユースケースを公開する。
//! 統合テストからルーターを組み立てられるよう、バイナリとは分けている。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod rate_limit;
pub mod usecase;
