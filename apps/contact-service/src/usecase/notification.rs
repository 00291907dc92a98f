//! # 通知ユースケース
//!
//! 問い合わせに伴うメール通知の生成・送信・ログ記録を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール生成
//! - [`notifier`] - 送信設定の状態管理 + テンプレートレンダリング + 送信の統合

pub mod notifier;
pub mod template_renderer;

pub use notifier::ContactNotifier;
pub use template_renderer::TemplateRenderer;
