//! # ユースケース層
//!
//! ハンドラから呼び出されるアプリケーションロジックを配置する。

pub mod notification;
