//! # 通知
//!
//! メール通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`EmailMessage`] | メールメッセージ | テンプレートレンダリングの出力 |
//! | [`MailTransportConfig`] | 送信設定 | SMTP 接続先・認証情報・送信元・宛先 |
//! | [`DeliveryReport`] | 配信結果 | 社内通知と自動返信それぞれの成否 |
//!
//! ## 設計方針
//!
//! - **独立した 2 通**: 社内通知と自動返信は互いの成否に影響しない
//! - **部分配信を許容**: どちらか一方だけが届いた状態も正当な終状態として扱う

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// 送信設定が行われる前に操作された
    #[error("Email service not configured")]
    NotConfigured,

    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// 送信基盤への接続確認に失敗
    #[error("メールサーバーへの接続確認に失敗: {0}")]
    ConnectionFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
/// 送信元アドレスは送信側（NotificationSender）が保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス（1 件以上）
    pub to:        Vec<String>,
    /// 返信先メールアドレス
    pub reply_to:  Option<String>,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// メール送信設定
///
/// 値の妥当性は設定時には検証しない。不正な認証情報は送信時に初めて失敗する。
#[derive(Clone, PartialEq, Eq)]
pub struct MailTransportConfig {
    /// SMTP ホスト
    pub host:         String,
    /// SMTP ポート
    pub port:         u16,
    /// `true` で接続直後から TLS、`false` で STARTTLS（サーバーが対応していれば）
    pub secure:       bool,
    /// SMTP 認証ユーザー名
    pub username:     String,
    /// SMTP 認証パスワード
    pub password:     String,
    /// 送信元アドレス
    pub from_address: String,
    /// 社内通知の宛先
    pub to_addresses: Vec<String>,
}

impl MailTransportConfig {
    /// 送信に必要な値（認証情報・送信元・宛先）がすべて揃っているか
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty()
            && !self.password.is_empty()
            && !self.from_address.is_empty()
            && !self.to_addresses.is_empty()
    }
}

impl fmt::Debug for MailTransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailTransportConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("to_addresses", &self.to_addresses)
            .finish()
    }
}

/// 1 通分の配信結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryStatus {
    /// 送信基盤が受け付けた
    Delivered,
    /// 送信に失敗した
    Failed,
}

impl DeliveryStatus {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// 1 件の問い合わせに対する配信結果
///
/// 2 通の送信はアトミックではないため、成否を個別に保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// 社内通知
    pub internal:   DeliveryStatus,
    /// 送信者への自動返信
    pub auto_reply: DeliveryStatus,
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "internal={}, auto_reply={}", self.internal, self.auto_reply)
    }
}
