//! # 構造化ログのフィールド規約
//!
//! 問い合わせ 1 件の流れ（受付 → 検証 → 社内通知 → 自動返信）を
//! JSON ログから追跡できるよう、フィールド名と値をここで固定する。
//!
//! ```text
//! jq 'select(.["event.kind"] == "business_event" and .["event.category"] == "notification")'
//! ```
//!
//! - 業務上の出来事は [`log_business_event!`] で出す
//! - 失敗は `tracing::error!` / `tracing::warn!` に `error.category` と `error.kind` を付ける
//! - メールアドレスは `sysdak_domain::contact::redact_email` を通してから出す

/// 業務イベントを出力する
///
/// `event.kind = "business_event"` を付けて `info` で出力する。先頭に
/// `warn;` を書くと `warn` で出力する（自動返信の失敗など、処理は継続するもの）。
///
/// ```ignore
/// log_business_event!(
///     event.category = event::category::CONTACT,
///     event.action = event::action::CONTACT_SUBMITTED,
///     event.result = event::result::SUCCESS,
///     "問い合わせを受け付けました"
/// );
/// ```
#[macro_export]
macro_rules! log_business_event {
    (warn; $($fields:tt)+) => {
        ::tracing::warn!(event.kind = "business_event", $($fields)+)
    };
    ($($fields:tt)+) => {
        ::tracing::info!(event.kind = "business_event", $($fields)+)
    };
}

/// `event.*` フィールドの値
pub mod event {
    /// `event.category`
    pub mod category {
        pub const CONTACT: &str = "contact";
        pub const NOTIFICATION: &str = "notification";
    }

    /// `event.action`（`<category>.<動詞>` 形式）
    pub mod action {
        pub const CONTACT_RECEIVED: &str = "contact.received";
        pub const CONTACT_REJECTED: &str = "contact.rejected";
        pub const CONTACT_SUBMITTED: &str = "contact.submitted";

        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
        pub const TEST_EMAIL_SENT: &str = "notification.test_sent";
    }

    /// `event.entity_type`
    pub mod entity_type {
        pub const CONTACT_SUBMISSION: &str = "contact_submission";
        pub const INTERNAL_NOTIFICATION: &str = "internal_notification";
        pub const AUTO_REPLY: &str = "auto_reply";
        pub const TEST_EMAIL: &str = "test_email";
    }

    /// `event.result`
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// `error.*` フィールドの値
pub mod error {
    /// `error.category`: 失敗がどこで起きたか
    pub mod category {
        /// SMTP などメール送信基盤
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// Contact API 呼び出し（クライアント側）
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// 起動時や送信時に設定が足りない
        pub const CONFIGURATION: &str = "configuration";
    }

    /// `error.kind`: 失敗の種類
    pub mod kind {
        pub const MAIL_TRANSPORT: &str = "mail_transport";
        pub const TEMPLATE: &str = "template";
        pub const NOT_CONFIGURED: &str = "not_configured";
        pub const SERVICE_COMMUNICATION: &str = "service_communication";
    }
}
