//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **HTML エスケープ**: `.html` テンプレートは tera の autoescape が有効。
//!   本文の改行はエスケープ後に `<br>` へ変換する
//! - **件名パターン**:
//!   - 社内通知: `New Contact Form Submission: {subject}`
//!   - 自動返信: `Thank you for contacting SysDak - {subject}`
//!   - テスト: `SysDak Email Service Test`

use std::sync::Arc;

use chrono::Datelike;
use sysdak_domain::{
    clock::Clock,
    contact::ContactSubmission,
    notification::{EmailMessage, NotificationError},
};
use tera::{Context, Tera};

/// 自動返信に記載する電話番号
pub const COMPANY_PHONE: &str = "+91 8946060246";
/// 自動返信に記載する問い合わせ先アドレス
pub const COMPANY_EMAIL: &str = "contact@sysdak.com";
/// 自動返信に記載する所在地
pub const COMPANY_ADDRESS: &str =
    "Plot no 48 Nirmun Layout A Samanapalli Road Sipcot 2 Hosur - 635109";

/// テスト送信の件名
pub const TEST_EMAIL_SUBJECT: &str = "SysDak Email Service Test";

/// メール本文の日時表記（例: `January 05, 2026 at 03:04 PM`）
const TIMESTAMP_FORMAT: &str = "%B %d, %Y at %I:%M %p";

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`ContactSubmission` から
/// `EmailMessage` を生成する。送信日時は注入された [`Clock`] から取得する。
pub struct TemplateRenderer {
    engine: Tera,
    clock:  Arc<dyn Clock>,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new(clock: Arc<dyn Clock>) -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "contact_notification.html",
                    include_str!("../../../templates/notifications/contact_notification.html"),
                ),
                (
                    "contact_notification.txt",
                    include_str!("../../../templates/notifications/contact_notification.txt"),
                ),
                (
                    "auto_reply.html",
                    include_str!("../../../templates/notifications/auto_reply.html"),
                ),
                (
                    "auto_reply.txt",
                    include_str!("../../../templates/notifications/auto_reply.txt"),
                ),
                (
                    "test_email.html",
                    include_str!("../../../templates/notifications/test_email.html"),
                ),
                (
                    "test_email.txt",
                    include_str!("../../../templates/notifications/test_email.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine, clock })
    }

    /// 社内通知を生成する
    ///
    /// 返信先は送信者のメールアドレス。担当者がそのまま返信できるようにする。
    pub fn render_contact_notification(
        &self,
        submission: &ContactSubmission,
        recipients: &[String],
    ) -> Result<EmailMessage, NotificationError> {
        let context = self.submission_context(submission);
        let (html_body, text_body) = self.render_pair("contact_notification", &context)?;

        Ok(EmailMessage {
            to: recipients.to_vec(),
            reply_to: Some(submission.email().to_string()),
            subject: format!("New Contact Form Submission: {}", submission.subject()),
            html_body,
            text_body,
        })
    }

    /// 送信者への自動返信を生成する
    pub fn render_auto_reply(
        &self,
        submission: &ContactSubmission,
    ) -> Result<EmailMessage, NotificationError> {
        let context = self.submission_context(submission);
        let (html_body, text_body) = self.render_pair("auto_reply", &context)?;

        Ok(EmailMessage {
            to: vec![submission.email().to_string()],
            reply_to: None,
            subject: format!("Thank you for contacting SysDak - {}", submission.subject()),
            html_body,
            text_body,
        })
    }

    /// 送信設定の確認用メールを生成する
    pub fn render_test_email(&self, to: &str) -> Result<EmailMessage, NotificationError> {
        let context = self.base_context();
        let (html_body, text_body) = self.render_pair("test_email", &context)?;

        Ok(EmailMessage {
            to: vec![to.to_string()],
            reply_to: None,
            subject: TEST_EMAIL_SUBJECT.to_string(),
            html_body,
            text_body,
        })
    }

    fn render_pair(
        &self,
        template_name: &str,
        context: &Context,
    ) -> Result<(String, String), NotificationError> {
        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok((html_body, text_body))
    }

    fn submission_context(&self, submission: &ContactSubmission) -> Context {
        let mut context = self.base_context();
        context.insert("name", submission.name());
        context.insert("email", submission.email());
        context.insert("subject", submission.subject());
        context.insert("message", submission.message());
        context
    }

    /// 全テンプレート共通の値（送信日時・会社情報）
    fn base_context(&self) -> Context {
        let now = self.clock.now();

        let mut context = Context::new();
        context.insert("submitted_at", &now.format(TIMESTAMP_FORMAT).to_string());
        context.insert("year", &now.year());
        context.insert("company_phone", COMPANY_PHONE);
        context.insert("company_email", COMPANY_EMAIL);
        context.insert("company_address", COMPANY_ADDRESS);
        context
    }
}
