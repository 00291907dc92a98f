//! # 問い合わせハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/contact` - 問い合わせを受け付け、社内通知と自動返信を送信する
//!
//! ## レスポンス
//!
//! | 状況 | ステータス | メッセージ |
//! |------|-----------|-----------|
//! | 社内通知を送信 | 200 | `Your message has been sent successfully. We will contact you soon!` |
//! | 検証エラー | 400 | 違反メッセージを `"; "` で連結 |
//! | 送信設定なし | 500 | `Email service not configured` |
//! | 社内通知の失敗 | 500 | `Failed to send email. Please try again.` |
//! | 送信元 IP のレート制限超過 | 429 | `Too many requests. Please try again later.` |
//!
//! 自動返信の失敗はレスポンスを失敗にしない（`data.auto_reply = "failed"` として返す）。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use sysdak_domain::{
    clock::Clock,
    contact::{ContactForm, ContactSubmission, redact_email},
    notification::DeliveryReport,
};
use sysdak_shared::{ApiResponse, event_log::event, log_business_event};

use crate::{error::ContactServiceError, usecase::notification::ContactNotifier};

/// 問い合わせ成功時のメッセージ
pub const CONTACT_SUCCESS_MESSAGE: &str =
    "Your message has been sent successfully. We will contact you soon!";

/// Contact API の共有状態
pub struct ContactState {
    pub notifier:         Arc<ContactNotifier>,
    /// 起動時の送信設定が揃っているか
    pub email_configured: bool,
    pub clock:            Arc<dyn Clock>,
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<Arc<ContactState>>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<ApiResponse<DeliveryReport>>, ContactServiceError> {
    if !state.email_configured {
        return Err(ContactServiceError::NotConfigured);
    }

    let Json(form) = payload?;

    log_business_event!(
        event.category = event::category::CONTACT,
        event.action = event::action::CONTACT_RECEIVED,
        event.entity_type = event::entity_type::CONTACT_SUBMISSION,
        event.result = event::result::SUCCESS,
        contact.submitter = %redact_email(&form.email),
        "問い合わせを受信"
    );

    let submission = ContactSubmission::try_from(form).inspect_err(|e| {
        log_business_event!(
            event.category = event::category::CONTACT,
            event.action = event::action::CONTACT_REJECTED,
            event.entity_type = event::entity_type::CONTACT_SUBMISSION,
            event.result = event::result::FAILURE,
            reason = %e,
            "問い合わせの検証に失敗"
        );
    })?;

    let report = state.notifier.notify_submission(&submission).await;

    if !report.internal.is_delivered() {
        return Err(ContactServiceError::DeliveryFailed);
    }

    if !report.auto_reply.is_delivered() {
        tracing::warn!(
            submitter = %redact_email(submission.email()),
            "自動返信の送信に失敗しましたが、問い合わせは受け付けました"
        );
    }

    log_business_event!(
        event.category = event::category::CONTACT,
        event.action = event::action::CONTACT_SUBMITTED,
        event.entity_type = event::entity_type::CONTACT_SUBMISSION,
        event.result = event::result::SUCCESS,
        contact.submitter = %redact_email(submission.email()),
        contact.subject = submission.subject(),
        contact.subject_category = subject_category(&submission),
        delivery = %report,
        "問い合わせを受け付けました"
    );

    Ok(Json(ApiResponse::with_data(CONTACT_SUCCESS_MESSAGE, report)))
}

/// ログ集計用の件名カテゴリ（フォームの選択肢以外は `custom`）
fn subject_category(submission: &ContactSubmission) -> &'static str {
    submission.known_subject().map_or("custom", Into::into)
}
