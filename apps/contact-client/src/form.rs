//! # コンタクトフォームの送信制御
//!
//! 画面側のフォームが持つ送信状態をモデル化する。
//!
//! ## 状態遷移
//!
//! ```text
//! Idle ──submit()──▶ Submitting ──▶ Idle（status = Success | Error）
//!                        │
//!                        └── submit()（送信中）──▶ AlreadyPending（リクエストなし）
//! ```
//!
//! ## 表示メッセージ
//!
//! | 状況 | 種別 | メッセージ |
//! |------|------|-----------|
//! | CAPTCHA 未完了 | Error | `Please complete the CAPTCHA verification.` |
//! | 入力が不正 | Error | 違反メッセージを `"; "` で連結 |
//! | `success: true` | Success | サーバーのメッセージ（空なら既定の成功メッセージ） |
//! | `success: false` | Error | サーバーのメッセージ（空なら既定の失敗メッセージ） |
//! | 呼び出しエラー | Error | `Network error occurred. Please check your connection and try again.` |
//!
//! CAPTCHA トークンは送信可否の判定にのみ使い、問い合わせには含めない。

use std::sync::{
    Arc,
    Mutex,
    PoisonError,
    atomic::{AtomicBool, Ordering},
};

use sysdak_domain::contact::{ContactForm, ContactSubmission};

use crate::client::ContactApiClient;

pub const CAPTCHA_REQUIRED_MESSAGE: &str = "Please complete the CAPTCHA verification.";
pub const SUCCESS_FALLBACK_MESSAGE: &str =
    "Your message has been sent successfully. We will contact you soon!";
pub const FAILURE_FALLBACK_MESSAGE: &str = "Failed to send message. Please try again.";
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Network error occurred. Please check your connection and try again.";

/// 表示メッセージの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

/// 送信結果として画面に表示するメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    pub kind:    StatusKind,
    pub message: String,
}

impl FormStatus {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind:    StatusKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind:    StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }
}

/// `submit()` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 送信を試み、表示メッセージが決まった
    ///
    /// 成功時、画面はフォームと CAPTCHA をリセットする。
    Completed(FormStatus),
    /// 送信中のため何もしなかった
    AlreadyPending,
}

/// コンタクトフォームの送信制御
pub struct ContactFormController {
    client:  Arc<dyn ContactApiClient>,
    pending: AtomicBool,
    status:  Mutex<Option<FormStatus>>,
}

/// 送信中フラグを解除するガード（送信がキャンセルされた場合も解除する）
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ContactFormController {
    pub fn new(client: Arc<dyn ContactApiClient>) -> Self {
        Self {
            client,
            pending: AtomicBool::new(false),
            status: Mutex::new(None),
        }
    }

    /// 送信中か
    pub fn is_submitting(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// 直近の表示メッセージ
    pub fn status(&self) -> Option<FormStatus> {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// フォームを送信する
    ///
    /// CAPTCHA 未完了・入力不正の場合はリクエストを送らない。
    pub async fn submit(&self, form: ContactForm, captcha_token: Option<&str>) -> SubmitOutcome {
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("送信中のため二重送信を無視します");
            return SubmitOutcome::AlreadyPending;
        }
        let _guard = PendingGuard(&self.pending);

        self.set_status(None);
        let status = self.resolve_status(form, captcha_token).await;
        self.set_status(Some(status.clone()));

        SubmitOutcome::Completed(status)
    }

    async fn resolve_status(&self, form: ContactForm, captcha_token: Option<&str>) -> FormStatus {
        if captcha_token.is_none_or(|token| token.trim().is_empty()) {
            return FormStatus::error(CAPTCHA_REQUIRED_MESSAGE);
        }

        let submission = match ContactSubmission::try_from(form) {
            Ok(submission) => submission,
            Err(e) => return FormStatus::error(e.to_string()),
        };

        match self.client.submit_contact_form(&submission).await {
            Ok(response) if response.success => {
                FormStatus::success(non_empty_or(response.message, SUCCESS_FALLBACK_MESSAGE))
            }
            Ok(response) => {
                FormStatus::error(non_empty_or(response.message, FAILURE_FALLBACK_MESSAGE))
            }
            Err(e) => {
                tracing::warn!(error = %e, "問い合わせの送信に失敗");
                FormStatus::error(NETWORK_FAILURE_MESSAGE)
            }
        }
    }

    fn set_status(&self, status: Option<FormStatus>) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
