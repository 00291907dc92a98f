//! # 問い合わせ
//!
//! コンタクトフォームから送信される問い合わせ（Submission）を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`ContactSubmission`] | 問い合わせ | 検証済みの 4 フィールド（名前・メール・件名・本文） |
//! | [`ContactForm`] | フォーム入力 | 未検証のワイヤ DTO |
//! | [`ContactSubject`] | 件名カテゴリ | フォームの選択肢。自由記述も許容する |
//!
//! ## 設計方針
//!
//! - **生成時検証**: `ContactSubmission` は検証を通過した値しか存在できない
//! - **全件収集**: 違反は最初の 1 件で打ち切らず、すべて集めて `"; "` で連結する
//! - **永続化しない**: リクエストの寿命を超えて保持されない

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

/// 名前の最大文字数
pub const MAX_NAME_CHARS: usize = 100;
/// 件名の最大文字数
pub const MAX_SUBJECT_CHARS: usize = 200;
/// 本文の最大文字数
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// スクリプト注入とみなす文字列（小文字で比較）
const DANGEROUS_PATTERNS: [&str; 4] = ["<script", "javascript:", "onerror=", "onload="];

/// 問い合わせの検証エラー
///
/// 表示文字列は違反メッセージを `"; "` で連結したもの。
/// そのまま API の失敗レスポンスのメッセージになる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .violations.join("; "))]
pub struct ContactValidationError {
    violations: Vec<String>,
}

impl ContactValidationError {
    /// 個々の違反メッセージ
    pub fn violations(&self) -> &[String] {
        &self.violations
    }
}

/// 件名カテゴリ
///
/// シリアライズ値はフォームの `<option value>` と一致する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display, strum::EnumString)]
pub enum ContactSubject {
    #[strum(serialize = "General Inquiry")]
    GeneralInquiry,
    Support,
    Sales,
    #[strum(serialize = "Project Discussion")]
    ProjectDiscussion,
    Other,
}

/// フォーム入力（未検証）
///
/// 欠落したフィールドと `null` は空文字列として受け取り、検証で `"{field} is required"` にする。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    #[serde(deserialize_with = "null_as_empty")]
    pub name:    String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email:   String,
    #[serde(deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 問い合わせ
///
/// 4 フィールドすべてが空でなく、メールアドレスが基本的な形式を満たす。
/// JSON にはこの 4 フィールドのみがシリアライズされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContactForm")]
pub struct ContactSubmission {
    name:    String,
    email:   String,
    subject: String,
    message: String,
}

impl ContactSubmission {
    /// 問い合わせを作成する
    ///
    /// # バリデーション
    ///
    /// - 4 フィールドが空白以外の文字を含む（1 つでも欠けていれば以降の検証は行わない）
    /// - 名前 100 文字、件名 200 文字、本文 5000 文字以内
    /// - メールアドレスが `local@domain.tld` の形式
    /// - 名前・件名・本文にスクリプト注入パターンを含まない
    ///
    /// # エラー
    ///
    /// 違反をすべて集めた [`ContactValidationError`] を返す。
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ContactValidationError> {
        Self::try_from(ContactForm {
            name:    name.into(),
            email:   email.into(),
            subject: subject.into(),
            message: message.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 件名がフォームの選択肢に一致すればそのカテゴリを返す
    pub fn known_subject(&self) -> Option<ContactSubject> {
        ContactSubject::from_str(&self.subject).ok()
    }
}

impl TryFrom<ContactForm> for ContactSubmission {
    type Error = ContactValidationError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let fields = [
            ("name", &form.name),
            ("email", &form.email),
            ("subject", &form.subject),
            ("message", &form.message),
        ];

        let missing: Vec<String> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| format!("{field} is required"))
            .collect();
        if !missing.is_empty() {
            return Err(ContactValidationError {
                violations: missing,
            });
        }

        let mut violations = Vec::new();

        if form.name.chars().count() > MAX_NAME_CHARS {
            violations.push(format!("Name too long (max {MAX_NAME_CHARS} characters)"));
        }
        if form.subject.chars().count() > MAX_SUBJECT_CHARS {
            violations.push(format!(
                "Subject too long (max {MAX_SUBJECT_CHARS} characters)"
            ));
        }
        if form.message.chars().count() > MAX_MESSAGE_CHARS {
            violations.push(format!(
                "Message too long (max {MAX_MESSAGE_CHARS} characters)"
            ));
        }

        if !is_valid_email(&form.email) {
            violations.push("Invalid email format".to_string());
        }

        for (field, value) in [
            ("name", &form.name),
            ("subject", &form.subject),
            ("message", &form.message),
        ] {
            if contains_dangerous_pattern(value) {
                violations.push(format!("Invalid content detected in {field}"));
            }
        }

        if !violations.is_empty() {
            return Err(ContactValidationError { violations });
        }

        Ok(Self {
            name:    form.name,
            email:   form.email,
            subject: form.subject,
            message: form.message,
        })
    }
}

/// メールアドレスが基本的な形式を満たすか
///
/// - `@` がちょうど 1 つ
/// - ローカル部とドメイン部が空でない
/// - ドメイン部が `.` で区切られた 2 つ以上の空でないラベルからなる
/// - 空白・制御文字を含まない、254 文字以内
pub fn is_valid_email(value: &str) -> bool {
    if value.len() > 254 || value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// ログ出力用にメールアドレスをマスクする
///
/// `user@domain.com` → `u***@d*****.com`。形式が不正な場合は `***`。
pub fn redact_email(value: &str) -> String {
    let Some((local, domain)) = value.split_once('@') else {
        return "***".to_string();
    };

    let (Some(local_head), Some(domain_head)) = (local.chars().next(), domain.chars().next())
    else {
        return "***".to_string();
    };

    let tail_start = domain
        .char_indices()
        .rev()
        .nth(3)
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    format!("{local_head}***@{domain_head}*****{}", &domain[tail_start..])
}

fn contains_dangerous_pattern(value: &str) -> bool {
    let lowered = value.to_lowercase();
    DANGEROUS_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}
