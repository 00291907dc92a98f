//! # Contact Service 設定
//!
//! 環境変数から Contact Service サーバーの設定を読み込む。
//! 起動時に 1 回だけ読み込み、以降は値として受け渡す。

use std::{env, str::FromStr};

use sysdak_domain::notification::MailTransportConfig;
use thiserror::Error;

use crate::rate_limit::{InvalidRateLimit, RateLimit};

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 数値として解釈できない
    #[error("{key} は有効な数値である必要があります: {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    /// 未知の送信バックエンド
    #[error("NOTIFICATION_BACKEND は smtp または noop である必要があります: {0:?}")]
    UnknownBackend(String),

    /// レート制限の表記が不正
    #[error("{key}: {source}")]
    InvalidRateLimit {
        key:    &'static str,
        source: InvalidRateLimit,
    },
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationBackend {
    /// SMTP サーバー経由で送信
    #[default]
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// Contact Service サーバーの設定
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// バインドアドレス
    pub host:            String,
    /// ポート番号
    pub port:            u16,
    /// CORS で許可するオリジン
    pub allowed_origins: Vec<String>,
    /// 通知設定
    pub notification:    NotificationConfig,
    /// 送信元 IP ごとのレート制限
    pub rate_limit:      RateLimitConfig,
}

/// レート制限の設定
///
/// `RATE_LIMIT_ENABLED=false` で無効化できる（負荷試験用）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled:    bool,
    /// `POST /api/contact`
    pub contact:    Vec<RateLimit>,
    /// `POST /api/test-email`
    pub test_email: Vec<RateLimit>,
    /// 上記以外のルート
    pub default:    Vec<RateLimit>,
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `smtp`: SMTP サーバー経由で送信（デフォルト）
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend: NotificationBackend,
    pub mail:    MailTransportConfig,
}

impl NotificationConfig {
    /// 問い合わせの受付に必要な送信設定が揃っているか
    ///
    /// `noop` の場合は認証情報がなくても受け付ける。
    pub fn is_email_configured(&self) -> bool {
        match self.backend {
            NotificationBackend::Smtp => self.mail.is_complete(),
            NotificationBackend::Noop => true,
        }
    }
}

impl ServiceConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 空文字列は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let backend_raw = get_or("NOTIFICATION_BACKEND", "smtp");
        let backend = NotificationBackend::from_str(backend_raw.trim())
            .map_err(|_| ConfigError::UnknownBackend(backend_raw.clone()))?;

        Ok(Self {
            host: get_or("CONTACT_HOST", "127.0.0.1"),
            port: parse_number("CONTACT_PORT", &get_or("CONTACT_PORT", "5000"))?,
            allowed_origins: split_list(&get_or("ALLOWED_ORIGINS", "http://localhost:5173")),
            notification: NotificationConfig {
                backend,
                mail: MailTransportConfig {
                    host:         get_or("EMAIL_HOST", "smtp.gmail.com"),
                    port:         parse_number("EMAIL_PORT", &get_or("EMAIL_PORT", "587"))?,
                    secure:       get("EMAIL_SECURE")
                        .is_some_and(|value| value.trim().eq_ignore_ascii_case("true")),
                    username:     get_or("EMAIL_USERNAME", ""),
                    password:     get_or("EMAIL_PASSWORD", ""),
                    from_address: get_or("EMAIL_FROM", ""),
                    to_addresses: split_list(&get_or("EMAIL_TO", "")),
                },
            },
            rate_limit: RateLimitConfig {
                enabled:    !get("RATE_LIMIT_ENABLED")
                    .is_some_and(|value| value.trim().eq_ignore_ascii_case("false")),
                contact:    parse_limits(
                    "RATE_LIMIT_CONTACT",
                    &get_or("RATE_LIMIT_CONTACT", "5/hour"),
                )?,
                test_email: parse_limits(
                    "RATE_LIMIT_TEST_EMAIL",
                    &get_or("RATE_LIMIT_TEST_EMAIL", "3/hour"),
                )?,
                default:    parse_limits(
                    "RATE_LIMIT_DEFAULT",
                    &get_or("RATE_LIMIT_DEFAULT", "200/day,50/hour"),
                )?,
            },
        })
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })
}

fn parse_limits(key: &'static str, value: &str) -> Result<Vec<RateLimit>, ConfigError> {
    RateLimit::parse_list(value).map_err(|source| ConfigError::InvalidRateLimit { key, source })
}

/// カンマ区切りのリストを分割する（前後の空白と空要素は除く）
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
