//! # Contact Client 設定
//!
//! 環境変数から API の接続先とフッターのソーシャルリンクを読み込む。

use std::{env, time::Duration};

use strum::IntoEnumIterator;
use thiserror::Error;

/// API のデフォルト接続先
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// 失敗レスポンスのボディを解釈できなかった場合のメッセージ
pub const DEFAULT_NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientConfigError {
    /// 正の整数として解釈できない
    #[error("{key} は 1 以上の整数である必要があります: {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// ソーシャルメディア
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum SocialPlatform {
    LinkedIn,
    Twitter,
    Instagram,
    Facebook,
}

impl SocialPlatform {
    fn env_key(&self) -> &'static str {
        match self {
            Self::LinkedIn => "SYSDAK_SOCIAL_LINKEDIN",
            Self::Twitter => "SYSDAK_SOCIAL_TWITTER",
            Self::Instagram => "SYSDAK_SOCIAL_INSTAGRAM",
            Self::Facebook => "SYSDAK_SOCIAL_FACEBOOK",
        }
    }

    fn enabled_key(&self) -> &'static str {
        match self {
            Self::LinkedIn => "SYSDAK_SOCIAL_LINKEDIN_ENABLED",
            Self::Twitter => "SYSDAK_SOCIAL_TWITTER_ENABLED",
            Self::Instagram => "SYSDAK_SOCIAL_INSTAGRAM_ENABLED",
            Self::Facebook => "SYSDAK_SOCIAL_FACEBOOK_ENABLED",
        }
    }

    fn default_url(&self) -> &'static str {
        match self {
            Self::LinkedIn => "https://linkedin.com/company/sysdak",
            Self::Twitter => "https://twitter.com/sysdak",
            Self::Instagram => "https://instagram.com/sysdak",
            Self::Facebook => "https://facebook.com/sysdak",
        }
    }
}

/// フッターに表示するソーシャルリンク
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url:      String,
    /// `*_ENABLED=false` の場合のみ非表示
    pub enabled:  bool,
}

/// Contact Client の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API のベース URL（末尾の `/` は除去済み）
    pub base_url:              String,
    /// リクエストのタイムアウト（未設定なら HTTP クライアントの既定値）
    pub timeout:               Option<Duration>,
    /// 失敗レスポンスのボディを解釈できなかった場合のメッセージ
    pub network_error_message: String,
    pub social_links:          Vec<SocialLink>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    /// 接続先のみを指定して作成する（その他は既定値）
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url:              base_url.trim_end_matches('/').to_string(),
            timeout:               None,
            network_error_message: DEFAULT_NETWORK_ERROR_MESSAGE.to_string(),
            social_links:          default_social_links(),
        }
    }

    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ClientConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout = get("SYSDAK_API_TIMEOUT_SECS")
            .map(|value| parse_timeout("SYSDAK_API_TIMEOUT_SECS", &value))
            .transpose()?;

        let social_links = SocialPlatform::iter()
            .map(|platform| SocialLink {
                platform,
                url: get(platform.env_key()).unwrap_or_else(|| platform.default_url().to_string()),
                enabled: get(platform.enabled_key()).is_none_or(|value| value.trim() != "false"),
            })
            .collect();

        Ok(Self {
            timeout,
            social_links,
            ..Self::new(get("SYSDAK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()))
        })
    }

    /// 表示するソーシャルリンク
    pub fn enabled_social_links(&self) -> impl Iterator<Item = &SocialLink> {
        self.social_links.iter().filter(|link| link.enabled)
    }
}

/// 1 以上の秒数のみ受け付ける（0 はすべてのリクエストを即座にタイムアウトさせる）
fn parse_timeout(key: &'static str, value: &str) -> Result<Duration, ClientConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ClientConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        }),
    }
}

fn default_social_links() -> Vec<SocialLink> {
    SocialPlatform::iter()
        .map(|platform| SocialLink {
            platform,
            url: platform.default_url().to_string(),
            enabled: true,
        })
        .collect()
}
