//! # レート制限
//!
//! 送信元 IP ごとのスライディングウィンドウで、メール送信を伴うエンドポイントへの
//! 連続リクエストを制限する。
//!
//! | ルート | 既定の上限 | 環境変数 |
//! |---|---|---|
//! | `POST /api/contact` | `5/hour` | `RATE_LIMIT_CONTACT` |
//! | `POST /api/test-email` | `3/hour` | `RATE_LIMIT_TEST_EMAIL` |
//! | `GET /api/health` | `200/day,50/hour` | `RATE_LIMIT_DEFAULT` |
//!
//! 記録はプロセス内メモリにのみ保持する。複数インスタンス間では共有しない。

use std::{
    collections::{HashMap, VecDeque},
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use parking_lot::Mutex;
use thiserror::Error;

use crate::error::ContactServiceError;

/// この数を超える IP を記録したら、期限切れの記録をまとめて削除する
const SWEEP_THRESHOLD: usize = 4096;

/// 不正なレート制限の表記
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("レート制限は `<回数>/<second|minute|hour|day>` 形式で指定する必要があります: {0:?}")]
pub struct InvalidRateLimit(pub String);

/// 「ウィンドウ内に `max` 回まで」の制限 1 件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max:    usize,
    pub window: Duration,
}

impl RateLimit {
    pub const fn per_hour(max: usize) -> Self {
        Self {
            max,
            window: Duration::from_secs(60 * 60),
        }
    }

    pub const fn per_day(max: usize) -> Self {
        Self {
            max,
            window: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// カンマ区切りの複数指定（`200/day,50/hour`）を解釈する
    pub fn parse_list(value: &str) -> Result<Vec<Self>, InvalidRateLimit> {
        let limits = value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if limits.is_empty() {
            return Err(InvalidRateLimit(value.to_string()));
        }
        Ok(limits)
    }
}

impl FromStr for RateLimit {
    type Err = InvalidRateLimit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidRateLimit(s.to_string());

        let (count, unit) = s.split_once('/').ok_or_else(invalid)?;
        let max: usize = count.trim().parse().map_err(|_| invalid())?;
        if max == 0 {
            return Err(invalid());
        }

        let seconds = match unit.trim() {
            "second" => 1,
            "minute" => 60,
            "hour" => 60 * 60,
            "day" => 24 * 60 * 60,
            _ => return Err(invalid()),
        };

        Ok(Self {
            max,
            window: Duration::from_secs(seconds),
        })
    }
}

/// 送信元 IP ごとのリクエスト記録
///
/// 設定された制限をすべて満たしたリクエストだけが記録される。
/// 拒否されたリクエストはウィンドウを延長しない。
#[derive(Debug)]
pub struct RateLimiter {
    name:   &'static str,
    limits: Vec<RateLimit>,
    hits:   Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(name: &'static str, limits: Vec<RateLimit>) -> Self {
        Self {
            name,
            limits,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// リクエストを 1 件記録する
    ///
    /// 上限に達している場合は、次に受け付けられるまでの待ち時間を返す。
    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), Duration> {
        let longest = self
            .limits
            .iter()
            .map(|limit| limit.window)
            .max()
            .unwrap_or_default();

        let mut hits = self.hits.lock();
        if hits.len() > SWEEP_THRESHOLD {
            hits.retain(|_, entries| {
                entries
                    .back()
                    .is_some_and(|last| now.duration_since(*last) < longest)
            });
        }

        let entries = hits.entry(ip).or_default();
        while entries
            .front()
            .is_some_and(|first| now.duration_since(*first) >= longest)
        {
            entries.pop_front();
        }

        let retry_after = self
            .limits
            .iter()
            .filter_map(|limit| {
                let in_window: Vec<&Instant> = entries
                    .iter()
                    .filter(|at| now.duration_since(**at) < limit.window)
                    .collect();
                if in_window.len() < limit.max {
                    return None;
                }
                // この記録が期限切れになれば 1 件分の空きができる
                let blocking = in_window[in_window.len() - limit.max];
                Some(limit.window.saturating_sub(now.duration_since(*blocking)))
            })
            .max();

        match retry_after {
            Some(wait) => Err(wait),
            None => {
                entries.push_back(now);
                Ok(())
            }
        }
    }
}

/// ルート単位で [`RateLimiter`] を適用するミドルウェア
///
/// 送信元は `ConnectInfo<SocketAddr>` から取得する。
/// 取得できない場合（テストなど）はすべて同じ送信元として数える。
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, ContactServiceError> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| {
            addr.ip()
        });

    if let Err(retry_after) = limiter.check(ip) {
        tracing::warn!(
            rate_limit.name = limiter.name,
            client.ip = %ip,
            retry_after_secs = retry_after.as_secs(),
            "レート制限を超えたリクエストを拒否しました"
        );
        return Err(ContactServiceError::RateLimited { retry_after });
    }

    Ok(next.run(request).await)
}
