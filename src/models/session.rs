//! 认证会话模型
//!
//! 会话由认证服务签发并持有，本地只读取其中的访问令牌

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 过期前预留的刷新窗口
const EXPIRY_LEEWAY_SECS: i64 = 10;

/// 已登录用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// 认证会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl Session {
    /// 会话在 `now` 时是否已过期（含刷新窗口）
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        Self::expired_at(self.expires_at, now)
    }

    /// 过期时间为 `expires_at` 的令牌在 `now` 时是否已过期（含刷新窗口）
    pub fn expired_at(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_LEEWAY_SECS) >= expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// 认证状态变化事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}
