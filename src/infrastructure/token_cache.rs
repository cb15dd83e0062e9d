//! 访问令牌缓存 - 基础设施层
//!
//! 保存最近一次观察到的访问令牌，避免每次请求都去查询会话。
//! 写入者是认证事件监听任务（登出流程会立即清空），读取方可以有很多个。

use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::models::{AuthEvent, Session};

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    /// None 表示过期时间未知，一直有效直到被替换
    expires_at: Option<DateTime<Utc>>,
}

/// 访问令牌缓存
///
/// 可克隆的句柄，所有克隆共享同一个值。
/// 已过期的令牌视为缓存未命中，调用方应回退到查询会话（会触发刷新）
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取当前有效的令牌，不会触发任何网络请求
    pub fn get(&self) -> Option<String> {
        self.get_at(Utc::now())
    }

    /// 在 `now` 时刻读取令牌，过期（含刷新窗口）时返回 None
    pub fn get_at(&self, now: DateTime<Utc>) -> Option<String> {
        let cached = match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }?;

        match cached.expires_at {
            Some(expires_at) if Session::expired_at(expires_at, now) => {
                debug!("缓存的令牌已过期");
                None
            }
            _ => Some(cached.value),
        }
    }

    /// 写入令牌（过期时间未知），只应由认证事件监听任务或登出流程调用
    pub fn set(&self, token: Option<String>) {
        self.write(token.map(|value| CachedToken {
            value,
            expires_at: None,
        }));
    }

    /// 写入会话中的令牌及其过期时间
    pub fn set_session(&self, session: &Session) {
        self.write(Some(CachedToken {
            value: session.access_token.clone(),
            expires_at: Some(session.expires_at),
        }));
    }

    fn write(&self, token: Option<CachedToken>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    /// 根据认证事件更新缓存
    pub fn apply(&self, event: &AuthEvent) {
        match event {
            AuthEvent::SignedIn(session) => {
                debug!("🔑 登录事件，更新令牌缓存");
                self.set_session(session);
            }
            AuthEvent::TokenRefreshed(session) => {
                debug!("🔄 令牌刷新，更新令牌缓存");
                self.set_session(session);
            }
            AuthEvent::SignedOut => {
                debug!("🚪 登出事件，清空令牌缓存");
                self.set(None);
            }
        }
    }

    /// 启动认证事件监听任务
    ///
    /// 事件流关闭或 `cancel` 触发时任务结束
    pub fn spawn_listener(
        &self,
        mut events: broadcast::Receiver<AuthEvent>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("令牌监听任务已取消");
                        break;
                    }
                    received = events.recv() => match received {
                        Ok(event) => cache.apply(&event),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("⚠️ 认证事件积压，跳过 {} 条", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            info!("认证事件流已关闭，令牌监听任务结束");
                            break;
                        }
                    },
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthUser, Session};
    use chrono::{Duration, Utc};

    fn session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            user: AuthUser {
                id: "user-1".to_string(),
                email: Some("teacher@example.com".to_string()),
            },
        }
    }

    #[test]
    fn test_apply_events() {
        let cache = TokenCache::new();
        assert_eq!(cache.get(), None);

        cache.apply(&AuthEvent::SignedIn(session("first")));
        assert_eq!(cache.get().as_deref(), Some("first"));

        cache.apply(&AuthEvent::TokenRefreshed(session("second")));
        assert_eq!(cache.get().as_deref(), Some("second"));

        cache.apply(&AuthEvent::SignedOut);
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn test_expired_token_is_a_miss() {
        let cache = TokenCache::new();
        let mut expired = session("stale");
        expired.expires_at = Utc::now() - Duration::minutes(5);

        cache.apply(&AuthEvent::SignedIn(expired));
        assert_eq!(cache.get(), None);

        cache.apply(&AuthEvent::TokenRefreshed(session("fresh")));
        assert_eq!(cache.get().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_token_expires_inside_leeway() {
        let cache = TokenCache::new();
        let current = session("soon");
        cache.set_session(&current);

        let almost = current.expires_at - Duration::seconds(5);
        assert_eq!(cache.get_at(almost), None);
        assert_eq!(
            cache.get_at(current.expires_at - Duration::minutes(1)).as_deref(),
            Some("soon")
        );
    }

    #[test]
    fn test_clones_share_value() {
        let cache = TokenCache::new();
        let reader = cache.clone();
        cache.set(Some("shared".to_string()));
        assert_eq!(reader.get().as_deref(), Some("shared"));
    }

    #[tokio::test]
    async fn test_listener_follows_event_stream() {
        let (tx, rx) = broadcast::channel(16);
        let cache = TokenCache::new();
        let handle = cache.spawn_listener(rx, CancellationToken::new());

        tx.send(AuthEvent::SignedIn(session("from-stream"))).unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(cache.get().as_deref(), Some("from-stream"));
    }

    #[tokio::test]
    async fn test_listener_clears_on_sign_out() {
        let (tx, rx) = broadcast::channel(16);
        let cache = TokenCache::new();
        let handle = cache.spawn_listener(rx, CancellationToken::new());

        tx.send(AuthEvent::SignedIn(session("t"))).unwrap();
        tx.send(AuthEvent::SignedOut).unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(cache.get(), None);
    }

    #[tokio::test]
    async fn test_listener_stops_on_cancel() {
        let (_tx, rx) = broadcast::channel::<AuthEvent>(16);
        let cancel = CancellationToken::new();
        let handle = TokenCache::new().spawn_listener(rx, cancel.clone());

        cancel.cancel();
        handle.await.unwrap();
    }
}
