//! 认证服务客户端
//!
//! 封装与 Supabase GoTrue 认证接口的交互，并在本地保存当前会话

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AuthError;
use crate::infrastructure::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::models::{AuthEvent, AuthUser, Session};

/// 认证事件通道容量
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// 注册结果：需要邮箱确认时没有会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpResponse {
    pub user: AuthUser,
    pub session: Option<Session>,
}

/// 认证服务能力
///
/// 职责：
/// - 一次性查询当前会话
/// - 登录 / 注册 / 登出
/// - 广播认证状态变化
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// 获取当前会话，过期时会尝试刷新；没有会话返回 None
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<Session, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// 订阅认证状态变化（登录、登出、令牌刷新）
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// GoTrue 令牌接口的响应
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(|| expiry_from_now(self.expires_in));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

fn expiry_from_now(expires_in: Option<i64>) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(expires_in.unwrap_or(3600))
}

/// Supabase 认证客户端
pub struct SupabaseAuthClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    anon_key: String,
    session: Mutex<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl SupabaseAuthClient {
    /// 创建新的认证客户端
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            transport,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
            session: Mutex::new(None),
            events,
        }
    }

    fn stored_session(&self) -> Option<Session> {
        match self.session.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store_session(&self, session: Option<Session>) {
        match self.session.lock() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    fn emit(&self, event: AuthEvent) {
        // 没有订阅者时 send 会返回错误，忽略即可
        let _ = self.events.send(event);
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}/auth/v1/{}", self.base_url, path))
            .header("apikey", self.anon_key.as_str())
            .header("Content-Type", "application/json")
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthError> {
        let endpoint = request.url.clone();
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| AuthError::RequestFailed { endpoint, source })?;

        if !response.is_success() {
            return Err(AuthError::Rejected {
                status: response.status,
                message: extract_error_message(&response),
            });
        }
        Ok(response)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let request = self
            .request(HttpMethod::Post, "token?grant_type=refresh_token")
            .json(json!({ "refresh_token": refresh_token }));
        let response = self.send(request).await?;
        let token: TokenResponse = response
            .json()
            .map_err(|e| AuthError::BadResponse { source: Box::new(e) })?;
        Ok(token.into_session())
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthClient {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.stored_session() else {
            return Ok(None);
        };

        if !session.is_expired() {
            return Ok(Some(session));
        }

        debug!("会话已过期，尝试刷新令牌");
        match self.refresh(&session.refresh_token).await {
            Ok(refreshed) => {
                self.store_session(Some(refreshed.clone()));
                self.emit(AuthEvent::TokenRefreshed(refreshed.clone()));
                Ok(Some(refreshed))
            }
            Err(e) => {
                warn!("⚠️ 刷新令牌失败，视为已登出: {}", e);
                self.store_session(None);
                self.emit(AuthEvent::SignedOut);
                Ok(None)
            }
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let request = self
            .request(HttpMethod::Post, "token?grant_type=password")
            .json(json!({ "email": email, "password": password }));
        let response = self.send(request).await?;
        let token: TokenResponse = response
            .json()
            .map_err(|e| AuthError::BadResponse { source: Box::new(e) })?;
        let session = token.into_session();

        info!("✓ 登录成功: {}", email);
        self.store_session(Some(session.clone()));
        self.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, AuthError> {
        let request = self
            .request(HttpMethod::Post, "signup")
            .json(json!({ "email": email, "password": password }));
        let response = self.send(request).await?;
        let value: JsonValue = response
            .json()
            .map_err(|e| AuthError::BadResponse { source: Box::new(e) })?;
        let parsed = parse_sign_up(value)?;

        if let Some(session) = &parsed.session {
            info!("✓ 注册成功并已登录: {}", email);
            self.store_session(Some(session.clone()));
            self.emit(AuthEvent::SignedIn(session.clone()));
        } else {
            info!("✓ 注册成功，等待邮箱确认: {}", email);
        }
        Ok(parsed)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.stored_session();
        self.store_session(None);
        self.emit(AuthEvent::SignedOut);

        // 本地登出总是成功，远端失败只记录日志
        if let Some(session) = session {
            let request = self
                .request(HttpMethod::Post, "logout")
                .header("Authorization", format!("Bearer {}", session.access_token));
            if let Err(e) = self.send(request).await {
                warn!("⚠️ 远端登出失败: {}", e);
            }
        }
        info!("🚪 已登出");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

/// 注册接口在开启邮箱确认时只返回用户，否则返回完整令牌
fn parse_sign_up(value: JsonValue) -> Result<SignUpResponse, AuthError> {
    if value.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(value)
            .map_err(|e| AuthError::BadResponse { source: Box::new(e) })?;
        let session = token.into_session();
        return Ok(SignUpResponse {
            user: session.user.clone(),
            session: Some(session),
        });
    }

    let user_value = value.get("user").cloned().unwrap_or(value);
    let user: AuthUser = serde_json::from_value(user_value)
        .map_err(|e| AuthError::BadResponse { source: Box::new(e) })?;
    Ok(SignUpResponse {
        user,
        session: None,
    })
}

/// 提取 GoTrue 错误描述，字段名在不同版本间不一致
fn extract_error_message(response: &HttpResponse) -> String {
    let parsed: Option<JsonValue> = response.json().ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| response.status_text.clone())
}
