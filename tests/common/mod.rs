//! 集成测试共用的假认证服务和记录请求的传输层
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{json, Value as JsonValue};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

use homework_portal::clients::{AuthProvider, SignUpResponse};
use homework_portal::error::AuthError;
use homework_portal::infrastructure::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError,
};
use homework_portal::models::{AuthEvent, AuthUser, Session};
use homework_portal::Config;

pub fn test_config() -> Config {
    Config {
        api_base_url: "http://api.test".to_string(),
        supabase_url: "http://auth.test".to_string(),
        supabase_anon_key: "anon-key".to_string(),
        ..Config::default()
    }
}

pub fn session(token: &str) -> Session {
    Session {
        access_token: token.to_string(),
        refresh_token: format!("refresh-{}", token),
        expires_at: Utc::now() + ChronoDuration::hours(1),
        user: AuthUser {
            id: "user-1".to_string(),
            email: Some("teacher@example.com".to_string()),
        },
    }
}

pub fn profile_json(default_route: Option<&str>) -> JsonValue {
    json!({
        "id": "profile-1",
        "first_name": "Ada",
        "surname": "Lovelace",
        "username": "ada",
        "role_name": "teacher",
        "class_level": "Year 7",
        "default_route": default_route,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-02T00:00:00Z"
    })
}

pub fn profile_with_modules_json(default_route: Option<&str>) -> JsonValue {
    json!({
        "profile": profile_json(default_route),
        "modules": [
            {
                "module_code": "scan_homework",
                "module_name": "扫描作业",
                "module_eng_name": "Scan Homework",
                "seq_no": 2,
                "route": "/modules/scan-homework",
                "permissions": ["view", "upload"]
            },
            {
                "module_code": "gradebook",
                "module_name": "成绩册",
                "seq_no": 1,
                "route": "/modules/gradebook",
                "permissions": ["view"]
            }
        ]
    })
}

// ========== 假认证服务 ==========

pub struct FakeAuth {
    session: Mutex<Option<Session>>,
    get_session_calls: AtomicUsize,
    events: broadcast::Sender<AuthEvent>,
    confirm_email: bool,
}

impl FakeAuth {
    fn build(session: Option<Session>, confirm_email: bool) -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            session: Mutex::new(session),
            get_session_calls: AtomicUsize::new(0),
            events,
            confirm_email,
        })
    }

    pub fn signed_in(token: &str) -> Arc<Self> {
        Self::build(Some(session(token)), false)
    }

    pub fn signed_out() -> Arc<Self> {
        Self::build(None, false)
    }

    /// 注册时需要邮箱确认
    pub fn requiring_confirmation() -> Arc<Self> {
        Self::build(None, true)
    }

    pub fn get_session_calls(&self) -> usize {
        self.get_session_calls.load(Ordering::SeqCst)
    }

    fn store(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session;
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        self.get_session_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.session.lock().unwrap().clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        if password == "wrong" {
            return Err(AuthError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_string(),
            });
        }
        let session = session(&format!("token-{}", email));
        self.store(Some(session.clone()));
        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<SignUpResponse, AuthError> {
        let user = AuthUser {
            id: "new-user".to_string(),
            email: Some(email.to_string()),
        };
        if self.confirm_email {
            return Ok(SignUpResponse { user, session: None });
        }

        let mut session = session(&format!("token-{}", email));
        session.user = user.clone();
        self.store(Some(session.clone()));
        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
        Ok(SignUpResponse {
            user,
            session: Some(session),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.store(None);
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

// ========== 记录请求的传输层 ==========

struct Route {
    method: HttpMethod,
    path: String,
    status: u16,
    body: String,
}

/// 按 (方法, 路径后缀) 返回预设响应，并记录所有请求
#[derive(Default)]
pub struct RecordingTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: HttpMethod, path: &str, status: u16, body: JsonValue) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = match self
            .routes
            .iter()
            .find(|r| r.method == request.method && request.url.ends_with(&r.path))
        {
            Some(route) => HttpResponse {
                status: route.status,
                status_text: status_text(route.status).to_string(),
                body: route.body.clone(),
            },
            None => HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: json!({ "detail": "Not Found" }).to_string(),
            },
        };
        Ok(response)
    }
}
