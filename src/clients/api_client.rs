/// 后端 API 客户端
///
/// 封装所有需要认证的后端调用：解析令牌、附加请求头、统一错误格式
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::auth_client::AuthProvider;
use crate::config::Config;
use crate::error::ApiError;
use crate::infrastructure::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TokenCache};

/// 后端 API 客户端
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    tokens: TokenCache,
    auth: Arc<dyn AuthProvider>,
}

impl ApiClient {
    /// 创建新的 API 客户端
    pub fn new(
        config: &Config,
        transport: Arc<dyn HttpTransport>,
        tokens: TokenCache,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            transport,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
            auth,
        }
    }

    /// 解析访问令牌
    ///
    /// 顺序：先读缓存，缓存为空时查询一次会话
    async fn resolve_token(&self) -> Option<String> {
        if let Some(token) = self.tokens.get() {
            return Some(token);
        }

        debug!("令牌缓存为空，查询会话");
        match self.auth.get_session().await {
            Ok(session) => session.map(|s| s.access_token),
            Err(e) => {
                warn!("⚠️ 查询会话失败: {}", e);
                None
            }
        }
    }

    /// 发送一次需要认证的请求
    ///
    /// # 参数
    /// - `method`: HTTP 方法
    /// - `endpoint`: 以 `/` 开头的路径（可带查询串）
    /// - `body`: JSON 请求体（可选）
    ///
    /// # 返回
    /// 反序列化后的响应；拿不到令牌时直接返回 `ApiError::Unauthenticated`，不会发出请求
    pub async fn authenticated_request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<JsonValue>,
    ) -> Result<T, ApiError> {
        let token = self.resolve_token().await.ok_or(ApiError::Unauthenticated)?;

        let mut request = HttpRequest::new(method, format!("{}{}", self.base_url, endpoint))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", token));
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!("{} {}", method.as_str(), endpoint);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !response.is_success() {
            let err = error_from_response(&response);
            warn!("⚠️ {} {} 失败: {}", method.as_str(), endpoint, err);
            return Err(err);
        }

        parse_body(&response)
    }
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    Ok(serde_json::from_str(body)?)
}

/// 将非 2xx 响应转换为错误
///
/// 响应体是 `{detail}` 时使用 detail；无法解析时使用状态描述
pub(crate) fn error_from_response(response: &HttpResponse) -> ApiError {
    let detail = match response.json::<JsonValue>() {
        Ok(value) => match value.get("detail") {
            Some(JsonValue::String(detail)) if !detail.is_empty() => detail.clone(),
            Some(JsonValue::String(_)) | Some(JsonValue::Null) | None => {
                "API request failed".to_string()
            }
            Some(other) => other.to_string(),
        },
        Err(_) => response.status_text.clone(),
    };

    ApiError::Status {
        status: response.status,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, status_text: &str, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_error_uses_detail() {
        let err = error_from_response(&response(403, "Forbidden", r#"{"detail":"Not a teacher"}"#));
        match err {
            ApiError::Status { status, detail } => {
                assert_eq!(status, 403);
                assert_eq!(detail, "Not a teacher");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_falls_back_to_status_text() {
        let err = error_from_response(&response(500, "Internal Server Error", "oops"));
        match err {
            ApiError::Status { detail, .. } => assert_eq!(detail, "Internal Server Error"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_without_detail_field() {
        let err = error_from_response(&response(400, "Bad Request", r#"{"message":"x"}"#));
        match err {
            ApiError::Status { detail, .. } => assert_eq!(detail, "API request failed"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_detail_uses_generic_message() {
        let err = error_from_response(&response(400, "Bad Request", r#"{"detail":""}"#));
        match err {
            ApiError::Status { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "API request failed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_structured_detail_is_serialized() {
        let err = error_from_response(&response(
            422,
            "Unprocessable Entity",
            r#"{"detail":[{"msg":"field required"}]}"#,
        ));
        match err {
            ApiError::Status { status, detail } => {
                assert_eq!(status, 422);
                assert!(detail.contains("field required"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_success_body_parses_as_null() {
        let value: Option<JsonValue> = parse_body(&response(204, "No Content", "")).unwrap();
        assert!(value.is_none());
    }
}
