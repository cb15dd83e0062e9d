/// 资料接口客户端
///
/// 封装 `/profile/me` 系列接口和注册后的资料创建
use std::sync::Arc;
use tracing::debug;

use crate::clients::api_client::ApiClient;
use crate::error::ApiError;
use crate::infrastructure::HttpMethod;
use crate::models::{Profile, ProfileUpdate, ProfileWithModules, SignupRequest, TeacherProfile};

/// 资料接口客户端
#[derive(Clone)]
pub struct ProfileClient {
    api: Arc<ApiClient>,
}

impl ProfileClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// 获取当前用户资料
    pub async fn get_my_profile(&self) -> Result<Profile, ApiError> {
        self.api
            .authenticated_request(HttpMethod::Get, "/profile/me", None)
            .await
    }

    /// 一次请求同时获取资料和可访问模块
    pub async fn get_my_profile_with_modules(&self) -> Result<ProfileWithModules, ApiError> {
        let result: ProfileWithModules = self
            .api
            .authenticated_request(HttpMethod::Get, "/profile/me?include=modules", None)
            .await?;
        debug!("获取到 {} 个模块", result.modules.len());
        Ok(result)
    }

    /// 更新当前用户资料
    pub async fn update_my_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let body = serde_json::to_value(update)?;
        self.api
            .authenticated_request(HttpMethod::Put, "/profile/me", Some(body))
            .await
    }

    /// 获取教师资料（含班级列表）
    pub async fn get_teacher_profile(&self) -> Result<TeacherProfile, ApiError> {
        self.api
            .authenticated_request(HttpMethod::Get, "/profile/me/teacher", None)
            .await
    }

    /// 认证服务注册成功后创建资料
    pub async fn create_profile(&self, request: &SignupRequest) -> Result<Profile, ApiError> {
        let body = serde_json::to_value(request)?;
        self.api
            .authenticated_request(HttpMethod::Post, "/auth/signup", Some(body))
            .await
    }
}
