use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::module::Module;

/// 用户资料（由后端返回，本地不直接修改）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub first_name: String,
    pub surname: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub username: String,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub class_level: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// 登录后默认进入的页面
    #[serde(default)]
    pub default_route: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// 显示名称：优先 full_name，否则拼接姓名
    pub fn display_name(&self) -> String {
        match &self.full_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("{} {}", self.first_name, self.surname),
        }
    }
}

/// `GET /profile/me?include=modules` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileWithModules {
    pub profile: Profile,
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// `PUT /profile/me` 的请求体，未设置的字段不会发送
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// 注册角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Student,
    Teacher,
    PrivateTutor,
}

/// `POST /auth/signup`：认证服务注册成功后创建资料
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupRequest {
    pub user_id: String,
    pub first_name: String,
    pub surname: String,
    pub username: String,
    pub role_name: RoleName,
    pub class_level: Option<String>,
    pub organization_id: Option<String>,
}

/// 教师负责的班级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub class_level: Option<String>,
}

/// `GET /profile/me/teacher` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub id: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
