use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 认证服务错误
    #[error("认证错误: {0}")]
    Auth(#[from] AuthError),
    /// 后端 API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 上传文件错误
    #[error("上传错误: {0}")]
    Upload(#[from] UploadError),
    /// 工作流状态错误
    #[error("流程错误: {0}")]
    Workflow(#[from] WorkflowError),
    /// 导航错误
    #[error("导航错误: {0}")]
    Navigation(#[from] NavigationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 认证服务错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 认证服务拒绝了请求（密码错误、邮箱已注册等）
    #[error("认证服务拒绝请求 (status={status}): {message}")]
    Rejected { status: u16, message: String },
    /// 网络请求失败
    #[error("认证请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 响应无法解析
    #[error("认证响应解析失败: {source}")]
    BadResponse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 表单校验失败
    #[error("{0}")]
    InvalidForm(String),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 没有可用的访问令牌，请求未发送
    #[error("No authentication token available")]
    Unauthenticated,
    /// 后端返回非 2xx 响应
    #[error("API返回错误响应 (status={status}): {detail}")]
    Status { status: u16, detail: String },
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApiError {
    /// 对应的 HTTP 状态码（网络层错误没有状态码）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthenticated => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 是否是认证失败（调用方据此决定是否跳转登录页）
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// 上传文件错误（按文件报告，不中断批次）
#[derive(Debug, Error)]
pub enum UploadError {
    /// 不支持的图片格式
    #[error("{name} is not a supported image format. Please use JPG, PNG, HEIC, or WebP.")]
    UnsupportedType { name: String },
    /// 文件超过大小限制
    #[error("{name} exceeds {limit_mb}MB limit.")]
    TooLarge {
        name: String,
        size: u64,
        limit_mb: u64,
    },
    /// 缩略图生成失败
    #[error("Failed to process images. Please try again.")]
    Processing {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 操作被取消，结果已丢弃
    #[error("上传处理已取消")]
    Cancelled,
}

/// 工作流状态错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// 作业组不存在
    #[error("作业组不存在: {group_id}")]
    GroupNotFound { group_id: String },
    /// 页面不存在
    #[error("作业页不存在: {sheet_id} (作业组 {group_id})")]
    SheetNotFound { group_id: String, sheet_id: String },
    /// 不能删除最后一页
    #[error("Cannot delete the last sheet. Delete the entire homework instead.")]
    LastSheet { group_id: String },
    /// 新顺序不是当前页面的一个排列
    #[error("新的页面顺序无效 (作业组 {group_id})")]
    InvalidOrder { group_id: String },
    /// 当前阶段不允许该操作
    #[error("阶段 {stage} 不允许操作 {action}")]
    InvalidTransition {
        stage: &'static str,
        action: &'static str,
    },
}

/// 导航错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// 模块不存在或尚未实现
    #[error("The module \"{code}\" does not exist or is not yet implemented.")]
    ModuleNotFound { code: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::JsonParseFailed {
            source: Box::new(err),
        }
    }
}

// ========== 便捷构造函数 ==========

impl UploadError {
    /// 创建缩略图处理错误
    pub fn processing(
        name: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        UploadError::Processing {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_maps_to_401() {
        let err = ApiError::Unauthenticated;
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_status_error_keeps_detail() {
        let err = ApiError::Status {
            status: 404,
            detail: "Profile not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthorized());
        assert!(err.to_string().contains("Profile not found"));
    }

    #[test]
    fn test_upload_messages_match_banner_text() {
        let err = UploadError::TooLarge {
            name: "page.jpg".to_string(),
            size: 11 * 1024 * 1024,
            limit_mb: 10,
        };
        assert_eq!(err.to_string(), "page.jpg exceeds 10MB limit.");
    }
}
