use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 后端 API 配置 ---
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 认证服务配置 ---
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// 是否显示第三方登录按钮
    pub show_social_login: bool,
    /// 会话级资料缓存有效期（秒）
    pub profile_cache_ttl_secs: u64,
    // --- 上传配置 ---
    pub thumbnail_max_width: u32,
    pub max_upload_bytes: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            request_timeout_secs: 30,
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            show_social_login: false,
            profile_cache_ttl_secs: 300,
            thumbnail_max_width: 400,
            max_upload_bytes: 10 * 1024 * 1024,
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件结构，字段名与环境变量一致（小写）
#[derive(Debug, Deserialize)]
struct FileConfig {
    api_base_url: String,
    supabase_url: String,
    supabase_anon_key: String,
    request_timeout_secs: Option<u64>,
    show_social_login: Option<bool>,
    profile_cache_ttl_secs: Option<u64>,
    thumbnail_max_width: Option<u32>,
    max_upload_bytes: Option<u64>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 从环境变量加载配置（会先读取 `.env`）
    ///
    /// 缺少必填项时返回错误，调用方应当终止启动
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let default = Self::default();
        Ok(Self {
            api_base_url: required("API_BASE_URL")?,
            request_timeout_secs: parsed("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(default.request_timeout_secs),
            supabase_url: required("SUPABASE_URL")?,
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            show_social_login: parsed("SHOW_SOCIAL_LOGIN", "bool")?
                .unwrap_or(default.show_social_login),
            profile_cache_ttl_secs: parsed("PROFILE_CACHE_TTL_SECS", "u64")?
                .unwrap_or(default.profile_cache_ttl_secs),
            thumbnail_max_width: parsed("THUMBNAIL_MAX_WIDTH", "u32")?
                .unwrap_or(default.thumbnail_max_width),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", "u64")?
                .unwrap_or(default.max_upload_bytes),
            verbose_logging: parsed("VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
        })
    }

    /// 从 TOML 文件加载配置
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path_str.clone(),
                source,
            })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path_str,
            source,
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        let default = Self::default();
        Ok(Self {
            api_base_url: file.api_base_url,
            request_timeout_secs: file
                .request_timeout_secs
                .unwrap_or(default.request_timeout_secs),
            supabase_url: file.supabase_url,
            supabase_anon_key: file.supabase_anon_key,
            show_social_login: file.show_social_login.unwrap_or(default.show_social_login),
            profile_cache_ttl_secs: file
                .profile_cache_ttl_secs
                .unwrap_or(default.profile_cache_ttl_secs),
            thumbnail_max_width: file
                .thumbnail_max_width
                .unwrap_or(default.thumbnail_max_width),
            max_upload_bytes: file.max_upload_bytes.unwrap_or(default.max_upload_bytes),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }
}

fn required(var_name: &str) -> Result<String, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::EnvVarNotFound {
            var_name: var_name.to_string(),
        }),
    }
}

fn parsed<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
