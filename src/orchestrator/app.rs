//! 应用装配 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建 HTTP 传输、认证客户端、令牌缓存和 API 客户端
//! 2. **后台任务**：启动令牌监听任务，关闭时统一取消
//! 3. **流程入口**：为每次挂载创建启动流程、上传流程和登录流程
//! 4. **命令执行**：菜单、扫描上传、资料查询
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有传输层和后台任务的模块
//! - **向下委托**：具体逻辑交给 workflow 层

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::clients::{ApiClient, AuthProvider, ProfileClient, SupabaseAuthClient};
use crate::config::Config;
use crate::infrastructure::{HttpTransport, ReqwestTransport, TokenCache};
use crate::models::{TeacherProfile, UploadFile};
use crate::services::{FileValidator, ProfileCache, ThumbnailService};
use crate::utils::logging;
use crate::workflow::{
    module_router, BootstrapOutcome, BootstrapSequencer, SignInFlow, SignInForm, UploadWorkflow,
};

/// 应用主结构
pub struct App {
    config: Config,
    auth: Arc<dyn AuthProvider>,
    tokens: TokenCache,
    profiles: ProfileClient,
    profile_cache: ProfileCache,
    shutdown: CancellationToken,
    listener: JoinHandle<()>,
}

impl App {
    /// 初始化应用（真实网络）
    pub async fn initialize(config: Config) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs))
            .context("创建 HTTP 客户端失败")?;
        let transport: Arc<dyn HttpTransport> = Arc::new(transport);
        let auth: Arc<dyn AuthProvider> =
            Arc::new(SupabaseAuthClient::new(&config, transport.clone()));
        Ok(Self::with_parts(config, transport, auth))
    }

    /// 使用给定的传输层和认证服务装配应用
    pub fn with_parts(
        config: Config,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let tokens = TokenCache::new();
        let listener = tokens.spawn_listener(auth.subscribe(), shutdown.child_token());

        let api = Arc::new(ApiClient::new(&config, transport, tokens.clone(), auth.clone()));
        let profile_cache = ProfileCache::new(Duration::from_secs(config.profile_cache_ttl_secs));

        Self {
            profiles: ProfileClient::new(api),
            config,
            auth,
            tokens,
            profile_cache,
            shutdown,
            listener,
        }
    }

    pub fn profiles(&self) -> &ProfileClient {
        &self.profiles
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// 应用级取消令牌，每次挂载应使用它的子令牌
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// 为一次挂载创建启动流程
    pub fn bootstrap(&self) -> BootstrapSequencer {
        BootstrapSequencer::new(
            self.auth.clone(),
            self.profiles.clone(),
            self.profile_cache.clone(),
        )
    }

    pub fn sign_in_flow(&self) -> SignInFlow {
        SignInFlow::new(
            self.auth.clone(),
            self.profiles.clone(),
            self.profile_cache.clone(),
            self.tokens.clone(),
            self.config.show_social_login,
        )
    }

    pub fn upload_workflow(&self) -> UploadWorkflow {
        UploadWorkflow::new(
            FileValidator::new(self.config.max_upload_bytes),
            ThumbnailService::new(self.config.thumbnail_max_width),
        )
    }

    /// 有凭据时先登录
    pub async fn sign_in_if_needed(&self, credentials: Option<(String, String)>) -> Result<()> {
        let Some((email, password)) = credentials else {
            return Ok(());
        };
        let form = SignInForm { email, password };
        self.sign_in_flow().sign_in(&form).await?;
        Ok(())
    }

    /// 挂载应用外壳并输出菜单
    pub async fn show_menu(&self, route: &str) -> Result<BootstrapOutcome> {
        logging::log_startup(&self.config.api_base_url, route);

        let mount = self.shutdown.child_token();
        let outcome = self.bootstrap().run(route, &mount).await;
        match &outcome {
            BootstrapOutcome::Ready(state) => {
                info!("👤 当前用户: {}", state.profile.display_name());
                logging::log_menu(&state.menu);
                if let Some(target) = &state.redirect_to {
                    match module_router::resolve_route(target) {
                        Ok(view) => info!("➡️ 跳转到默认页面: {} ({})", view.title(), target),
                        Err(e) => warn!("⚠️ 默认页面无法打开: {}", e),
                    }
                }
            }
            BootstrapOutcome::SignIn { redirect: true } => {
                warn!("⚠️ 未登录，请使用 --email / --password 登录");
            }
            BootstrapOutcome::SignIn { redirect: false } => info!("停留在登录页"),
            BootstrapOutcome::Cancelled => warn!("⚠️ 启动流程已取消"),
        }
        Ok(outcome)
    }

    /// 读取本地图片并走一遍上传流程
    pub async fn scan(&self, paths: &[PathBuf]) -> Result<UploadWorkflow> {
        let mut workflow = self.upload_workflow();
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match UploadFile::from_path(path).await {
                Ok(file) => files.push(file),
                Err(e) => {
                    error!("❌ 读取文件失败 {}: {}", path.display(), e);
                    workflow.record_error(format!("{} could not be read.", path.display()));
                }
            }
        }

        let cancel = self.shutdown.child_token();
        workflow.add_files(files, None, &cancel).await?;

        logging::log_upload_summary(workflow.groups(), workflow.errors());
        Ok(workflow)
    }

    pub async fn whoami(&self) -> Result<()> {
        let profile = self.profiles.get_my_profile().await?;
        info!("👤 {} (@{})", profile.display_name(), profile.username);
        if let Some(role) = &profile.role_name {
            info!("   角色: {}", role);
        }
        if let Some(level) = &profile.class_level {
            info!("   年级: {}", level);
        }
        Ok(())
    }

    pub async fn teacher(&self) -> Result<TeacherProfile> {
        let teacher = self.profiles.get_teacher_profile().await?;
        info!("🏫 负责 {} 个班级", teacher.classes.len());
        for class in &teacher.classes {
            info!(
                "   - {} ({})",
                class.name,
                class.subject.as_deref().unwrap_or("未设置科目")
            );
        }
        Ok(teacher)
    }

    /// 取消所有后台任务并等待结束
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.listener.await {
            error!("令牌监听任务异常结束: {}", e);
        }
    }
}
