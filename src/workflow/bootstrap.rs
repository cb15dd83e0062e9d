//! 启动流程 - 流程层
//!
//! 应用外壳挂载时执行一次：
//! 1. 会话级缓存命中 → 直接使用
//! 2. 查询会话，没有会话 → 登录页
//! 3. 一次请求获取资料 + 模块
//! 4. 当前在根路由且资料声明了默认页面 → 跳转
//! 5. 任何错误 → 清空状态并跳转登录页

use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clients::{AuthProvider, ProfileClient};
use crate::error::AppError;
use crate::models::{Module, Profile, ProfileWithModules};
use crate::services::{build_menu, MenuItem, ProfileCache};
use crate::workflow::until_cancelled;

pub const ROOT_ROUTE: &str = "/";
pub const SIGN_IN_ROUTE: &str = "/signin";

/// 启动完成后的外壳状态
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapState {
    pub profile: Profile,
    pub modules: Vec<Module>,
    pub menu: Vec<MenuItem>,
    /// 需要立即跳转的页面
    pub redirect_to: Option<String>,
    /// 是否来自会话级缓存
    pub from_cache: bool,
}

/// 启动结果
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapOutcome {
    Ready(BootstrapState),
    /// 需要登录；已经在登录页时 `redirect` 为 false
    SignIn { redirect: bool },
    /// 挂载作用域已结束，结果被丢弃
    Cancelled,
}

enum FetchResult {
    Fetched(ProfileWithModules),
    NoSession,
    Cancelled,
}

/// 启动流程
///
/// 每次挂载创建一个实例；同一实例上重复调用 `run` 只返回第一次的结果
pub struct BootstrapSequencer {
    auth: Arc<dyn AuthProvider>,
    profiles: ProfileClient,
    cache: ProfileCache,
    outcome: OnceCell<BootstrapOutcome>,
}

impl BootstrapSequencer {
    pub fn new(auth: Arc<dyn AuthProvider>, profiles: ProfileClient, cache: ProfileCache) -> Self {
        Self {
            auth,
            profiles,
            cache,
            outcome: OnceCell::new(),
        }
    }

    /// 执行启动流程（每个实例最多执行一次）
    pub async fn run(&self, current_route: &str, cancel: &CancellationToken) -> BootstrapOutcome {
        self.outcome
            .get_or_init(|| self.sequence(current_route, cancel))
            .await
            .clone()
    }

    /// 已经得到的结果
    pub fn outcome(&self) -> Option<&BootstrapOutcome> {
        self.outcome.get()
    }

    async fn sequence(&self, current_route: &str, cancel: &CancellationToken) -> BootstrapOutcome {
        if current_route == SIGN_IN_ROUTE {
            debug!("当前在登录页，跳过启动流程");
            self.cache.clear();
            return BootstrapOutcome::SignIn { redirect: false };
        }

        if let Some(cached) = self.cache.get() {
            info!("✓ 使用会话级缓存的资料");
            return BootstrapOutcome::Ready(ready_state(cached, current_route, true));
        }

        match self.fetch(cancel).await {
            Ok(FetchResult::Fetched(data)) => {
                info!(
                    "✓ 资料加载完成: {} ({} 个模块)",
                    data.profile.display_name(),
                    data.modules.len()
                );
                self.cache.store(data.clone());
                BootstrapOutcome::Ready(ready_state(data, current_route, false))
            }
            Ok(FetchResult::NoSession) => {
                info!("未登录，跳转登录页");
                self.cache.clear();
                BootstrapOutcome::SignIn { redirect: true }
            }
            Ok(FetchResult::Cancelled) => {
                debug!("启动流程已取消，丢弃结果");
                BootstrapOutcome::Cancelled
            }
            Err(e) => {
                warn!("⚠️ 加载资料失败，跳转登录页: {}", e);
                self.cache.clear();
                BootstrapOutcome::SignIn { redirect: true }
            }
        }
    }

    async fn fetch(&self, cancel: &CancellationToken) -> Result<FetchResult, AppError> {
        let Some(session) = until_cancelled(cancel, self.auth.get_session()).await else {
            return Ok(FetchResult::Cancelled);
        };
        if session?.is_none() {
            return Ok(FetchResult::NoSession);
        }

        match until_cancelled(cancel, self.profiles.get_my_profile_with_modules()).await {
            Some(result) => Ok(FetchResult::Fetched(result?)),
            None => Ok(FetchResult::Cancelled),
        }
    }
}

fn ready_state(data: ProfileWithModules, current_route: &str, from_cache: bool) -> BootstrapState {
    let redirect_to = if current_route == ROOT_ROUTE {
        data.profile
            .default_route
            .clone()
            .filter(|route| !route.is_empty() && route != ROOT_ROUTE)
    } else {
        None
    };

    BootstrapState {
        menu: build_menu(&data.modules),
        profile: data.profile,
        modules: data.modules,
        redirect_to,
        from_cache,
    }
}
