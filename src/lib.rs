//! # Homework Portal
//!
//! 教师作业门户的客户端核心：会话、资料、导航菜单、作业扫描上传
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - HTTP 传输和访问令牌缓存
//! - `HttpTransport` - 可替换的传输能力（测试中使用假实现）
//! - `TokenCache` - 唯一写入者是认证事件监听任务
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 认证服务和后端 API
//! - `SupabaseAuthClient` - 登录、注册、会话刷新
//! - `ApiClient` - 统一的认证请求和错误格式
//! - `ProfileClient` - `/profile/me` 系列接口
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 只处理单个对象
//! - `FileValidator` / `ThumbnailService` - 单个文件的校验和缩略图
//! - `build_menu` - 模块列表 → 导航菜单
//! - `ProfileCache` - 会话级资料缓存
//!
//! ### ④ 流程层（Workflow）
//! - `BootstrapSequencer` - 挂载时的会话 → 资料 → 跳转
//! - `UploadWorkflow` - 作业组的添加、排序、删除
//! - `StageWizard` - 扫描 → 调整 → 结果
//! - `SignInFlow` - 登录 / 注册 / 登出
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/app` - 资源装配、后台任务、命令入口
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{HttpTransport, TokenCache};
pub use models::{Module, ModuleKind, Profile, Session, UploadFile, UploadGroup};
pub use orchestrator::App;
pub use services::{build_menu, MenuIcon, MenuItem};
pub use workflow::{
    resolve_module, BootstrapOutcome, BootstrapSequencer, Stage, StageWizard, UploadWorkflow,
};
