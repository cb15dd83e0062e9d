//! 流程层（Workflow Layer）
//!
//! 定义应用外壳和各个页面的状态流转：
//! - `bootstrap` - 挂载时的会话 → 资料 → 跳转决策
//! - `upload_workflow` - 作业上传、排序、删除
//! - `stage_wizard` - 扫描 → 调整 → 结果 三步向导
//! - `module_router` - 模块路由解析
//! - `sign_in_flow` - 登录 / 注册 / 登出

pub mod bootstrap;
pub mod module_router;
pub mod sign_in_flow;
pub mod stage_wizard;
pub mod upload_workflow;

pub use bootstrap::{BootstrapOutcome, BootstrapSequencer, BootstrapState, ROOT_ROUTE, SIGN_IN_ROUTE};
pub use module_router::{resolve_module, ModuleView};
pub use sign_in_flow::{SignInFlow, SignInForm, SignUpForm, SignUpOutcome, SocialProvider};
pub use stage_wizard::{Stage, StageWizard, WizardAction};
pub use upload_workflow::{AddFilesReport, UploadPhase, UploadWorkflow};

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// 等待 `fut` 完成；取消先发生时丢弃结果并返回 None
pub(crate) async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        output = fut => Some(output),
    }
}
