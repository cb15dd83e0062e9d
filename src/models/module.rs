//! 功能模块模型
//!
//! 模块列表由后端按 `seq_no` 排好序下发，客户端保持原顺序

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 后端下发的可导航功能模块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// 唯一标识
    pub module_code: String,
    #[serde(default)]
    pub module_name: String,
    #[serde(default)]
    pub module_eng_name: Option<String>,
    #[serde(default)]
    pub seq_no: i32,
    pub route: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub parent_code: Option<String>,
}

impl Module {
    /// 菜单显示名称：优先英文名
    pub fn label(&self) -> &str {
        match &self.module_eng_name {
            Some(name) if !name.is_empty() => name,
            _ => &self.module_name,
        }
    }

    pub fn kind(&self) -> ModuleKind {
        ModuleKind::from_code(&self.module_code)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// 已知模块类型，未知代码统一归为 `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    ScanHomework,
    AssignHomework,
    Calendar,
    HomeworkList,
    Other,
}

static MODULE_KINDS: phf::Map<&'static str, ModuleKind> = phf_map! {
    "scan_homework" => ModuleKind::ScanHomework,
    "assign_homework" => ModuleKind::AssignHomework,
    "calendar" => ModuleKind::Calendar,
    "homework_list" => ModuleKind::HomeworkList,
};

impl ModuleKind {
    /// 从模块代码解析
    pub fn from_code(code: &str) -> Self {
        MODULE_KINDS.get(code).copied().unwrap_or(ModuleKind::Other)
    }
}
