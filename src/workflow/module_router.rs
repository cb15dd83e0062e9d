//! 模块路由：`/modules/<slug>` → 页面

use phf::phf_map;

use crate::error::NavigationError;

pub const MODULE_ROUTE_PREFIX: &str = "/modules/";

/// 模块页面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleView {
    AssignHomework,
    ScanHomework,
    Calendar,
    HomeworkList,
}

static MODULE_VIEWS: phf::Map<&'static str, ModuleView> = phf_map! {
    "assign-homework" => ModuleView::AssignHomework,
    "scan-homework" => ModuleView::ScanHomework,
    "calendar" => ModuleView::Calendar,
    "homework-list" => ModuleView::HomeworkList,
};

impl ModuleView {
    pub fn title(self) -> &'static str {
        match self {
            ModuleView::AssignHomework => "Assign Homework",
            ModuleView::ScanHomework => "Scan Homework",
            ModuleView::Calendar => "Calendar",
            ModuleView::HomeworkList => "Homework List",
        }
    }
}

/// 按路由片段解析模块页面
pub fn resolve_module(code: &str) -> Result<ModuleView, NavigationError> {
    MODULE_VIEWS
        .get(code)
        .copied()
        .ok_or_else(|| NavigationError::ModuleNotFound {
            code: code.to_string(),
        })
}

/// 从完整路由解析，例如 `/modules/scan-homework`
pub fn resolve_route(route: &str) -> Result<ModuleView, NavigationError> {
    let code = route
        .strip_prefix(MODULE_ROUTE_PREFIX)
        .unwrap_or(route)
        .trim_end_matches('/');
    resolve_module(code)
}
