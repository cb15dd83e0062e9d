//! 导航菜单构建
//!
//! 后端下发的动态模块在前（保持原顺序），内置静态菜单在后

use serde::Serialize;

use crate::models::{Module, ModuleKind};

/// 菜单图标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuIcon {
    Camera,
    FilePlus,
    Calendar,
    ClipboardList,
    FileText,
    LayoutDashboard,
    FileSearch,
    Users,
    Briefcase,
    BarChart,
    Settings,
}

impl ModuleKind {
    /// 模块图标，未知模块使用通用文件图标
    pub fn icon(self) -> MenuIcon {
        match self {
            ModuleKind::ScanHomework => MenuIcon::Camera,
            ModuleKind::AssignHomework => MenuIcon::FilePlus,
            ModuleKind::Calendar => MenuIcon::Calendar,
            ModuleKind::HomeworkList => MenuIcon::ClipboardList,
            ModuleKind::Other => MenuIcon::FileText,
        }
    }
}

/// 菜单项
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub icon: MenuIcon,
    pub route: String,
    pub permissions: Vec<String>,
    pub is_dynamic: bool,
}

impl MenuItem {
    pub fn is_active(&self, pathname: &str) -> bool {
        self.route == pathname
    }
}

/// 内置菜单：(id, 名称, 图标, 路由)
const STATIC_MENU: [(&str, &str, MenuIcon, &str); 6] = [
    ("dashboard", "Dashboard", MenuIcon::LayoutDashboard, "/"),
    ("analyzer", "Resume Analyzer", MenuIcon::FileSearch, "/analyzer"),
    ("candidates", "Candidates", MenuIcon::Users, "/candidates"),
    ("jobs", "Job Postings", MenuIcon::Briefcase, "/jobs"),
    ("analytics", "Analytics", MenuIcon::BarChart, "/analytics"),
    ("settings", "Settings", MenuIcon::Settings, "/settings"),
];

/// 构建导航菜单
///
/// 不对动态模块重新排序，排序由后端按 `seq_no` 负责
pub fn build_menu(modules: &[Module]) -> Vec<MenuItem> {
    let dynamic = modules.iter().map(|m| MenuItem {
        id: m.module_code.clone(),
        label: m.label().to_string(),
        icon: m.kind().icon(),
        route: m.route.clone(),
        permissions: m.permissions.clone(),
        is_dynamic: true,
    });

    let fallback = STATIC_MENU.iter().map(|(id, label, icon, route)| MenuItem {
        id: id.to_string(),
        label: label.to_string(),
        icon: *icon,
        route: route.to_string(),
        permissions: Vec::new(),
        is_dynamic: false,
    });

    dynamic.chain(fallback).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(code: &str, seq_no: i32) -> Module {
        Module {
            module_code: code.to_string(),
            module_name: code.to_string(),
            module_eng_name: None,
            seq_no,
            route: format!("/modules/{}", code.replace('_', "-")),
            permissions: vec!["view".to_string()],
            parent_code: None,
        }
    }

    #[test]
    fn test_dynamic_items_come_first_in_input_order() {
        let menu = build_menu(&[module("scan_homework", 2), module("unknown", 1)]);

        assert_eq!(menu.len(), 2 + STATIC_MENU.len());
        assert_eq!(menu[0].id, "scan_homework");
        assert_eq!(menu[0].icon, MenuIcon::Camera);
        assert_eq!(menu[1].id, "unknown");
        assert_eq!(menu[1].icon, MenuIcon::FileText);
        assert!(menu[..2].iter().all(|item| item.is_dynamic));
        assert!(menu[2..].iter().all(|item| !item.is_dynamic));
        assert_eq!(menu[2].id, "dashboard");
    }

    #[test]
    fn test_empty_modules_yield_static_menu() {
        let menu = build_menu(&[]);
        let routes: Vec<&str> = menu.iter().map(|item| item.route.as_str()).collect();
        assert_eq!(
            routes,
            vec!["/", "/analyzer", "/candidates", "/jobs", "/analytics", "/settings"]
        );
        assert!(menu[0].is_active("/"));
    }

    #[test]
    fn test_every_kind_has_an_icon() {
        assert_eq!(ModuleKind::AssignHomework.icon(), MenuIcon::FilePlus);
        assert_eq!(ModuleKind::Calendar.icon(), MenuIcon::Calendar);
        assert_eq!(ModuleKind::HomeworkList.icon(), MenuIcon::ClipboardList);
    }
}
