/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::models::UploadGroup;
use crate::services::MenuItem;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时按 `verbose` 选择 debug 或 info。
/// 重复调用时忽略（测试中会多次调用）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("homework_portal={}", default_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(api_base_url: &str, route: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 作业门户");
    info!("🌐 后端地址: {}", api_base_url);
    info!("📍 当前路由: {}", route);
    info!("{}", "=".repeat(60));
}

/// 输出导航菜单
pub fn log_menu(menu: &[MenuItem]) {
    info!("\n{}", "─".repeat(60));
    info!("📋 导航菜单 ({} 项)", menu.len());
    for item in menu {
        let marker = if item.is_dynamic { "★" } else { " " };
        info!("{} {:<24} {}", marker, truncate_text(&item.label, 24), item.route);
    }
    info!("{}", "─".repeat(60));
}

/// 输出作业组统计
pub fn log_upload_summary(groups: &[UploadGroup], errors: &[String]) {
    info!("\n{}", "=".repeat(60));
    info!("📊 上传处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    for group in groups {
        info!("📦 {} - {} 页", group.id, group.sheet_count());
        for (idx, sheet) in group.sheets.iter().enumerate() {
            info!(
                "   {}. {} ({}x{})",
                idx + 1,
                sheet.file.name,
                sheet.thumbnail.width,
                sheet.thumbnail.height
            );
        }
    }
    info!("❌ 被拒绝: {}", errors.len());
    for message in errors {
        info!("   - {}", message);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
