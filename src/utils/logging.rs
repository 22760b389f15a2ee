/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::{error, info};

use crate::config::{Config, ReviewMode};
use crate::error::AppError;
use crate::models::Catalog;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        match config.mode {
            ReviewMode::Grade => "评分模式",
            ReviewMode::Analyze => "分析模式",
        }
    );
    info!(
        "🕒 启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📄 文档目录: {} | {}", config.doc_root_primary.display(), config.doc_root_secondary.display());
    info!("{}", "=".repeat(60));
}

/// 记录题库加载信息
///
/// # 参数
/// - `catalog`: 已加载的题库
pub fn log_catalog_loaded(catalog: &Catalog) {
    let unmatched = catalog
        .items()
        .iter()
        .filter(|item| item.key_name.is_none())
        .count();
    info!("✓ 共加载 {} 条题目", catalog.len());
    info!(
        "📋 主题 {} 个, 难度 {} 个",
        catalog.topics().len(),
        catalog.levels().len()
    );
    if unmatched > 0 {
        info!("💡 其中 {} 条没有对应的法规名称", unmatched);
    }
}

/// 记录提交失败，表单内容保留
pub fn log_submit_failed(err: &AppError) {
    error!("❌ 提交失败: {}", err);
    info!("💡 表单内容已保留，可直接重新提交");
}

/// 截断长文本用于显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
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

/// 生成文本进度条
///
/// # 参数
/// - `fraction`: 进度（0 到 1）
/// - `width`: 进度条宽度
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("Điều 3 Luật", 6), "Điều 3...");
        assert_eq!(truncate_text("ngắn", 10), "ngắn");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.5, 10), "[#####-----]");
        assert_eq!(progress_bar(1.0, 4), "[####]");
        assert_eq!(progress_bar(1.7, 4), "[####]");
    }
}
