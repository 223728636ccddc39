/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{display_score, AnalysisResult, ErrorInfo};

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 简历分析客户端启动");
    info!("🌐 分析接口: {}", config.analyze_url());
    info!(
        "📎 允许类型: {} | 上限: {} MB",
        config
            .allowed_kinds
            .iter()
            .map(|k| k.label)
            .collect::<Vec<_>>()
            .join(", "),
        config.max_file_size_bytes / (1024 * 1024)
    );
    info!("{}", "=".repeat(60));
}

/// 打印分析结果
pub fn log_analysis_result(result: &AnalysisResult) {
    info!("\n{}", "=".repeat(60));
    info!("📊 简历分析结果");
    info!("{}", "=".repeat(60));
    info!(
        "总分: {}/100 ({})",
        display_score(result.final_score),
        result.band().label()
    );
    info!("AI 分: {}/100", display_score(result.ml_score));
    info!("结构分: {}/100", display_score(result.structure_score));
    if let Some(model) = &result.model_used {
        info!("模型: {}", model);
    }

    if !result.section_coverage.is_empty() {
        info!("{}", "─".repeat(60));
        for (section, present) in &result.section_coverage {
            let mark = if *present { "✓" } else { "✗ (缺失)" };
            info!("  {} {}", mark, section);
        }
    }

    info!("{}", "─".repeat(60));
    if result.feedback.is_empty() {
        info!("暂无反馈");
    }
    for (i, item) in result.feedback.iter().enumerate() {
        info!("  {}. {}", i + 1, item);
    }

    if let Some(text) = &result.extracted_text {
        info!("{}", "─".repeat(60));
        info!("文本预览: {}", truncate_text(text, 120));
    }
    info!("{}", "=".repeat(60));
}

/// 打印失败信息
pub fn log_failure(info: &ErrorInfo) {
    warn!("❌ 分析失败 ({:?}): {}", info.kind, info.message);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
