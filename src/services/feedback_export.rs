//! 反馈导出服务
//!
//! 把规则反馈和 AI 反馈序列化为纯文本，用于复制或下载

use std::path::Path;

use tracing::info;

use crate::error::ExportError;
use crate::models::AnalysisResult;

/// 下载时的默认文件名
pub const DEFAULT_EXPORT_FILE: &str = "resume-feedback.txt";

/// 反馈报告
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackReport {
    pub rule_feedback: Vec<String>,
    pub ai_feedback: Vec<String>,
}

impl FeedbackReport {
    pub fn new(rule_feedback: Vec<String>, ai_feedback: Vec<String>) -> Self {
        Self {
            rule_feedback,
            ai_feedback,
        }
    }

    pub fn from_result(result: &AnalysisResult) -> Self {
        Self::new(result.rule_feedback.clone(), result.ai_feedback.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.rule_feedback.is_empty() && self.ai_feedback.is_empty()
    }

    /// 下载格式：标题 + 两段以 "- " 开头的列表
    pub fn to_download_text(&self) -> String {
        let mut lines = vec![
            "RESUME ANALYSIS FEEDBACK".to_string(),
            "======================".to_string(),
            String::new(),
            "RULE-BASED FEEDBACK:".to_string(),
        ];
        lines.extend(self.rule_feedback.iter().map(|s| format!("- {}", s)));
        lines.push(String::new());
        lines.push("AI-GENERATED FEEDBACK:".to_string());
        lines.extend(self.ai_feedback.iter().map(|s| format!("- {}", s)));
        lines.join("\n")
    }

    /// 剪贴板格式
    pub fn to_clipboard_text(&self) -> String {
        let mut lines = vec!["=== RULE-BASED FEEDBACK ===".to_string()];
        lines.extend(self.rule_feedback.iter().cloned());
        lines.push(String::new());
        lines.push("=== AI-GENERATED FEEDBACK ===".to_string());
        lines.extend(self.ai_feedback.iter().cloned());
        lines.join("\n")
    }

    /// 以 UTF-8 写入下载格式
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        tokio::fs::write(path, self.to_download_text())
            .await
            .map_err(|source| ExportError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;
        info!("📄 反馈已导出至: {}", path.display());
        Ok(())
    }
}
