//! 分析结果模型
//!
//! `AnalysisResult` 是归一化后的唯一结果形态，展示层无需再做防御性检查

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 后端返回的原始 JSON，字段随后端版本变化
pub type RawAnalysisPayload = JsonValue;

/// 特征值：数字或布尔
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Number(f64),
}

/// 归一化后的分析结果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub final_score: f64,
    pub ml_score: f64,
    pub structure_score: f64,
    /// 首选反馈列表
    pub feedback: Vec<String>,
    /// 规则反馈
    pub rule_feedback: Vec<String>,
    /// AI 生成的反馈
    pub ai_feedback: Vec<String>,
    pub section_coverage: BTreeMap<String, bool>,
    pub extracted_summary: BTreeMap<String, JsonValue>,
    pub feature_vector: BTreeMap<String, FeatureValue>,
    pub extracted_text: Option<String>,
    pub model_used: Option<String>,
}

impl AnalysisResult {
    /// 缺失的简历章节（按名称排序）
    pub fn missing_sections(&self) -> Vec<&str> {
        self.section_coverage
            .iter()
            .filter(|(_, present)| !**present)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// 总分等级
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.final_score)
    }
}

/// 分数等级（仅用于展示）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            ScoreBand::Excellent
        } else if score >= 70.0 {
            ScoreBand::Good
        } else if score >= 50.0 {
            ScoreBand::Average
        } else {
            ScoreBand::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Average => "Average",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// 展示用分数，限制在 [0, 100]
pub fn display_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}
