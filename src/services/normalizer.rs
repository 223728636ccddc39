//! 结果归一化服务 - 业务能力层
//!
//! 把后端返回的松散 JSON 映射为唯一的 `AnalysisResult`。
//!
//! 后端的响应形态随版本变化，已知的有：
//! - 扁平：`final_score` / `ml_score` / `structure_score` + `feedback`
//! - 嵌套：`scores.{final,ml,structure}` + `llmFeedback` + `sectionCoverage`
//! - 单分：`score` + `features` / `sections` / `feedback.{ruleBased,llm}`
//!
//! 每个字段对应一组按顺序尝试的 JSON Pointer，支持新形态只需追加一项。
//! 归一化是全函数：任何可解析的 JSON 都会得到可渲染的结果。

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::models::{AnalysisResult, FeatureValue, RawAnalysisPayload};

/// 推导总分时 ML 分的权重
pub const ML_WEIGHT: f64 = 0.7;
/// 推导总分时结构分的权重
pub const STRUCTURE_WEIGHT: f64 = 0.3;

const FINAL_SCORE: &[&str] = &["/final_score", "/score", "/scores/final"];
const ML_SCORE: &[&str] = &["/ml_score", "/scores/ml"];
const STRUCTURE_SCORE: &[&str] = &["/structure_score", "/scores/structure"];

const RULE_FEEDBACK: &[&str] = &["/feedback", "/feedback/ruleBased", "/ruleFeedback"];
const AI_FEEDBACK: &[&str] = &["/llmFeedback", "/feedback/llm", "/aiFeedback"];

const SECTION_COVERAGE: &[&str] = &["/sectionCoverage", "/section_coverage", "/sections"];
const EXTRACTED_SUMMARY: &[&str] = &["/extracted", "/extractedSummary", "/extracted_summary"];
const FEATURE_VECTOR: &[&str] = &["/featureVector", "/feature_vector", "/features"];

const EXTRACTED_TEXT: &[&str] = &["/extractedText", "/extracted_text"];
const MODEL_USED: &[&str] = &["/modelUsed", "/model_used", "/debug/modelUsed"];

/// 归一化原始响应
pub fn normalize(raw: &RawAnalysisPayload) -> AnalysisResult {
    let ml = first_match(raw, ML_SCORE, as_score);
    let structure = first_match(raw, STRUCTURE_SCORE, as_score);

    let final_score = first_match(raw, FINAL_SCORE, as_score).unwrap_or_else(|| {
        let derived = derive_final_score(ml, structure);
        debug!(
            "响应中没有总分，使用推导值 {} (ml: {:?}, structure: {:?})",
            derived, ml, structure
        );
        derived
    });

    let rule_feedback = first_match(raw, RULE_FEEDBACK, as_string_list).unwrap_or_default();
    let ai_feedback = first_match(raw, AI_FEEDBACK, as_string_list).unwrap_or_default();
    let feedback = if ai_feedback.is_empty() {
        rule_feedback.clone()
    } else {
        ai_feedback.clone()
    };

    AnalysisResult {
        final_score,
        ml_score: ml.unwrap_or(0.0),
        structure_score: structure.unwrap_or(0.0),
        feedback,
        rule_feedback,
        ai_feedback,
        section_coverage: first_match(raw, SECTION_COVERAGE, as_coverage).unwrap_or_default(),
        extracted_summary: first_match(raw, EXTRACTED_SUMMARY, as_object_map).unwrap_or_default(),
        feature_vector: first_match(raw, FEATURE_VECTOR, as_features).unwrap_or_default(),
        extracted_text: first_match(raw, EXTRACTED_TEXT, as_text),
        model_used: first_match(raw, MODEL_USED, as_text),
    }
}

/// `round(ml * 0.7 + structure * 0.3)`，两个输入都缺失时为 0
pub fn derive_final_score(ml: Option<f64>, structure: Option<f64>) -> f64 {
    if ml.is_none() && structure.is_none() {
        return 0.0;
    }
    let weighted = ml.unwrap_or(0.0) * ML_WEIGHT + structure.unwrap_or(0.0) * STRUCTURE_WEIGHT;
    round_half_up(weighted)
}

/// 0.5 向正无穷舍入
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

// ========== 提取辅助函数 ==========

fn first_match<T>(
    raw: &JsonValue,
    pointers: &[&str],
    extract: impl Fn(&JsonValue) -> Option<T>,
) -> Option<T> {
    pointers
        .iter()
        .filter_map(|pointer| raw.pointer(pointer))
        .find_map(extract)
}

/// 只接受 JSON 数字字面量
fn as_score(value: &JsonValue) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

fn as_string_list(value: &JsonValue) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                JsonValue::Null => None,
                JsonValue::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect(),
    )
}

fn as_coverage(value: &JsonValue) -> Option<BTreeMap<String, bool>> {
    let map = value.as_object()?;
    Some(
        map.iter()
            .map(|(name, present)| (name.clone(), truthy(present)))
            .collect(),
    )
}

fn as_object_map(value: &JsonValue) -> Option<BTreeMap<String, JsonValue>> {
    let map = value.as_object()?;
    Some(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

fn as_features(value: &JsonValue) -> Option<BTreeMap<String, FeatureValue>> {
    let map = value.as_object()?;
    Some(
        map.iter()
            .filter_map(|(name, v)| {
                let feature = match v {
                    JsonValue::Bool(b) => FeatureValue::Flag(*b),
                    JsonValue::Number(_) => FeatureValue::Number(as_score(v)?),
                    _ => return None,
                };
                Some((name.clone(), feature))
            })
            .collect(),
    )
}

fn as_text(value: &JsonValue) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        JsonValue::String(s) => !s.trim().is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
