//! 提交状态
//!
//! 由编排器独占写入，展示层只读

use std::fmt::Display;

use crate::error::{ApiError, ValidationError};
use crate::models::analysis::AnalysisResult;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 本地校验失败，未发出请求
    Validation,
    /// 网络、非 2xx 状态或响应格式错误
    Transport,
}

/// 失败信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    /// 展示给用户的消息
    pub message: String,
}

impl From<&ValidationError> for ErrorInfo {
    fn from(err: &ValidationError) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: err.to_string(),
        }
    }
}

impl From<&ApiError> for ErrorInfo {
    fn from(err: &ApiError) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: err.to_string(),
        }
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// 提交状态机
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success(AnalysisResult),
    Failed(ErrorInfo),
}

impl SubmissionState {
    /// 是否允许开始新的提交
    pub fn accepts_submit(&self) -> bool {
        matches!(self, SubmissionState::Idle | SubmissionState::Failed(_))
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            SubmissionState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            SubmissionState::Failed(info) => Some(info),
            _ => None,
        }
    }

    /// 用于日志的状态名
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Success(_) => "success",
            SubmissionState::Failed(_) => "error",
        }
    }
}
