//! # Resume Analyzer
//!
//! 简历分析客户端：在本地校验文件，提交给远端分析服务，
//! 并把不断演变的响应归一化为统一的结果。
//!
//! ## 架构设计
//!
//! ### ① 模型层（Models）
//! - `models/` - `UploadSpec`、`AnalysisResult`、`SubmissionState`
//!
//! ### ② 业务能力层（Services）
//! - `FileValidator` - 文件类型/大小校验（纯函数，不读内容）
//! - `normalize` - 原始 JSON → `AnalysisResult`（全函数，不会失败）
//! - `FeedbackReport` - 反馈导出为纯文本
//!
//! ### ③ 客户端层（Clients）
//! - `AnalyzeClient` - multipart 上传 + 健康检查
//!
//! ### ④ 编排层（Orchestration）
//! - `SubmissionOrchestrator` - 状态机：idle / submitting / success / error
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{AnalysisBackend, AnalyzeClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnalysisResult, ResumeFile, SubmissionState, UploadSpec};
pub use orchestrator::{SubmissionOrchestrator, SubmitOutcome};
pub use services::{normalize, FeedbackReport, FileValidator};
