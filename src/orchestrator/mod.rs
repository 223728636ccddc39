//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::SubmissionOrchestrator (状态机，唯一写者)
//!     ↓
//! services::FileValidator (同步校验)
//!     ↓
//! clients::AnalysisBackend (异步，唯一的挂起点)
//!     ↓
//! services::normalize (同步归一化)
//! ```
//!
//! 编排层只做调度和状态发布，不做具体业务判断。

pub mod submission;

pub use submission::{SubmissionOrchestrator, SubmitOutcome};
