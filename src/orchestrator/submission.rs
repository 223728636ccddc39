//! 提交编排器 - 编排层
//!
//! ## 职责
//!
//! 串联 校验 → API 调用 → 归一化，并对外发布状态变化。
//!
//! ## 状态机
//!
//! ```text
//! Idle / Failed --submit--> Submitting --+--> Success
//!                                        +--> Failed
//! 任意状态 --reset--> Idle
//! ```
//!
//! - 同一时间最多一个在途请求，`Submitting` 期间的 submit 被拒绝
//! - 每次提交持有递增的令牌，settle 时令牌不一致（期间发生过 reset）则丢弃结果
//! - 状态只有编排器一个写者，展示层通过 `subscribe()` 只读

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::clients::AnalysisBackend;
use crate::config::Config;
use crate::error::SubmitRejected;
use crate::models::{ErrorInfo, SubmissionState, UploadSpec};
use crate::services::{normalize, FileValidator};

/// 一次 submit 的结局
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 结果已写入状态
    Settled(SubmissionState),
    /// 期间发生了 reset，结果被丢弃
    Discarded,
}

/// 提交编排器
pub struct SubmissionOrchestrator {
    validator: FileValidator,
    backend: Arc<dyn AnalysisBackend>,
    state: watch::Sender<SubmissionState>,
    /// 当前有效的请求令牌，只在持有 watch 锁时修改
    token: AtomicU64,
}

impl SubmissionOrchestrator {
    pub fn new(config: &Config, backend: Arc<dyn AnalysisBackend>) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            validator: FileValidator::new(config),
            backend,
            state,
            token: AtomicU64::new(0),
        }
    }

    /// 当前状态快照
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// 提交一次分析
    ///
    /// 只有 `Idle` 或 `Failed` 时可以开始；否则返回 `SubmitRejected`，状态不变
    pub async fn submit(&self, spec: UploadSpec) -> Result<SubmitOutcome, SubmitRejected> {
        let token = self.begin()?;
        info!("🚀 开始分析 (请求 #{})", token);

        let upload = match self.validator.check(spec) {
            Ok(upload) => upload,
            Err(e) => {
                warn!("⚠️ 文件校验失败: {}", e);
                return Ok(self.settle(token, SubmissionState::Failed(ErrorInfo::from(&e))));
            }
        };

        info!(
            "📤 正在上传: {} ({} 字节)",
            upload.file().file_name,
            upload.file().size
        );

        let next = match self.backend.analyze(&upload).await {
            Ok(raw) => {
                let result = normalize(&raw);
                info!("✓ 分析完成，总分: {}", result.final_score);
                SubmissionState::Success(result)
            }
            Err(e) => {
                warn!("❌ 分析失败: {}", e);
                SubmissionState::Failed(ErrorInfo::from(&e))
            }
        };

        Ok(self.settle(token, next))
    }

    /// 回到 `Idle`，丢弃结果/错误，并使在途请求失效
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            self.token.fetch_add(1, Ordering::SeqCst);
            *state = SubmissionState::Idle;
        });
        debug!("状态已重置");
    }

    /// 原子地检查并切换到 `Submitting`，返回本次请求的令牌
    fn begin(&self) -> Result<u64, SubmitRejected> {
        let mut outcome = Err(SubmitRejected::InFlight);
        self.state.send_if_modified(|state| {
            if !state.accepts_submit() {
                if state.result().is_some() {
                    outcome = Err(SubmitRejected::NotReady);
                }
                return false;
            }
            outcome = Ok(self.token.fetch_add(1, Ordering::SeqCst) + 1);
            *state = SubmissionState::Submitting;
            true
        });
        if let Err(rejected) = outcome {
            debug!("拒绝提交: {}", rejected);
        }
        outcome
    }

    /// 令牌仍有效时写入最终状态
    fn settle(&self, token: u64, next: SubmissionState) -> SubmitOutcome {
        let applied = self.state.send_if_modified(|state| {
            if self.token.load(Ordering::SeqCst) == token && state.is_submitting() {
                *state = next.clone();
                true
            } else {
                false
            }
        });

        if applied {
            debug!("请求 #{} -> {}", token, next.name());
            SubmitOutcome::Settled(next)
        } else {
            debug!("请求 #{} 已过期，丢弃结果", token);
            SubmitOutcome::Discarded
        }
    }
}
