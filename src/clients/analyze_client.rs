/// 简历分析 API 客户端
///
/// 封装所有与分析后端相关的调用逻辑：
/// - `POST {base}{analyze_path}`，multipart 表单（file / job_role / LLM 标志）
/// - `GET {base}{health_path}`，存活探测
///
/// 每次 `analyze` 只发出一次请求，不重试、不缓存。
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::{Config, LlmFlag};
use crate::error::ApiError;
use crate::models::{RawAnalysisPayload, ValidatedUpload};

/// 后端约定的文件字段名
pub const FILE_FIELD: &str = "file";

/// 分析后端
///
/// 编排器通过该 trait 调用后端，测试中可替换为假实现
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, upload: &ValidatedUpload) -> Result<RawAnalysisPayload, ApiError>;
}

/// 分析 API 客户端
pub struct AnalyzeClient {
    http: reqwest::Client,
    analyze_url: String,
    health_url: String,
    job_role_field: String,
    llm_flag: LlmFlag,
}

impl AnalyzeClient {
    /// 创建新的分析客户端
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|source| ApiError::RequestBuild { source })?;

        Ok(Self {
            http,
            analyze_url: config.analyze_url(),
            health_url: config.health_url(),
            job_role_field: config.job_role_field.clone(),
            llm_flag: config.llm_flag.clone(),
        })
    }

    /// 健康检查，任何失败都视为不可达
    pub async fn ping(&self) -> bool {
        match self.http.get(&self.health_url).send().await {
            Ok(response) => {
                debug!("健康检查 {} -> {}", self.health_url, response.status());
                response.status().is_success()
            }
            Err(e) => {
                warn!("健康检查失败 ({}): {}", self.health_url, e);
                false
            }
        }
    }

    /// 构建 multipart 表单
    ///
    /// 不手动设置 Content-Type，boundary 由 reqwest 生成
    async fn build_form(&self, upload: &ValidatedUpload) -> Result<Form, ApiError> {
        let file = upload.file();
        let bytes = file.read_bytes().await?;

        let mut part = Part::bytes(bytes).file_name(file.file_name.clone());
        if let Some(content_type) = file.content_type.as_deref().filter(|ct| !ct.is_empty()) {
            part = part
                .mime_str(content_type)
                .map_err(|source| ApiError::RequestBuild { source })?;
        }

        let mut form = Form::new().part(FILE_FIELD, part);

        if let Some(job_role) = upload.job_role() {
            form = form.text(self.job_role_field.clone(), job_role.to_string());
        }

        if let Some(flag) = self.llm_flag.encoding.encode(upload.use_llm()) {
            form = form.text(self.llm_flag.field_name.clone(), flag);
        }

        Ok(form)
    }
}

#[async_trait]
impl AnalysisBackend for AnalyzeClient {
    async fn analyze(&self, upload: &ValidatedUpload) -> Result<RawAnalysisPayload, ApiError> {
        let form = self.build_form(upload).await?;

        debug!(
            "POST {} (文件: {}, {} 字节)",
            self.analyze_url,
            upload.file().file_name,
            upload.file().size
        );

        let response = self
            .http
            .post(&self.analyze_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::unreachable(&self.analyze_url, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::unreachable(&self.analyze_url, e))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!("分析接口返回 {}: {}", status, message);
            return Err(ApiError::BadStatus {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|source| ApiError::MalformedResponse {
            status: status.as_u16(),
            source,
        })
    }
}

/// 从错误响应中提取消息
///
/// 优先 `error`，其次 `message`；都没有时回退为 "HTTP <status> <statusText>"
fn error_message(status: StatusCode, body: &[u8]) -> String {
    let server_message = serde_json::from_slice::<JsonValue>(body)
        .ok()
        .and_then(|payload| {
            let found = ["error", "message"]
                .iter()
                .filter_map(|key| payload.get(*key))
                .find_map(|value| match value {
                    JsonValue::Null => None,
                    JsonValue::String(s) if s.trim().is_empty() => None,
                    JsonValue::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                });
            found
        });

    server_message.unwrap_or_else(|| {
        format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string()
    })
}
