//! 文件校验服务 - 业务能力层
//!
//! 只检查已有的元数据（名称、大小、声明类型），不读取文件内容

use tracing::debug;

use crate::config::{Config, FileKind};
use crate::error::ValidationError;
use crate::models::{ResumeFile, UploadSpec, ValidatedUpload};

/// 文件校验器
///
/// 规则按顺序执行，第一个失败即返回：
/// 1. 必须选择了文件
/// 2. 声明类型或扩展名在允许列表中
/// 3. 大小不超过上限
#[derive(Debug, Clone)]
pub struct FileValidator {
    allowed_kinds: Vec<FileKind>,
    max_file_size_bytes: u64,
}

impl FileValidator {
    pub fn new(config: &Config) -> Self {
        Self {
            allowed_kinds: config.allowed_kinds.clone(),
            max_file_size_bytes: config.max_file_size_bytes,
        }
    }

    /// 校验单个文件
    pub fn validate(&self, file: Option<&ResumeFile>) -> Result<(), ValidationError> {
        let file = file.ok_or(ValidationError::NoFile)?;

        if !self.kind_allowed(file) {
            debug!(
                "拒绝文件类型: {} (content_type: {:?})",
                file.file_name, file.content_type
            );
            return Err(ValidationError::UnsupportedType {
                allowed: self.allowed_labels(),
            });
        }

        if file.size > self.max_file_size_bytes {
            debug!(
                "拒绝文件大小: {} ({} > {} 字节)",
                file.file_name, file.size, self.max_file_size_bytes
            );
            return Err(ValidationError::TooLarge {
                size: file.size,
                max_bytes: self.max_file_size_bytes,
            });
        }

        Ok(())
    }

    /// 校验整个提交请求，通过后才能交给 API 客户端
    pub fn check(&self, spec: UploadSpec) -> Result<ValidatedUpload, ValidationError> {
        self.validate(spec.file.as_ref())?;
        let file = spec.file.ok_or(ValidationError::NoFile)?;
        Ok(ValidatedUpload::new(file, spec.job_role, spec.use_llm))
    }

    fn kind_allowed(&self, file: &ResumeFile) -> bool {
        let mime = file
            .content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty());
        let name = file.file_name.to_lowercase();

        self.allowed_kinds.iter().any(|kind| {
            mime.as_deref() == Some(kind.mime) || name.ends_with(kind.extension)
        })
    }

    /// 例如 "PDF, DOC, DOCX, TXT, or RTF"
    fn allowed_labels(&self) -> String {
        let labels: Vec<&str> = self.allowed_kinds.iter().map(|k| k.label).collect();
        match labels.as_slice() {
            [] => String::new(),
            [only] => only.to_string(),
            [init @ .., last] => format!("{}, or {}", init.join(", "), last),
        }
    }
}
