//! 上传请求模型
//!
//! 描述一次提交尝试：文件句柄 + 可选职位 + 是否使用 LLM

use std::path::{Path, PathBuf};

use crate::error::ApiError;

/// 文件内容来源
///
/// 校验只看元数据，内容直到真正发送时才读取
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileData {
    /// 已在内存中的内容
    Bytes(Vec<u8>),
    /// 磁盘上的文件，发送时读取
    Path(PathBuf),
}

/// 待上传的简历文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    /// 文件名（含扩展名）
    pub file_name: String,
    /// 文件大小（字节）
    pub size: u64,
    /// 声明的内容类型（MIME），可能缺失
    pub content_type: Option<String>,
    pub data: FileData,
}

impl ResumeFile {
    /// 从内存数据创建
    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            size: bytes.len() as u64,
            content_type,
            data: FileData::Bytes(bytes),
        }
    }

    /// 从磁盘路径创建，只读取元数据
    pub async fn from_path(
        path: impl AsRef<Path>,
        content_type: Option<String>,
    ) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ApiError::file_read(path.display().to_string(), e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            file_name,
            size: metadata.len(),
            content_type,
            data: FileData::Path(path.to_path_buf()),
        })
    }

    /// 读取文件内容
    pub async fn read_bytes(&self) -> Result<Vec<u8>, ApiError> {
        match &self.data {
            FileData::Bytes(bytes) => Ok(bytes.clone()),
            FileData::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| ApiError::file_read(path.display().to_string(), e)),
        }
    }
}

/// 一次提交尝试
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSpec {
    pub file: Option<ResumeFile>,
    /// 目标职位（可选）
    pub job_role: Option<String>,
    /// 是否让后端生成 LLM 反馈
    pub use_llm: bool,
}

impl UploadSpec {
    pub fn new(file: ResumeFile) -> Self {
        Self {
            file: Some(file),
            job_role: None,
            use_llm: true,
        }
    }

    pub fn with_job_role(mut self, job_role: impl Into<String>) -> Self {
        let job_role = job_role.into();
        self.job_role = if job_role.trim().is_empty() {
            None
        } else {
            Some(job_role)
        };
        self
    }

    pub fn with_llm(mut self, use_llm: bool) -> Self {
        self.use_llm = use_llm;
        self
    }
}

/// 已通过校验的上传请求
///
/// 只能由文件校验器构造，API 客户端只接受该类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    file: ResumeFile,
    job_role: Option<String>,
    use_llm: bool,
}

impl ValidatedUpload {
    pub(crate) fn new(file: ResumeFile, job_role: Option<String>, use_llm: bool) -> Self {
        Self {
            file,
            job_role,
            use_llm,
        }
    }

    pub fn file(&self) -> &ResumeFile {
        &self.file
    }

    pub fn job_role(&self) -> Option<&str> {
        self.job_role.as_deref()
    }

    pub fn use_llm(&self) -> bool {
        self.use_llm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_blank_job_role_is_dropped() {
        let file = ResumeFile::from_bytes("cv.pdf", None, vec![1, 2, 3]);
        let spec = UploadSpec::new(file).with_job_role("   ");
        assert_eq!(spec.job_role, None);
        assert!(spec.use_llm);
    }

    #[tokio::test]
    async fn test_from_path_reads_metadata_then_bytes() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.4 test").unwrap();

        let file = ResumeFile::from_path(tmp.path(), None).await.unwrap();
        assert_eq!(file.size, 13);
        assert!(file.file_name.ends_with(".pdf"));
        assert_eq!(file.read_bytes().await.unwrap(), b"%PDF-1.4 test".to_vec());
    }

    #[tokio::test]
    async fn test_from_missing_path_fails() {
        let err = ResumeFile::from_path("/definitely/not/here.pdf", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::FileRead { .. }));
    }
}
