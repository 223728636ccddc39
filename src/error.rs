use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 后端调用错误
    #[error(transparent)]
    Api(#[from] ApiError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 导出反馈失败
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 编排器拒绝提交
    #[error(transparent)]
    Rejected(#[from] SubmitRejected),
}

/// 文件校验错误
///
/// `Display` 输出即为展示给用户的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 未选择文件
    #[error("no file selected")]
    NoFile,
    /// 文件类型不在允许列表中
    #[error("unsupported file type. Upload {allowed}.")]
    UnsupportedType { allowed: String },
    /// 文件超过大小上限
    #[error("file is too large. Max {} MB.", .max_bytes / (1024 * 1024))]
    TooLarge { size: u64, max_bytes: u64 },
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败（后端不可达、超时等）
    #[error("analysis service unreachable ({endpoint}): {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 后端返回非 2xx 状态
    #[error("{message}")]
    BadStatus { status: u16, message: String },
    /// 2xx 响应但 JSON 无法解析
    #[error("malformed response from analysis service (HTTP {status}): {source}")]
    MalformedResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    /// 读取待上传文件失败
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 构建请求失败
    #[error("failed to build request: {source}")]
    RequestBuild {
        #[source]
        source: reqwest::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 未知的文件扩展名
    #[error("未知的文件类型: {extension}")]
    UnknownFileKind { extension: String },
}

/// 反馈导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 提交被编排器拒绝（状态保持不变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    /// 已有分析请求在进行中
    #[error("an analysis is already in progress")]
    InFlight,
    /// 上一次结果尚未重置
    #[error("reset the current result before submitting again")]
    NotReady,
}

// ========== 便捷构造函数 ==========

impl ApiError {
    /// 创建网络请求失败错误
    pub fn unreachable(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::Unreachable {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建文件读取错误
    pub fn file_read(path: impl Into<String>, source: std::io::Error) -> Self {
        ApiError::FileRead {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
