use crate::error::ConfigError;

/// 一种允许上传的文件类型
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileKind {
    /// 展示用名称（如 "PDF"）
    pub label: &'static str,
    /// 扩展名（含点，小写）
    pub extension: &'static str,
    /// 对应的 MIME 类型
    pub mime: &'static str,
}

pub const PDF: FileKind = FileKind {
    label: "PDF",
    extension: ".pdf",
    mime: "application/pdf",
};
pub const DOC: FileKind = FileKind {
    label: "DOC",
    extension: ".doc",
    mime: "application/msword",
};
pub const DOCX: FileKind = FileKind {
    label: "DOCX",
    extension: ".docx",
    mime: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
};
pub const TXT: FileKind = FileKind {
    label: "TXT",
    extension: ".txt",
    mime: "text/plain",
};
pub const RTF: FileKind = FileKind {
    label: "RTF",
    extension: ".rtf",
    mime: "application/rtf",
};

/// 所有已知的文件类型
pub const KNOWN_KINDS: &[FileKind] = &[PDF, DOC, DOCX, TXT, RTF];

const MIB: u64 = 1024 * 1024;

/// "使用 LLM" 标志在表单中的编码方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmFlagEncoding {
    /// 总是发送 "true" / "false"
    TrueFalse,
    /// 启用时发送 "1"，否则不发送该字段
    OneOrOmit,
}

impl LlmFlagEncoding {
    /// 编码标志值；返回 None 表示该字段不写入表单
    pub fn encode(self, enabled: bool) -> Option<&'static str> {
        match (self, enabled) {
            (LlmFlagEncoding::TrueFalse, true) => Some("true"),
            (LlmFlagEncoding::TrueFalse, false) => Some("false"),
            (LlmFlagEncoding::OneOrOmit, true) => Some("1"),
            (LlmFlagEncoding::OneOrOmit, false) => None,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true-false" | "truefalse" => Some(LlmFlagEncoding::TrueFalse),
            "one-or-omit" | "oneoromit" | "1" => Some(LlmFlagEncoding::OneOrOmit),
            _ => None,
        }
    }
}

/// LLM 标志字段
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmFlag {
    pub field_name: String,
    pub encoding: LlmFlagEncoding,
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 后端 API 配置 ---
    /// 后端基础URL（不含结尾的 /）
    pub api_base_url: String,
    /// 分析接口路径
    pub analyze_path: String,
    /// 健康检查路径
    pub health_path: String,
    /// 职位字段名
    pub job_role_field: String,
    /// LLM 标志字段
    pub llm_flag: LlmFlag,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 文件校验配置 ---
    /// 允许的文件类型
    pub allowed_kinds: Vec<FileKind>,
    /// 文件大小上限（字节）
    pub max_file_size_bytes: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::multi_format()
    }
}

impl Config {
    /// 多格式上传：PDF/DOC/DOCX/TXT/RTF，上限 10 MB
    pub fn multi_format() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            analyze_path: "/api/analyze".to_string(),
            health_path: "/health".to_string(),
            job_role_field: "job_role".to_string(),
            llm_flag: LlmFlag {
                field_name: "use_llm".to_string(),
                encoding: LlmFlagEncoding::TrueFalse,
            },
            request_timeout_secs: 120,
            allowed_kinds: KNOWN_KINDS.to_vec(),
            max_file_size_bytes: 10 * MIB,
            verbose_logging: false,
        }
    }

    /// 仅 PDF 上传，上限 5 MB
    pub fn strict_pdf() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            analyze_path: "/analyze".to_string(),
            llm_flag: LlmFlag {
                field_name: "generate_llm".to_string(),
                encoding: LlmFlagEncoding::TrueFalse,
            },
            allowed_kinds: vec![PDF],
            max_file_size_bytes: 5 * MIB,
            ..Self::multi_format()
        }
    }

    /// 从环境变量读取配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(Self::default())
    }

    /// 以指定预设为默认值，从环境变量读取配置
    pub fn from_env_with(preset: Config) -> Result<Self, ConfigError> {
        Self::from_lookup_with(preset, |name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_with(Self::default(), lookup)
    }

    /// 从任意键值来源读取配置，未设置的项取 `preset` 的值
    pub fn from_lookup_with<F>(preset: Config, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = preset;

        let api_base_url = lookup("RESUME_API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default.api_base_url);

        let llm_encoding = match lookup("RESUME_LLM_FLAG_ENCODING") {
            Some(v) => LlmFlagEncoding::parse(&v)
                .ok_or_else(|| parse_failed("RESUME_LLM_FLAG_ENCODING", &v, "true-false | one-or-omit"))?,
            None => default.llm_flag.encoding,
        };

        let allowed_kinds = match lookup("RESUME_ALLOWED_EXTENSIONS") {
            Some(v) => parse_kinds(&v)?,
            None => default.allowed_kinds,
        };

        let max_file_size_bytes = match lookup("RESUME_MAX_UPLOAD_MB") {
            Some(v) => {
                let mb: u64 = v
                    .trim()
                    .parse()
                    .map_err(|_| parse_failed("RESUME_MAX_UPLOAD_MB", &v, "u64"))?;
                mb.checked_mul(MIB)
                    .ok_or_else(|| parse_failed("RESUME_MAX_UPLOAD_MB", &v, "u64 MiB"))?
            }
            None => default.max_file_size_bytes,
        };

        let request_timeout_secs = match lookup("RESUME_REQUEST_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| parse_failed("RESUME_REQUEST_TIMEOUT_SECS", &v, "u64"))?,
            None => default.request_timeout_secs,
        };

        Ok(Self {
            api_base_url,
            analyze_path: lookup("RESUME_ANALYZE_PATH").unwrap_or(default.analyze_path),
            health_path: lookup("RESUME_HEALTH_PATH").unwrap_or(default.health_path),
            job_role_field: default.job_role_field,
            llm_flag: LlmFlag {
                field_name: lookup("RESUME_LLM_FLAG_FIELD").unwrap_or(default.llm_flag.field_name),
                encoding: llm_encoding,
            },
            request_timeout_secs,
            allowed_kinds,
            max_file_size_bytes,
            verbose_logging: lookup("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
        })
    }

    /// 分析接口完整URL
    pub fn analyze_url(&self) -> String {
        join_url(&self.api_base_url, &self.analyze_path)
    }

    /// 健康检查完整URL
    pub fn health_url(&self) -> String {
        join_url(&self.api_base_url, &self.health_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn parse_failed(var_name: &str, value: &str, expected_type: &str) -> ConfigError {
    ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value: value.to_string(),
        expected_type: expected_type.to_string(),
    }
}

fn parse_kinds(value: &str) -> Result<Vec<FileKind>, ConfigError> {
    let mut kinds = Vec::new();
    for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let ext = format!(".{}", raw.trim_start_matches('.').to_ascii_lowercase());
        let kind = KNOWN_KINDS
            .iter()
            .find(|k| k.extension == ext)
            .ok_or_else(|| ConfigError::UnknownFileKind {
                extension: raw.to_string(),
            })?;
        if !kinds.contains(kind) {
            kinds.push(kind.clone());
        }
    }
    if kinds.is_empty() {
        return Err(parse_failed("RESUME_ALLOWED_EXTENSIONS", value, "非空扩展名列表"));
    }
    Ok(kinds)
}
