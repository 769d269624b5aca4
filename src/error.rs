//! 所有客户端操作共用的错误类型。

use thiserror::Error;

/// 平台返回无权限业务码时的固定提示。
pub const UNAUTHORIZED_MESSAGE: &str = "文档未授权,请将文档链接分享范围设置为凡岛";

/// 文档类型不支持导出时的提示。
pub const UNSUPPORTED_TYPE_MESSAGE: &str = "unsupported document type";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// 应用无权访问文档（业务码 131006 / 1069902）。
    #[error("{message}")]
    Unauthorized { status: u16, message: String },
    /// 其他失败业务码或非 200 响应。
    #[error("{message}")]
    Internal { status: u16, message: String },
    /// 文档链接缺少类型段或 token 段。
    #[error("invalid document url: {0}")]
    InvalidUrl(String),
    /// 导出任务以失败状态结束。
    #[error("export task {ticket} failed with job status {job_status}: {message}")]
    ExportFailed {
        ticket: String,
        job_status: i64,
        message: String,
    },
    /// 达到轮询次数上限时任务仍未完成。
    #[error("export task {ticket} still pending after {polls} polls")]
    ExportTimeout { ticket: String, polls: u32 },
    #[error("configuration error: {0}")]
    Config(String),
    /// 传输层错误：DNS、连接、超时、读取响应体。
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// 响应体与预期的 JSON 结构不符。
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn unauthorized() -> Self {
        Error::Unauthorized {
            status: 401,
            message: UNAUTHORIZED_MESSAGE.to_string(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            status: 500,
            message: message.into(),
        }
    }

    /// 错误对应的 HTTP 状态码，便于调用方向上游转发。
    pub fn status(&self) -> u16 {
        match self {
            Error::Unauthorized { status, .. } | Error::Internal { status, .. } => *status,
            Error::InvalidUrl(_) => 400,
            Error::ExportTimeout { .. } => 504,
            Error::Reqwest(_) | Error::Serde(_) => 502,
            Error::ExportFailed { .. } | Error::Config(_) | Error::Io(_) => 500,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }
}
