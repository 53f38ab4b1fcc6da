//! qc-errors - 统一错误处理
//!
//! 错误对外以 RFC 7807 Problem Details 呈现

use serde::{Deserialize, Serialize};
use thiserror::Error;

const PROBLEM_BASE: &str = "https://qc.packline.local/problems";

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// 远端表格服务不可用或拒绝请求
    #[error("External service error: {0}")]
    ExternalService(String),

    /// 本地草稿存储读写失败
    #[error("Storage error: {0}")]
    Storage(String),

    /// 会话状态不允许当前操作（例如草稿尚未处理）
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),
}

/// 错误类别的对外描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorKind {
    pub status: u16,
    pub slug: &'static str,
    pub title: &'static str,
}

impl ErrorKind {
    const fn new(status: u16, slug: &'static str, title: &'static str) -> Self {
        Self { status, slug, title }
    }
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn external_service(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        Self::FailedPrecondition(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::new(404, "not-found", "Resource Not Found"),
            Self::Validation(_) => ErrorKind::new(400, "validation", "Validation Error"),
            Self::Conflict(_) => ErrorKind::new(409, "conflict", "Conflict"),
            Self::Internal(_) => ErrorKind::new(500, "internal", "Internal Server Error"),
            Self::ExternalService(_) => {
                ErrorKind::new(502, "external-service", "External Service Error")
            }
            Self::Storage(_) => ErrorKind::new(500, "storage", "Storage Error"),
            Self::FailedPrecondition(_) => {
                ErrorKind::new(412, "failed-precondition", "Failed Precondition")
            }
        }
    }

    /// HTTP 状态码
    pub fn status_code(&self) -> u16 {
        self.kind().status
    }

    /// 是否为用户输入或会话状态导致的错误
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    pub fn to_problem_details(&self) -> ProblemDetails {
        let kind = self.kind();
        ProblemDetails {
            r#type: format!("{}/{}", PROBLEM_BASE, kind.slug),
            title: kind.title.to_string(),
            status: kind.status,
            detail: self.to_string(),
            instance: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {}", err))
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// 设置出错的请求路径
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

pub type AppResult<T> = Result<T, AppError>;
