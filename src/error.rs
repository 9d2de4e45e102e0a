//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
///
/// 校验类错误的 Display 就是返回给调用方的原始消息，不加前缀。
#[derive(Error, Debug)]
pub enum AppError {
    /// 快照形状错误（长度不对、元素类型不对）
    #[error("{0}")]
    Shape(String),

    /// 参数验证错误
    #[error("{0}")]
    Validation(String),

    /// 参数类型错误
    #[error("{0}")]
    InvalidArgument(String),

    /// 请求体格式错误
    #[error("{0}")]
    BadRequest(String),

    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AppError {
    /// 是否属于调用方输入问题
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Shape(_)
                | AppError::Validation(_)
                | AppError::InvalidArgument(_)
                | AppError::BadRequest(_)
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(e.to_string())
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status: StatusCode = (&self).into();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(ErrorResponse::new(&self.to_string()))).into_response()
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误消息
    pub error: String,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// HTTP 状态码映射
impl From<&AppError> for StatusCode {
    fn from(err: &AppError) -> StatusCode {
        if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        for err in [
            AppError::Shape("Expected 5 slots, got 4.".into()),
            AppError::Validation("name must be a non-empty string.".into()),
            AppError::InvalidArgument("entries must be a map of {name: value}.".into()),
            AppError::BadRequest("Payload must be a list.".into()),
        ] {
            assert_eq!(StatusCode::from(&err), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_storage_errors_map_to_500() {
        let err = AppError::Database("disk I/O error".into());
        assert_eq!(StatusCode::from(&err), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = AppError::Shape("Expected 5 slots, got 3.".into());
        assert_eq!(err.to_string(), "Expected 5 slots, got 3.");
    }
}
