//! Handlers 模块
//!
//! HTTP 请求处理程序。请求体按原始字节接收再解析，
//! 解析失败与形状不符走同一条 400 路径。

pub mod goal_handler;
pub mod subject_handler;

pub use goal_handler::*;
pub use subject_handler::*;

use axum::http::StatusCode;
use serde_json::Value;

/// 解析 JSON 请求体，失败返回 `None`
pub(crate) fn parse_json_body(body: &[u8]) -> Option<Value> {
    serde_json::from_slice(body).ok()
}

/// CORS 预检请求
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
