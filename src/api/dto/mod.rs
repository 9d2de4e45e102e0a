//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod goal_dto;
pub mod status_dto;

pub use goal_dto::*;
pub use status_dto::*;
