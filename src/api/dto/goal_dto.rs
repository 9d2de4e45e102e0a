//! 目标 DTO
//!
//! 定义目标相关的请求和响应数据结构。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::slot::coerce_text;

/// 目标查询响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalResponse {
    /// 目标文本，未设置时为空串
    pub goal: String,
}

/// 设置目标请求
///
/// 请求体必须是带 `goal` 键的对象；非字符串的值按标量规则转成文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetGoalRequest {
    pub goal: String,
}

impl SetGoalRequest {
    /// 从已解析的请求体提取，形状不符时返回 `None`
    pub fn from_payload(payload: &Value) -> Option<Self> {
        payload.as_object()?.get("goal").map(|goal| Self {
            goal: coerce_text(Some(goal)),
        })
    }
}
