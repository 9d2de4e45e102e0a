use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单例目标记录的主键
pub const GOAL_ROW_ID: i64 = 1;

/// 学习目标
///
/// 只保留最近一次写入，不保存历史。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    /// 目标文本，原样保存
    pub goal: String,
    /// 最后修改时间
    pub updated_at: DateTime<Utc>,
}
