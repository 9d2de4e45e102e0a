use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::goal::{GOAL_ROW_ID, GoalRecord};
use crate::storage::sqlite::SqliteDb;

/// 目标仓储，单例行
#[derive(Debug, Clone)]
pub struct GoalRepository {
    db: SqliteDb,
}

impl GoalRepository {
    pub fn new(db: SqliteDb) -> Self {
        Self { db }
    }

    /// 写入目标，覆盖旧值并刷新修改时间；内容不做校验
    pub async fn set_goal(&self, goal: &str) -> Result<()> {
        let goal = goal.to_string();
        debug!(len = goal.len(), "Saving goal");
        self.db
            .run(move |tx| {
                tx.execute(
                    r#"
                    INSERT INTO goals (id, goal, updated_at)
                    VALUES (?1, ?2, ?3)
                    ON CONFLICT(id) DO UPDATE SET
                        goal = excluded.goal,
                        updated_at = excluded.updated_at
                    "#,
                    params![GOAL_ROW_ID, goal, Utc::now().to_rfc3339()],
                )?;
                Ok(())
            })
            .await
    }

    /// 读取目标文本，从未设置时为空串
    pub async fn get_goal(&self) -> Result<String> {
        Ok(self
            .get_goal_record()
            .await?
            .map(|record| record.goal)
            .unwrap_or_default())
    }

    /// 读取完整记录
    pub async fn get_goal_record(&self) -> Result<Option<GoalRecord>> {
        let row: Option<(String, String)> = self
            .db
            .run(|tx| {
                Ok(tx
                    .query_row(
                        "SELECT goal, updated_at FROM goals WHERE id = ?1",
                        params![GOAL_ROW_ID],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .optional()?)
            })
            .await?;

        row.map(|(goal, updated_at)| {
            let updated_at = DateTime::parse_from_rfc3339(&updated_at)
                .map_err(|e| AppError::Database(format!("invalid goal timestamp: {}", e)))?
                .with_timezone(&Utc);
            Ok(GoalRecord { goal, updated_at })
        })
        .transpose()
    }
}
