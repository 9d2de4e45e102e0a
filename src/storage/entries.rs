//! 通用键值条目存储
//!
//! `subject_entries` 表按名称 upsert，快照的序列化结果也存放在这里的保留键下。

use chrono::Utc;
use rusqlite::{OptionalExtension, Transaction, params};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::slot::coerce_text;
use crate::storage::sqlite::SqliteDb;

const UPSERT_ENTRY_SQL: &str = r#"
    INSERT INTO subject_entries (name, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(name) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

/// 在已有事务中 upsert 一个条目
pub(crate) fn upsert_entry(tx: &Transaction<'_>, name: &str, value: &str) -> Result<()> {
    tx.execute(UPSERT_ENTRY_SQL, params![name, value, Utc::now().to_rfc3339()])?;
    Ok(())
}

/// 在已有事务中读取一个条目
pub(crate) fn select_entry(tx: &Transaction<'_>, name: &str) -> Result<Option<String>> {
    let value = tx
        .query_row(
            "SELECT value FROM subject_entries WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AppError::Validation(
            "name must be a non-empty string.".to_string(),
        ));
    }
    Ok(())
}

/// 把任意 JSON 值解析为条目映射
///
/// 顶层必须是对象；值按标量规则转换为文本。
pub fn parse_entries(input: &Value) -> Result<BTreeMap<String, String>> {
    let object = input.as_object().ok_or_else(|| {
        AppError::InvalidArgument("entries must be a map of {name: value}.".to_string())
    })?;

    Ok(object
        .iter()
        .map(|(name, value)| (name.clone(), coerce_text(Some(value))))
        .collect())
}

/// 条目仓储
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: SqliteDb,
}

impl EntryRepository {
    pub fn new(db: SqliteDb) -> Self {
        Self { db }
    }

    /// 写入单个条目，名称不能为空
    pub async fn set_entry(&self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;

        let name = name.to_string();
        let value = value.to_string();
        debug!(name = %name, "Upserting entry");
        self.db
            .run(move |tx| upsert_entry(tx, &name, &value))
            .await
    }

    /// 在一个事务中写入多个条目，任一名称为空则全部不写
    pub async fn set_entries<I>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let entries: Vec<(String, String)> = entries.into_iter().collect();
        for (name, _) in &entries {
            validate_name(name)?;
        }

        debug!(count = entries.len(), "Upserting entries");
        self.db
            .run(move |tx| {
                for (name, value) in &entries {
                    upsert_entry(tx, name, value)?;
                }
                Ok(())
            })
            .await
    }

    /// 从未类型化的 JSON 写入多个条目
    pub async fn set_entries_json(&self, input: &Value) -> Result<()> {
        let entries = parse_entries(input)?;
        self.set_entries(entries).await
    }

    /// 读取单个条目
    pub async fn get_entry(&self, name: &str) -> Result<Option<String>> {
        let name = name.to_string();
        self.db.run(move |tx| select_entry(tx, &name)).await
    }

    /// 按名称排序返回全部条目
    pub async fn get_all_entries(&self) -> Result<BTreeMap<String, String>> {
        self.db
            .run(|tx| {
                let mut stmt =
                    tx.prepare("SELECT name, value FROM subject_entries ORDER BY name")?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?;

                let mut entries = BTreeMap::new();
                for row in rows {
                    let (name, value) = row?;
                    entries.insert(name, value);
                }
                Ok(entries)
            })
            .await
    }
}
