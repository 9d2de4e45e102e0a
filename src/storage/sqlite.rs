//! SQLite 连接管理
//!
//! 每个操作独立打开连接、确保表结构存在、在事务中执行，
//! 成功提交；任何错误都会在事务析构时回滚，连接随之释放。

use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::config::DatabaseConfig;
use crate::error::Result;

/// 表结构，重复执行无副作用
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS subject_entries (
    name TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subject_slots (
    slot INTEGER PRIMARY KEY,
    subject TEXT NOT NULL,
    current TEXT NOT NULL,
    target TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS goals (
    id INTEGER PRIMARY KEY,
    goal TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// SQLite 数据库句柄
///
/// 只保存路径和参数，克隆开销很小；连接按操作获取。
#[derive(Debug, Clone)]
pub struct SqliteDb {
    path: Arc<PathBuf>,
    busy_timeout: Duration,
}

impl SqliteDb {
    /// 根据配置创建句柄
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            path: Arc::new(config.path.clone()),
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
        }
    }

    /// 使用默认参数打开指定路径
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self::new(&DatabaseConfig {
            path: path.into(),
            ..DatabaseConfig::default()
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 创建父目录并建表，启动时调用一次
    pub fn init(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.connect()?;
        tracing::debug!(path = %self.path.display(), "SQLite schema initialized");
        Ok(())
    }

    /// 打开连接并确保表结构存在
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(self.path.as_path())?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(conn)
    }

    /// 在单个事务中执行同步操作
    pub fn run_blocking<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let value = op(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// 在阻塞线程池中执行事务操作
    pub async fn run<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.run_blocking(op)).await?
    }

    /// 连通性检查
    pub async fn ping(&self) -> Result<()> {
        self.run(|tx| {
            tx.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use rusqlite::params;

    #[test]
    fn test_init_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDb::at_path(dir.path().join("nested/deeper/subjects.db"));

        db.init().unwrap();

        assert!(db.path().exists());
    }

    #[test]
    fn test_failed_operation_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDb::at_path(dir.path().join("subjects.db"));

        let result: Result<()> = db.run_blocking(|tx| {
            tx.execute(
                "INSERT INTO subject_entries (name, value, updated_at) VALUES (?1, ?2, ?3)",
                params!["k", "v", "2024-01-01T00:00:00Z"],
            )?;
            Err(AppError::Internal("boom".into()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .run_blocking(|tx| {
                Ok(tx.query_row("SELECT COUNT(*) FROM subject_entries", [], |row| {
                    row.get(0)
                })?)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_ping() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDb::at_path(dir.path().join("subjects.db"));
        db.ping().await.unwrap();
    }
}
