//! 存储工厂模块
//!
//! 根据配置创建数据库句柄和各仓储实例。

use std::sync::Arc;
use tracing::info;

use crate::config::config::{DatabaseConfig, SnapshotStrategy};
use crate::error::Result;
use crate::storage::blob_snapshot::BlobSnapshotRepository;
use crate::storage::entries::EntryRepository;
use crate::storage::goal::GoalRepository;
use crate::storage::mirror::SnapshotMirror;
use crate::storage::repository::SnapshotRepository;
use crate::storage::row_snapshot::RowSnapshotRepository;
use crate::storage::sqlite::SqliteDb;

/// 存储实例集合
#[derive(Clone)]
pub struct Storage {
    /// 数据库句柄
    pub db: SqliteDb,
    /// 槽位快照仓储
    pub snapshots: Arc<dyn SnapshotRepository>,
    /// 目标仓储
    pub goals: GoalRepository,
    /// 通用条目仓储
    pub entries: EntryRepository,
    /// 快照内存镜像
    pub mirror: SnapshotMirror,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("db", &self.db)
            .field("snapshots", &self.snapshots.strategy())
            .field("mirror", &self.mirror)
            .finish()
    }
}

/// 存储工厂
pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建存储实例，并确保数据库文件和表结构存在
    pub fn create(config: &DatabaseConfig) -> Result<Storage> {
        let db = SqliteDb::new(config);
        db.init()?;

        let mirror = SnapshotMirror::new();
        let snapshots =
            Self::snapshot_repository(db.clone(), config.snapshot_strategy, mirror.clone());

        info!(
            path = %db.path().display(),
            strategy = %config.snapshot_strategy,
            "Storage initialized"
        );

        Ok(Storage {
            goals: GoalRepository::new(db.clone()),
            entries: EntryRepository::new(db.clone()),
            db,
            snapshots,
            mirror,
        })
    }

    /// 按策略创建快照仓储
    pub fn snapshot_repository(
        db: SqliteDb,
        strategy: SnapshotStrategy,
        mirror: SnapshotMirror,
    ) -> Arc<dyn SnapshotRepository> {
        match strategy {
            SnapshotStrategy::Blob => Arc::new(BlobSnapshotRepository::new(db, mirror)),
            SnapshotStrategy::Rows => Arc::new(RowSnapshotRepository::new(db, mirror)),
        }
    }

    /// 检查存储是否可用
    pub async fn health_check(storage: &Storage) -> Result<bool> {
        storage.db.ping().await?;
        Ok(true)
    }
}
