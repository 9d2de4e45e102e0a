//! 序列化快照仓储
//!
//! 规范快照序列化为 JSON，作为 [`SNAPSHOT_KEY`] 条目的值 upsert。
//! 读取时存储内容损坏不报错，按空快照处理。

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::config::SnapshotStrategy;
use crate::error::Result;
use crate::models::slot::{CanonicalSnapshot, SNAPSHOT_KEY, SlotSnapshot, decode_canonical};
use crate::storage::entries::{select_entry, upsert_entry};
use crate::storage::mirror::SnapshotMirror;
use crate::storage::repository::SnapshotRepository;
use crate::storage::sqlite::SqliteDb;

/// 基于条目表的快照仓储
#[derive(Debug, Clone)]
pub struct BlobSnapshotRepository {
    db: SqliteDb,
    mirror: SnapshotMirror,
}

impl BlobSnapshotRepository {
    pub fn new(db: SqliteDb, mirror: SnapshotMirror) -> Self {
        Self { db, mirror }
    }

    fn decode(raw: Option<String>) -> CanonicalSnapshot {
        match raw {
            Some(raw) if !raw.is_empty() => decode_canonical(&raw).unwrap_or_else(|e| {
                warn!(error = %e, key = SNAPSHOT_KEY, "Stored snapshot is malformed, treating as empty");
                CanonicalSnapshot::new()
            }),
            _ => CanonicalSnapshot::new(),
        }
    }
}

#[async_trait]
impl SnapshotRepository for BlobSnapshotRepository {
    async fn load_snapshot(&self) -> Result<SlotSnapshot> {
        let raw = self
            .db
            .run(|tx| select_entry(tx, SNAPSHOT_KEY))
            .await?;

        let canonical = Self::decode(raw);
        let snapshot = SlotSnapshot::from_canonical(&canonical);
        self.mirror.replace(canonical);

        debug!(occupied = snapshot.occupied().count(), "Loaded snapshot blob");
        Ok(snapshot)
    }

    async fn save_snapshot(&self, snapshot: SlotSnapshot) -> Result<()> {
        let canonical = snapshot.to_canonical();
        let blob = serde_json::to_string(&canonical)?;

        self.db
            .run(move |tx| upsert_entry(tx, SNAPSHOT_KEY, &blob))
            .await?;

        debug!(occupied = canonical.len(), "Saved snapshot blob");
        self.mirror.replace(canonical);
        Ok(())
    }

    fn strategy(&self) -> SnapshotStrategy {
        SnapshotStrategy::Blob
    }
}
