//! 按行存储的快照仓储
//!
//! `subject_slots` 表每个被占用的槽位一行。整体写入先清空再插入，不做差异更新。

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use tracing::debug;

use crate::config::config::SnapshotStrategy;
use crate::error::Result;
use crate::models::slot::{SLOT_COUNT, SlotRecord, SlotSnapshot};
use crate::storage::mirror::SnapshotMirror;
use crate::storage::repository::SnapshotRepository;
use crate::storage::sqlite::SqliteDb;

/// 基于 `subject_slots` 表的快照仓储
#[derive(Debug, Clone)]
pub struct RowSnapshotRepository {
    db: SqliteDb,
    mirror: SnapshotMirror,
}

impl RowSnapshotRepository {
    pub fn new(db: SqliteDb, mirror: SnapshotMirror) -> Self {
        Self { db, mirror }
    }
}

#[async_trait]
impl SnapshotRepository for RowSnapshotRepository {
    async fn load_snapshot(&self) -> Result<SlotSnapshot> {
        let rows = self
            .db
            .run(|tx| {
                let mut stmt = tx.prepare(
                    "SELECT slot, subject, current, target FROM subject_slots ORDER BY slot",
                )?;
                let rows = stmt.query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        SlotRecord {
                            subject: row.get(1)?,
                            current: row.get(2)?,
                            target: row.get(3)?,
                        },
                    ))
                })?;

                let mut records = Vec::with_capacity(SLOT_COUNT);
                for row in rows {
                    let (slot, record) = row?;
                    // 负数下标丢弃，超出范围的由 from_occupied 忽略
                    if let Ok(slot) = usize::try_from(slot) {
                        records.push((slot, record));
                    }
                }
                Ok(records)
            })
            .await?;

        let snapshot = SlotSnapshot::from_occupied(rows);
        self.mirror.replace(snapshot.to_canonical());

        debug!(occupied = snapshot.occupied().count(), "Loaded snapshot rows");
        Ok(snapshot)
    }

    async fn save_snapshot(&self, snapshot: SlotSnapshot) -> Result<()> {
        let canonical = snapshot.to_canonical();
        let records: Vec<(i64, SlotRecord)> = snapshot
            .occupied()
            .map(|(index, record)| (index as i64, record.clone()))
            .collect();

        self.db
            .run(move |tx| {
                let updated_at = Utc::now().to_rfc3339();
                tx.execute("DELETE FROM subject_slots", [])?;
                for (slot, record) in &records {
                    tx.execute(
                        r#"
                        INSERT INTO subject_slots (slot, subject, current, target, updated_at)
                        VALUES (?1, ?2, ?3, ?4, ?5)
                        "#,
                        params![
                            slot,
                            record.subject,
                            record.current,
                            record.target,
                            updated_at
                        ],
                    )?;
                }
                Ok(())
            })
            .await?;

        debug!(occupied = canonical.len(), "Saved snapshot rows");
        self.mirror.replace(canonical);
        Ok(())
    }

    fn strategy(&self) -> SnapshotStrategy {
        SnapshotStrategy::Rows
    }
}
