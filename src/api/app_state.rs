use crate::storage::factory::Storage;
use crate::storage::goal::GoalRepository;
use crate::storage::mirror::SnapshotMirror;
use crate::storage::repository::SnapshotRepository;
use std::sync::Arc;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Slot snapshot repository (blob or rows strategy)
    pub snapshot_repository: Arc<dyn SnapshotRepository>,
    /// Singleton goal repository
    pub goal_repository: Arc<GoalRepository>,
    /// Mirror of the last loaded or saved snapshot, diagnostics only
    pub mirror: SnapshotMirror,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("snapshot_repository", &self.snapshot_repository.strategy())
            .field("goal_repository", &self.goal_repository)
            .field("mirror", &self.mirror)
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        snapshot_repository: Arc<dyn SnapshotRepository>,
        goal_repository: GoalRepository,
        mirror: SnapshotMirror,
    ) -> Self {
        Self {
            snapshot_repository,
            goal_repository: Arc::new(goal_repository),
            mirror,
        }
    }

    /// Create application state from initialized storage
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(
            storage.snapshots.clone(),
            storage.goals.clone(),
            storage.mirror.clone(),
        )
    }
}
