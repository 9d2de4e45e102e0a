use parking_lot::RwLock;
use std::sync::Arc;

use crate::models::slot::CanonicalSnapshot;

/// 最近一次加载或保存的规范快照的内存镜像
///
/// 由仓储在构造时持有，每次成功保存或加载后整体替换。只用于诊断，
/// 读路径从不依赖它。
#[derive(Debug, Clone, Default)]
pub struct SnapshotMirror {
    inner: Arc<RwLock<CanonicalSnapshot>>,
}

impl SnapshotMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// 整体替换
    pub fn replace(&self, snapshot: CanonicalSnapshot) {
        *self.inner.write() = snapshot;
    }

    /// 当前内容的拷贝
    pub fn current(&self) -> CanonicalSnapshot {
        self.inner.read().clone()
    }

    /// 被占用的槽位数
    pub fn occupied(&self) -> usize {
        self.inner.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::slot::SlotRecord;

    #[test]
    fn test_clones_share_state() {
        let mirror = SnapshotMirror::new();
        let handle = mirror.clone();

        let mut snapshot = CanonicalSnapshot::new();
        snapshot.insert("2".into(), SlotRecord::new("Biology", "D", "B"));
        mirror.replace(snapshot.clone());

        assert_eq!(handle.current(), snapshot);
        assert_eq!(handle.occupied(), 1);
    }

    #[test]
    fn test_separate_mirrors_are_isolated() {
        let first = SnapshotMirror::new();
        let second = SnapshotMirror::new();

        let mut snapshot = CanonicalSnapshot::new();
        snapshot.insert("0".into(), SlotRecord::default());
        first.replace(snapshot);

        assert_eq!(second.occupied(), 0);
    }
}
