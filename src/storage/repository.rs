use async_trait::async_trait;

use crate::config::config::SnapshotStrategy;
use crate::error::Result;
use crate::models::slot::SlotSnapshot;

/// 槽位快照仓储 trait
///
/// 两种持久化策略对外语义一致：写入长度为 N 的快照，读出长度为 N 的快照，
/// 占用/空缺状态原样保留。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// 读取完整快照，从未写入时为全空
    async fn load_snapshot(&self) -> Result<SlotSnapshot>;

    /// 整体替换快照
    async fn save_snapshot(&self, snapshot: SlotSnapshot) -> Result<()>;

    /// 使用的持久化策略
    fn strategy(&self) -> SnapshotStrategy;
}
