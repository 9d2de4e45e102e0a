//! 存储模块
//!
//! 基于 SQLite 的仓储实现。

pub mod blob_snapshot;
pub mod entries;
pub mod factory;
pub mod goal;
pub mod mirror;
pub mod repository;
pub mod row_snapshot;
pub mod sqlite;
