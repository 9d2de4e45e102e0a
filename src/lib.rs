//! Subjects - 科目进度持久化服务
//!
//! 保存固定 5 个槽位的科目进度（科目、当前状态、目标状态）和一条学习目标，
//! 通过 HTTP 接口读写，数据存放在本地 SQLite 文件中。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod storage;
