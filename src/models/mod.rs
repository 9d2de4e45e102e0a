//! 核心数据模型模块
//!
//! 定义槽位快照和学习目标的数据结构。

pub mod goal;
pub mod slot;

pub use goal::*;
pub use slot::*;
