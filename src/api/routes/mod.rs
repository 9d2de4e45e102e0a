//! Routes 模块
//!
//! 定义 API 路由。

pub mod goal_routes;
pub mod subject_routes;
