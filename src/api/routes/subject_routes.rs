//! Subject Routes
//!
//! 定义科目槽位相关的 API 路由。

use axum::{Router, routing::get};

use crate::api::app_state::AppState;
use crate::api::handlers::{get_subjects, preflight, set_subjects};

/// 创建科目路由器
pub fn create_subject_router() -> Router<AppState> {
    Router::new().route(
        "/subjects",
        get(get_subjects).post(set_subjects).options(preflight),
    )
}
