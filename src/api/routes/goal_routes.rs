//! Goal Routes
//!
//! 定义目标相关的 API 路由。

use axum::{Router, routing::get};

use crate::api::app_state::AppState;
use crate::api::handlers::{get_goal, preflight, set_goal};

/// 创建目标路由器
pub fn create_goal_router() -> Router<AppState> {
    Router::new().route("/goal", get(get_goal).post(set_goal).options(preflight))
}
