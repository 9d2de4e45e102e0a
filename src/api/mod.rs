//! API 模块
//!
//! 提供 REST API 支持。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::api::app_state::AppState;
use crate::api::middleware::cors_headers_middleware;
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::subject_routes::create_subject_router())
        .merge(routes::goal_routes::create_goal_router());

    Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn(cors_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
