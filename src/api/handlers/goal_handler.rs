use axum::{Json, body::Bytes, extract::State};
use tracing::debug;

use crate::{
    api::{
        app_state::AppState,
        dto::{GoalResponse, SetGoalRequest, StatusResponse},
        handlers::parse_json_body,
    },
    error::AppError,
};

/// 请求体形状不符时的错误消息
pub const GOAL_PAYLOAD_ERROR: &str = "Payload must be a dict with 'goal' key.";

pub async fn get_goal(State(state): State<AppState>) -> Result<Json<GoalResponse>, AppError> {
    let goal = state.goal_repository.get_goal().await?;
    Ok(Json(GoalResponse { goal }))
}

pub async fn set_goal(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    let request = parse_json_body(&body)
        .and_then(|payload| SetGoalRequest::from_payload(&payload))
        .ok_or_else(|| AppError::BadRequest(GOAL_PAYLOAD_ERROR.to_string()))?;

    debug!(len = request.goal.len(), "Setting goal");
    state.goal_repository.set_goal(&request.goal).await?;

    Ok(Json(StatusResponse::ok()))
}
