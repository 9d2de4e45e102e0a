use axum::{Json, body::Bytes, extract::State};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::StatusResponse, handlers::parse_json_body},
    error::AppError,
    models::slot::SlotSnapshot,
};

/// 请求体不是 JSON 数组时的错误消息
pub const SUBJECTS_PAYLOAD_ERROR: &str = "Payload must be a list.";

pub async fn get_subjects(State(state): State<AppState>) -> Result<Json<SlotSnapshot>, AppError> {
    let snapshot = state.snapshot_repository.load_snapshot().await?;
    Ok(Json(snapshot))
}

pub async fn set_subjects(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    let payload = parse_json_body(&body)
        .filter(|payload| payload.is_array())
        .ok_or_else(|| AppError::BadRequest(SUBJECTS_PAYLOAD_ERROR.to_string()))?;

    let snapshot = SlotSnapshot::from_json(&payload)?;
    state.snapshot_repository.save_snapshot(snapshot).await?;

    debug!(
        occupied = state.mirror.occupied(),
        strategy = %state.snapshot_repository.strategy(),
        "Subjects saved"
    );

    Ok(Json(StatusResponse::ok()))
}
