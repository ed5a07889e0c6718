use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::api::dto::execution::{ExecutionResponse, ExecutionResultResponse, HistoryResponse};
use crate::api::routes::AppState;
use crate::error::Result;

pub async fn start_sequence(
    State(state): State<AppState>,
    Path((vehicle_id, sequence_id)): Path<(String, String)>,
) -> Result<Json<ExecutionResponse>> {
    let execution = state.sequence_service.start(&vehicle_id, &sequence_id)?;
    Ok(Json(ExecutionResponse::from(execution)))
}

pub async fn current_execution(State(state): State<AppState>) -> Json<Option<ExecutionResponse>> {
    Json(state.sequence_service.current().map(ExecutionResponse::from))
}

pub async fn step_status(
    State(state): State<AppState>,
    Path(step_id): Path<String>,
) -> Json<Value> {
    let status = state.sequence_service.step_status(&step_id);
    Json(json!({
        "step_id": step_id,
        "status": status,
    }))
}

pub async fn cancel_execution(State(state): State<AppState>) -> Result<Json<ExecutionResponse>> {
    let execution = state.sequence_service.cancel()?;
    Ok(Json(ExecutionResponse::from(execution)))
}

pub async fn reset_execution(State(state): State<AppState>) -> Json<Value> {
    state.sequence_service.reset();
    Json(json!({
        "message": "Execution reset"
    }))
}

pub async fn execution_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        data: state
            .sequence_service
            .history()
            .into_iter()
            .map(ExecutionResultResponse::from)
            .collect(),
    })
}
