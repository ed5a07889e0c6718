use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::collections::HashMap;

use crate::api::dto::sequence::{PreconditionResponse, SequenceResponse, SequencesListResponse};
use crate::api::routes::AppState;
use crate::error::Result;

pub async fn list_sequences(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SequencesListResponse>> {
    let category = params.get("category").and_then(|c| c.parse().ok());

    let sequences = state.sequence_service.list_sequences(category);
    Ok(Json(SequencesListResponse {
        data: sequences.into_iter().map(SequenceResponse::from).collect(),
    }))
}

pub async fn get_sequence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SequenceResponse>> {
    let sequence = state.sequence_service.get_sequence(&id)?;
    Ok(Json(SequenceResponse::from(sequence)))
}

pub async fn check_preconditions(
    State(state): State<AppState>,
    Path((vehicle_id, sequence_id)): Path<(String, String)>,
) -> Result<Json<PreconditionResponse>> {
    let check = state
        .sequence_service
        .check_preconditions(&vehicle_id, &sequence_id)?;
    Ok(Json(PreconditionResponse::from(check)))
}
