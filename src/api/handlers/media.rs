use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::media::CameraSessionResponse;
use crate::api::routes::AppState;
use crate::error::Result;

pub async fn enable_camera(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
) -> Result<Json<CameraSessionResponse>> {
    let info = state.media_service.enable(&camera_id)?;
    Ok(Json(CameraSessionResponse::from(info)))
}

pub async fn disable_camera(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
) -> Result<Json<CameraSessionResponse>> {
    let info = state.media_service.disable(&camera_id)?;
    Ok(Json(CameraSessionResponse::from(info)))
}

pub async fn camera_status(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
) -> Result<Json<CameraSessionResponse>> {
    let info = state.media_service.status(&camera_id)?;
    Ok(Json(CameraSessionResponse::from(info)))
}
