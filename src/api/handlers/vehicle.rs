use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::collections::HashMap;

use crate::api::dto::vehicle::{
    CameraResponse, CamerasListResponse, CommandRequest, VehicleResponse, VehiclesListResponse,
};
use crate::api::routes::AppState;
use crate::error::Result;
use crate::models::vehicle::FleetSummary;

pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<VehiclesListResponse>> {
    let status_filter = params
        .get("status")
        .map(|raw| {
            raw.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let query = params.get("q").map(String::as_str);

    let vehicles = state.fleet_service.list_vehicles(&status_filter, query);
    Ok(Json(VehiclesListResponse {
        data: vehicles.into_iter().map(VehicleResponse::from).collect(),
    }))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleResponse>> {
    let vehicle = state.fleet_service.get_vehicle(&id)?;
    Ok(Json(VehicleResponse::from(vehicle)))
}

pub async fn fleet_summary(State(state): State<AppState>) -> Json<FleetSummary> {
    Json(state.fleet_service.summary())
}

pub async fn send_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<VehicleResponse>> {
    if let Some(reason) = &req.reason {
        tracing::info!(vehicle_id = %id, command = %req.command, reason = %reason, "command with reason");
    }
    let vehicle = state.fleet_service.send_command(&id, req.command).await?;
    Ok(Json(VehicleResponse::from(vehicle)))
}

pub async fn list_cameras(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CamerasListResponse>> {
    let vehicle = state.fleet_service.get_vehicle(&id)?;
    Ok(Json(CamerasListResponse {
        data: vehicle.cameras.into_iter().map(CameraResponse::from).collect(),
    }))
}
