use super::handlers::{execution, health, media, sequence, vehicle};
use super::middleware::cors::add_cors;
use crate::services::{FleetService, MediaService, SequenceService};
use axum::{
    Router,
    routing::{get, post},
};

#[derive(Clone)]
pub struct AppState {
    pub fleet_service: FleetService,
    pub sequence_service: SequenceService,
    pub media_service: MediaService,
}

pub fn create_router(
    fleet_service: FleetService,
    sequence_service: SequenceService,
    media_service: MediaService,
) -> Router {
    let state = AppState {
        fleet_service,
        sequence_service,
        media_service,
    };

    let api_routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Fleet
        .route("/api/fleet/summary", get(vehicle::fleet_summary))
        .route("/api/vehicles", get(vehicle::list_vehicles))
        .route("/api/vehicles/{id}", get(vehicle::get_vehicle))
        .route("/api/vehicles/{id}/commands", post(vehicle::send_command))
        .route("/api/vehicles/{id}/cameras", get(vehicle::list_cameras))
        // Sequence catalog
        .route("/api/sequences", get(sequence::list_sequences))
        .route("/api/sequences/{id}", get(sequence::get_sequence))
        .route(
            "/api/vehicles/{id}/sequences/{sequence_id}/preconditions",
            get(sequence::check_preconditions),
        )
        // Sequence execution
        .route(
            "/api/vehicles/{id}/sequences/{sequence_id}/execute",
            post(execution::start_sequence),
        )
        .route("/api/executions/current", get(execution::current_execution))
        .route(
            "/api/executions/current/steps/{step_id}",
            get(execution::step_status),
        )
        .route("/api/executions/cancel", post(execution::cancel_execution))
        .route("/api/executions/reset", post(execution::reset_execution))
        .route("/api/executions/history", get(execution::execution_history))
        // Camera media sessions
        .route("/api/cameras/{camera_id}", get(media::camera_status))
        .route("/api/cameras/{camera_id}/enable", post(media::enable_camera))
        .route(
            "/api/cameras/{camera_id}/disable",
            post(media::disable_camera),
        )
        .with_state(state);

    add_cors(api_routes)
}
