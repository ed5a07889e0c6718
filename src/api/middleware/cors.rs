use axum::Router;
use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS for the dashboard frontend, which is served from its own
/// origin in development.
pub fn add_cors(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    router.layer(cors)
}
