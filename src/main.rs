mod api;
mod config;
mod error;
mod executor;
mod media;
mod models;
mod services;
mod store;

use crate::config::Config;
use crate::executor::{CommandSender, FleetCommandSender, SequenceExecutor};
use crate::media::transport::SimulatedTransportFactory;
use crate::media::{SignalingExchange, TransportFactory, WhepSignaling};
use crate::services::{FleetService, MediaService, SequenceService};
use crate::store::seed::seed_fleet;
use crate::store::{FleetStore, HistoryStore, SequenceLibrary};
use api::create_router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn run_server<F>(shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oht_gateway=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Starting oht_gateway with config: {:?}", config);

    // Seed the in-memory fleet
    let fleet = FleetStore::new(seed_fleet(config.fleet_size));
    tracing::info!("Fleet seeded with {} vehicles", config.fleet_size);

    // Wire the execution engine
    let history = HistoryStore::new(config.history_limit);
    let sender: Arc<dyn CommandSender> =
        Arc::new(FleetCommandSender::new(fleet.clone(), config.command_latency_ms));
    let executor = SequenceExecutor::new(sender.clone(), history.clone());
    let library = SequenceLibrary::builtin();

    // Wire the media plumbing
    let signaling: Arc<dyn SignalingExchange> = Arc::new(WhepSignaling::new());
    let transport_factory: Arc<dyn TransportFactory> = Arc::new(SimulatedTransportFactory::new());

    // Initialize services
    let fleet_service = FleetService::new(fleet.clone(), sender);
    let sequence_service = SequenceService::new(library, fleet.clone(), executor, history);
    let media_service = MediaService::new(fleet, signaling, transport_factory, &config);

    // Create router
    let app = create_router(fleet_service, sequence_service, media_service);
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let addr = addr.parse::<SocketAddr>()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_server(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
