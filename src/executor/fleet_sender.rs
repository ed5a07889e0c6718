use std::time::Duration;

use async_trait::async_trait;

use super::CommandSender;
use crate::models::vehicle::ControlCommand;
use crate::store::FleetStore;

/// Demo vehicle control endpoint: acknowledges a command after a fixed
/// latency and applies its state effect to the in-memory fleet, standing in
/// for the plant control system.
#[derive(Clone)]
pub struct FleetCommandSender {
    fleet: FleetStore,
    latency: Duration,
}

impl FleetCommandSender {
    pub fn new(fleet: FleetStore, latency_ms: u64) -> Self {
        Self {
            fleet,
            latency: Duration::from_millis(latency_ms),
        }
    }
}

#[async_trait]
impl CommandSender for FleetCommandSender {
    async fn send(&self, vehicle_id: &str, command: ControlCommand) -> anyhow::Result<()> {
        tracing::debug!(vehicle_id = %vehicle_id, command = %command, "dispatching command");
        tokio::time::sleep(self.latency).await;
        self.fleet.apply_command(vehicle_id, command)?;
        Ok(())
    }
}
