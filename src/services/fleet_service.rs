use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::executor::CommandSender;
use crate::models::vehicle::{ControlCommand, FleetStatus, FleetSummary, Vehicle};
use crate::store::FleetStore;

/// Fleet queries and single-command tele-operation.
#[derive(Clone)]
pub struct FleetService {
    fleet: FleetStore,
    sender: Arc<dyn CommandSender>,
}

impl FleetService {
    pub fn new(fleet: FleetStore, sender: Arc<dyn CommandSender>) -> Self {
        Self { fleet, sender }
    }

    pub fn list_vehicles(&self, status_filter: &[FleetStatus], query: Option<&str>) -> Vec<Vehicle> {
        self.fleet.list(status_filter, query)
    }

    pub fn get_vehicle(&self, id: &str) -> Result<Vehicle> {
        self.fleet.get(id)
    }

    pub fn summary(&self) -> FleetSummary {
        self.fleet.summary()
    }

    /// Dispatch one control command to a vehicle and return the snapshot
    /// after the command settled.
    pub async fn send_command(&self, vehicle_id: &str, command: ControlCommand) -> Result<Vehicle> {
        // Validate the target before dispatching.
        self.fleet.get(vehicle_id)?;

        tracing::info!(vehicle_id = %vehicle_id, command = %command, "operator command");
        self.sender
            .send(vehicle_id, command)
            .await
            .map_err(|e| AppError::Command(e.to_string()))?;

        self.fleet.get(vehicle_id)
    }
}
