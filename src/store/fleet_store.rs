use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::vehicle::{
    Camera, ControlCommand, FleetStatus, FleetSummary, GripperStatus, OperationalState, Vehicle,
};

/// In-memory fleet state, shared between the API handlers, the command
/// sender and the sequence executor. Observers always receive cloned
/// snapshots, never a live reference.
#[derive(Clone)]
pub struct FleetStore {
    vehicles: Arc<RwLock<HashMap<String, Vehicle>>>,
}

impl FleetStore {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        let map = vehicles.into_iter().map(|v| (v.id.clone(), v)).collect();
        Self {
            vehicles: Arc::new(RwLock::new(map)),
        }
    }

    /// Point-in-time snapshot of one vehicle.
    pub fn get(&self, id: &str) -> Result<Vehicle> {
        self.vehicles
            .read()
            .expect("fleet store lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::VehicleNotFound(id.to_string()))
    }

    /// All vehicles, optionally filtered by fleet status and a free-text
    /// query against id, name and bay.
    pub fn list(&self, status_filter: &[FleetStatus], query: Option<&str>) -> Vec<Vehicle> {
        let vehicles = self.vehicles.read().expect("fleet store lock poisoned");
        let mut list: Vec<Vehicle> = vehicles
            .values()
            .filter(|v| status_filter.is_empty() || status_filter.contains(&v.status))
            .filter(|v| match query {
                Some(q) => {
                    let q = q.to_lowercase();
                    v.id.to_lowercase().contains(&q)
                        || v.name.to_lowercase().contains(&q)
                        || v.position
                            .bay
                            .as_ref()
                            .is_some_and(|b| b.to_lowercase().contains(&q))
                }
                None => true,
            })
            .cloned()
            .collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    pub fn summary(&self) -> FleetSummary {
        let vehicles = self.vehicles.read().expect("fleet store lock poisoned");
        let mut summary = FleetSummary::default();
        for vehicle in vehicles.values() {
            summary.total += 1;
            match vehicle.status {
                FleetStatus::Active => summary.active += 1,
                FleetStatus::Idle => summary.idle += 1,
                FleetStatus::Warning => summary.warning += 1,
                FleetStatus::Critical => summary.critical += 1,
                // Maintenance counts as out of service.
                FleetStatus::Offline | FleetStatus::Maintenance => summary.offline += 1,
            }
        }
        summary
    }

    /// Find a camera across the fleet by its id, returning the owning
    /// vehicle id with it.
    pub fn find_camera(&self, camera_id: &str) -> Result<(String, Camera)> {
        let vehicles = self.vehicles.read().expect("fleet store lock poisoned");
        for vehicle in vehicles.values() {
            if let Some(camera) = vehicle.cameras.iter().find(|c| c.id == camera_id) {
                return Ok((vehicle.id.clone(), camera.clone()));
            }
        }
        Err(AppError::CameraNotFound(camera_id.to_string()))
    }

    /// Apply the state effect of an acknowledged control command.
    pub fn apply_command(&self, vehicle_id: &str, command: ControlCommand) -> Result<()> {
        let mut vehicles = self.vehicles.write().expect("fleet store lock poisoned");
        let vehicle = vehicles
            .get_mut(vehicle_id)
            .ok_or_else(|| AppError::VehicleNotFound(vehicle_id.to_string()))?;

        match command {
            ControlCommand::Estop => {
                vehicle.status = FleetStatus::Critical;
                vehicle.operational_state = OperationalState::EStopped;
                vehicle.safety.estop_active = true;
                vehicle.telemetry.speed = 0.0;
            }
            ControlCommand::Reset => {
                vehicle.status = FleetStatus::Idle;
                vehicle.operational_state = OperationalState::Idle;
                vehicle.safety.estop_active = false;
            }
            ControlCommand::Pause | ControlCommand::ManualStop => {
                vehicle.operational_state = OperationalState::Idle;
                vehicle.telemetry.speed = 0.0;
            }
            ControlCommand::Resume => {
                vehicle.status = FleetStatus::Active;
                vehicle.operational_state = OperationalState::Moving;
            }
            ControlCommand::GripperOpen => {
                vehicle.telemetry.gripper_status = GripperStatus::Disengaged;
            }
            ControlCommand::GripperClose => {
                vehicle.telemetry.gripper_status = GripperStatus::Engaged;
            }
            // Motion setpoint commands carry no snapshot-visible effect.
            ControlCommand::Home | ControlCommand::ManualForward | ControlCommand::ManualReverse => {
            }
        }

        vehicle.last_updated = Utc::now();
        Ok(())
    }
}
