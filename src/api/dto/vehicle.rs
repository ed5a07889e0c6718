use serde::{Deserialize, Serialize};

use crate::models::vehicle::{
    Camera, CameraPosition, CameraStatus, ConnectionStatus, ControlCommand, FleetStatus,
    GripperStatus, LoadStatus, OperationalState, Payload, Vehicle, ZoneOccupancy,
};

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub command: ControlCommand,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CameraResponse {
    pub id: String,
    pub label: String,
    pub position: CameraPosition,
    pub privacy_shield_enabled: bool,
    pub recording: bool,
    pub status: CameraStatus,
}

impl From<Camera> for CameraResponse {
    fn from(camera: Camera) -> Self {
        Self {
            id: camera.id,
            label: camera.label,
            position: camera.position,
            privacy_shield_enabled: camera.privacy_shield_enabled,
            recording: camera.recording,
            status: camera.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: String,
    pub name: String,
    pub status: FleetStatus,
    pub operational_state: OperationalState,
    pub track_id: String,
    pub section_id: String,
    pub offset: f64,
    pub bay: Option<String>,
    pub speed: f64,
    pub motor_temperature: f64,
    pub battery_level: f64,
    pub gripper_status: GripperStatus,
    pub load_status: LoadStatus,
    pub estop_active: bool,
    pub zone_occupancy: ZoneOccupancy,
    pub connection_status: ConnectionStatus,
    pub payload: Option<Payload>,
    pub cameras: Vec<CameraResponse>,
    pub last_updated: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            name: vehicle.name,
            status: vehicle.status,
            operational_state: vehicle.operational_state,
            track_id: vehicle.position.track_id,
            section_id: vehicle.position.section_id,
            offset: vehicle.position.offset,
            bay: vehicle.position.bay,
            speed: vehicle.telemetry.speed,
            motor_temperature: vehicle.telemetry.motor_temperature,
            battery_level: vehicle.telemetry.battery_level,
            gripper_status: vehicle.telemetry.gripper_status,
            load_status: vehicle.telemetry.load_status,
            estop_active: vehicle.safety.estop_active,
            zone_occupancy: vehicle.safety.zone_occupancy,
            connection_status: vehicle.safety.connection_status,
            payload: vehicle.payload,
            cameras: vehicle.cameras.into_iter().map(CameraResponse::from).collect(),
            last_updated: vehicle.last_updated.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VehiclesListResponse {
    pub data: Vec<VehicleResponse>,
}

#[derive(Debug, Serialize)]
pub struct CamerasListResponse {
    pub data: Vec<CameraResponse>,
}
