//! Demo fleet seeding. Stands in for the plant telemetry feed the way the
//! reference deployment's generated fleet does, but deterministic so the
//! same vehicle always starts in the same state.

use chrono::Utc;

use crate::models::vehicle::{
    Camera, CameraPosition, CameraStatus, ConnectionStatus, FleetStatus, GripperStatus,
    LoadStatus, OperationalState, Payload, PayloadKind, Position, SafetyStatus, TaskPriority,
    TaskStatus, Telemetry, TransportTask, Vehicle, ZoneOccupancy,
};

const VEHICLE_ID_PREFIX: &str = "OHT";

pub fn format_vehicle_id(number: usize) -> String {
    format!("{}-{:02}", VEHICLE_ID_PREFIX, number)
}

/// Fleet status rotation applied across vehicle indices. Weighted the way
/// the reference data skews: mostly active, some idle, the occasional
/// warning or critical unit.
const STATUS_ROTATION: [FleetStatus; 7] = [
    FleetStatus::Active,
    FleetStatus::Active,
    FleetStatus::Active,
    FleetStatus::Idle,
    FleetStatus::Idle,
    FleetStatus::Warning,
    FleetStatus::Critical,
];

fn operational_state_for(status: FleetStatus) -> OperationalState {
    match status {
        FleetStatus::Active => OperationalState::Moving,
        FleetStatus::Idle => OperationalState::Idle,
        FleetStatus::Warning => OperationalState::Moving,
        FleetStatus::Critical => OperationalState::EStopped,
        FleetStatus::Maintenance => OperationalState::Maintenance,
        FleetStatus::Offline => OperationalState::Idle,
    }
}

fn cameras_for(vehicle_id: &str) -> Vec<Camera> {
    let positions = [
        (CameraPosition::Front, "Front Camera"),
        (CameraPosition::Down, "Down Camera"),
        (CameraPosition::Left, "Left Camera"),
        (CameraPosition::Right, "Right Camera"),
        (CameraPosition::Rear, "Rear Camera"),
        (CameraPosition::Top, "Top Camera"),
    ];

    positions
        .into_iter()
        .map(|(position, label)| {
            let suffix = match position {
                CameraPosition::Front => "front",
                CameraPosition::Down => "down",
                CameraPosition::Left => "left",
                CameraPosition::Right => "right",
                CameraPosition::Rear => "rear",
                CameraPosition::Top => "top",
            };
            Camera {
                id: format!("{}-cam-{}", vehicle_id, suffix),
                label: label.to_string(),
                position,
                stream_url: None,
                privacy_shield_enabled: true,
                recording: position == CameraPosition::Down,
                status: CameraStatus::Online,
            }
        })
        .collect()
}

fn seed_vehicle(index: usize) -> Vehicle {
    let id = format_vehicle_id(index);
    let status = STATUS_ROTATION[(index - 1) % STATUS_ROTATION.len()];
    let operational_state = operational_state_for(status);
    let loaded = index % 5 != 0;
    let moving = operational_state == OperationalState::Moving;
    let now = Utc::now();

    let payload = loaded.then(|| Payload {
        id: format!("FOUP-{:03}", 100 + index * 7),
        kind: PayloadKind::Foup,
        wafer_count: Some(25),
        lot_id: Some(format!("LOT-2024-{:04}", 1000 + index * 13)),
    });

    let current_task = moving.then(|| TransportTask {
        id: format!("TASK-{:04}", 1000 + index * 11),
        from: Some(format!("ETCH-{}", 1 + index % 8)),
        to: Some(format!("LITH-{}", 1 + index % 6)),
        priority: if index % 3 == 0 {
            TaskPriority::High
        } else {
            TaskPriority::Normal
        },
        status: TaskStatus::InProgress,
    });

    Vehicle {
        name: format!("Hoist Unit {:02}", index),
        status,
        operational_state,
        position: Position {
            track_id: format!("TRACK-{}", 1 + index % 3),
            section_id: format!("SEC-{:02}", 1 + index % 8),
            offset: (index as f64 * 3.7) % 50.0,
            bay: Some(format!("BAY-{:02}", 1 + index % 24)),
        },
        telemetry: Telemetry {
            speed: if moving { 1.5 } else { 0.0 },
            motor_temperature: if status == FleetStatus::Warning {
                78.0
            } else {
                52.0
            },
            battery_level: 100.0 - (index as f64 * 4.0) % 55.0,
            gripper_status: if loaded {
                GripperStatus::Engaged
            } else {
                GripperStatus::Disengaged
            },
            load_status: if loaded {
                LoadStatus::Loaded
            } else {
                LoadStatus::Empty
            },
            payload_weight: loaded.then_some(3.4),
        },
        safety: SafetyStatus {
            estop_active: status == FleetStatus::Critical,
            collision_sensor_triggered: false,
            zone_occupancy: ZoneOccupancy::Clear,
            connection_status: ConnectionStatus::Connected,
            last_heartbeat: now,
        },
        payload,
        current_task,
        task_queue: Vec::new(),
        cameras: cameras_for(&id),
        last_updated: now,
        id,
    }
}

/// Seed `count` vehicles, OHT-01 upward.
pub fn seed_fleet(count: usize) -> Vec<Vehicle> {
    (1..=count).map(seed_vehicle).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_fleet_ids_and_cameras() {
        let fleet = seed_fleet(12);
        assert_eq!(fleet.len(), 12);
        assert_eq!(fleet[0].id, "OHT-01");
        assert_eq!(fleet[11].id, "OHT-12");
        for vehicle in &fleet {
            assert_eq!(vehicle.cameras.len(), 6);
        }
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = seed_fleet(5);
        let b = seed_fleet(5);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.status, y.status);
            assert_eq!(x.payload.is_some(), y.payload.is_some());
        }
    }

    #[test]
    fn test_critical_vehicle_has_estop_active() {
        let fleet = seed_fleet(7);
        let critical = fleet
            .iter()
            .find(|v| v.status == FleetStatus::Critical)
            .expect("rotation includes a critical vehicle");
        assert!(critical.safety.estop_active);
        assert_eq!(critical.operational_state, OperationalState::EStopped);
    }
}
