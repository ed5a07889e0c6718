use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FleetStatus {
    Active,
    Idle,
    Warning,
    Critical,
    Maintenance,
    Offline,
}

impl std::str::FromStr for FleetStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(FleetStatus::Active),
            "idle" => Ok(FleetStatus::Idle),
            "warning" => Ok(FleetStatus::Warning),
            "critical" => Ok(FleetStatus::Critical),
            "maintenance" => Ok(FleetStatus::Maintenance),
            "offline" => Ok(FleetStatus::Offline),
            other => Err(format!("unknown fleet status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationalState {
    Idle,
    Moving,
    Loading,
    Unloading,
    Error,
    Maintenance,
    EStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GripperStatus {
    Engaged,
    Disengaged,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadStatus {
    Empty,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneOccupancy {
    Clear,
    Warning,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionStatus {
    Connected,
    Degraded,
    Lost,
}

/// Operator-issued control command, as accepted by the vehicle control API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlCommand {
    Estop,
    Pause,
    Resume,
    Reset,
    Home,
    ManualForward,
    ManualReverse,
    ManualStop,
    GripperOpen,
    GripperClose,
}

impl ControlCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlCommand::Estop => "estop",
            ControlCommand::Pause => "pause",
            ControlCommand::Resume => "resume",
            ControlCommand::Reset => "reset",
            ControlCommand::Home => "home",
            ControlCommand::ManualForward => "manual-forward",
            ControlCommand::ManualReverse => "manual-reverse",
            ControlCommand::ManualStop => "manual-stop",
            ControlCommand::GripperOpen => "gripper-open",
            ControlCommand::GripperClose => "gripper-close",
        }
    }
}

impl std::fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub track_id: String,
    pub section_id: String,
    /// Meters from section start.
    pub offset: f64,
    pub bay: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Telemetry {
    /// m/s
    pub speed: f64,
    /// Celsius
    pub motor_temperature: f64,
    /// 0-100
    pub battery_level: f64,
    pub gripper_status: GripperStatus,
    pub load_status: LoadStatus,
    /// kg
    pub payload_weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyStatus {
    pub estop_active: bool,
    pub collision_sensor_triggered: bool,
    pub zone_occupancy: ZoneOccupancy,
    pub connection_status: ConnectionStatus,
    pub last_heartbeat: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayloadKind {
    Foup,
    Smif,
    #[serde(rename = "other")]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payload {
    pub id: String,
    pub kind: PayloadKind,
    pub wafer_count: Option<u32>,
    pub lot_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    Normal,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportTask {
    pub id: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraPosition {
    Front,
    Down,
    Left,
    Right,
    Rear,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraStatus {
    Online,
    Offline,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub id: String,
    pub label: String,
    pub position: CameraPosition,
    pub stream_url: Option<String>,
    pub privacy_shield_enabled: bool,
    pub recording: bool,
    pub status: CameraStatus,
}

/// Point-in-time snapshot of one OHT vehicle as reported by the fleet
/// telemetry source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub status: FleetStatus,
    pub operational_state: OperationalState,
    pub position: Position,
    pub telemetry: Telemetry,
    pub safety: SafetyStatus,
    pub payload: Option<Payload>,
    pub current_task: Option<TransportTask>,
    pub task_queue: Vec<TransportTask>,
    pub cameras: Vec<Camera>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total: usize,
    pub active: usize,
    pub idle: usize,
    pub warning: usize,
    pub critical: usize,
    pub offline: usize,
}
