pub mod fleet_service;
pub mod media_service;
pub mod sequence_service;

pub use fleet_service::FleetService;
pub use media_service::{CameraSessionInfo, MediaService};
pub use sequence_service::SequenceService;
