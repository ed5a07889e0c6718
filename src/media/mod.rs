pub mod session;
pub mod signaling;
pub mod transport;

use serde::{Deserialize, Serialize};

use crate::models::vehicle::CameraPosition;

/// Connection lifecycle of one live media session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    Disconnected,
    Failed,
}

/// Map a camera position to its media-server stream name. Positions without
/// a dedicated stream fall back to the position name.
pub fn stream_name_for(position: CameraPosition) -> &'static str {
    match position {
        CameraPosition::Front => "cam1",
        CameraPosition::Rear => "cam2",
        CameraPosition::Down => "cam3",
        CameraPosition::Left => "left",
        CameraPosition::Right => "right",
        CameraPosition::Top => "top",
    }
}

pub use session::MediaSession;
pub use signaling::{SignalingExchange, WhepSignaling};
pub use transport::{MediaTransport, SimulatedTransportFactory, TransportEvent, TransportFactory};
