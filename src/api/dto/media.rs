use serde::Serialize;

use crate::media::ConnectionState;
use crate::services::CameraSessionInfo;

#[derive(Debug, Serialize)]
pub struct CameraSessionResponse {
    pub camera_id: String,
    pub vehicle_id: String,
    pub url: String,
    pub state: ConnectionState,
    pub enabled: bool,
    pub last_error: Option<String>,
}

impl From<CameraSessionInfo> for CameraSessionResponse {
    fn from(info: CameraSessionInfo) -> Self {
        Self {
            camera_id: info.camera_id,
            vehicle_id: info.vehicle_id,
            url: info.url,
            state: info.state,
            enabled: info.enabled,
            last_error: info.last_error,
        }
    }
}
