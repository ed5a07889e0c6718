use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::media::{ConnectionState, MediaSession, SignalingExchange, TransportFactory, stream_name_for};
use crate::store::FleetStore;

/// Snapshot of one camera's media session for API consumers.
#[derive(Debug, Clone, Serialize)]
pub struct CameraSessionInfo {
    pub camera_id: String,
    pub vehicle_id: String,
    pub url: String,
    pub state: ConnectionState,
    pub enabled: bool,
    pub last_error: Option<String>,
}

/// Owns one media session per enabled camera. Sessions are created lazily
/// on first enable and are fully independent of each other.
#[derive(Clone)]
pub struct MediaService {
    fleet: FleetStore,
    signaling: Arc<dyn SignalingExchange>,
    factory: Arc<dyn TransportFactory>,
    sessions: Arc<Mutex<HashMap<String, MediaSession>>>,
    config: Config,
    signaling_timeout: Duration,
    reconnect_interval: Duration,
}

impl MediaService {
    pub fn new(
        fleet: FleetStore,
        signaling: Arc<dyn SignalingExchange>,
        factory: Arc<dyn TransportFactory>,
        config: &Config,
    ) -> Self {
        Self {
            fleet,
            signaling,
            factory,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            signaling_timeout: Duration::from_millis(config.signaling_timeout_ms),
            reconnect_interval: Duration::from_millis(config.reconnect_interval_ms),
            config: config.clone(),
        }
    }

    fn info(&self, camera_id: &str, vehicle_id: &str, session: &MediaSession) -> CameraSessionInfo {
        CameraSessionInfo {
            camera_id: camera_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            url: session.url().to_string(),
            state: session.state(),
            enabled: session.is_enabled(),
            last_error: session.last_error(),
        }
    }

    /// Enable the camera's session, creating it on first use, and begin
    /// connecting.
    pub fn enable(&self, camera_id: &str) -> Result<CameraSessionInfo> {
        let (vehicle_id, camera) = self.fleet.find_camera(camera_id)?;

        let session = {
            let mut sessions = self.sessions.lock().expect("media sessions lock poisoned");
            sessions
                .entry(camera_id.to_string())
                .or_insert_with(|| {
                    let url = self.config.whep_url(stream_name_for(camera.position));
                    MediaSession::new(
                        url,
                        self.signaling.clone(),
                        self.factory.clone(),
                        self.signaling_timeout,
                        self.reconnect_interval,
                    )
                })
                .clone()
        };

        session.enable();
        tracing::info!(camera_id = %camera_id, vehicle_id = %vehicle_id, "camera session enabled");
        Ok(self.info(camera_id, &vehicle_id, &session))
    }

    /// Disable the camera's session: tear down the transport and suppress
    /// reconnects. A camera without a session reads as idle.
    pub fn disable(&self, camera_id: &str) -> Result<CameraSessionInfo> {
        let (vehicle_id, _camera) = self.fleet.find_camera(camera_id)?;

        let session = self
            .sessions
            .lock()
            .expect("media sessions lock poisoned")
            .get(camera_id)
            .cloned();

        match session {
            Some(session) => {
                session.disable();
                tracing::info!(camera_id = %camera_id, "camera session disabled");
                Ok(self.info(camera_id, &vehicle_id, &session))
            }
            None => Ok(CameraSessionInfo {
                camera_id: camera_id.to_string(),
                vehicle_id,
                url: String::new(),
                state: ConnectionState::Idle,
                enabled: false,
                last_error: None,
            }),
        }
    }

    pub fn status(&self, camera_id: &str) -> Result<CameraSessionInfo> {
        let (vehicle_id, _camera) = self.fleet.find_camera(camera_id)?;

        let session = self
            .sessions
            .lock()
            .expect("media sessions lock poisoned")
            .get(camera_id)
            .cloned();

        match session {
            Some(session) => Ok(self.info(camera_id, &vehicle_id, &session)),
            None => Ok(CameraSessionInfo {
                camera_id: camera_id.to_string(),
                vehicle_id,
                url: String::new(),
                state: ConnectionState::Idle,
                enabled: false,
                last_error: None,
            }),
        }
    }
}
