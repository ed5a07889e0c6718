use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tokio::sync::broadcast;

/// Connection-level signals surfaced by a transport after the answer is
/// applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    Failed(String),
}

/// One receive-only media transport. A session owns at most one live
/// transport at a time and must close it on every teardown path.
#[async_trait]
pub trait MediaTransport: Send + Sync {
    /// Produce the local SDP offer, gathering complete.
    async fn create_offer(&self) -> anyhow::Result<String>;

    /// Apply the remote answer, arming the connection.
    async fn apply_answer(&self, answer_sdp: &str) -> anyhow::Result<()>;

    /// Connection-level event stream.
    fn events(&self) -> broadcast::Receiver<TransportEvent>;

    /// Release the underlying connection. Idempotent.
    async fn close(&self);
}

pub trait TransportFactory: Send + Sync {
    fn create(&self) -> Arc<dyn MediaTransport>;
}

/// In-process transport standing in for a WebRTC peer connection, in the
/// same spirit as the reference deployment's mock stream endpoints. Reports
/// connected as soon as an answer is applied; tests script disconnects and
/// failures through [`SimulatedTransport::emit`].
pub struct SimulatedTransport {
    events: broadcast::Sender<TransportEvent>,
    closed: AtomicBool,
}

impl SimulatedTransport {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            events,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Inject a connection-level event, as the underlying stack would.
    pub fn emit(&self, event: TransportEvent) {
        let _ = self.events.send(event);
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaTransport for SimulatedTransport {
    async fn create_offer(&self) -> anyhow::Result<String> {
        if self.closed.load(Ordering::SeqCst) {
            anyhow::bail!("transport is closed");
        }
        Ok(concat!(
            "v=0\r\n",
            "o=- 0 0 IN IP4 0.0.0.0\r\n",
            "s=-\r\n",
            "t=0 0\r\n",
            "m=video 9 UDP/TLS/RTP/SAVPF 96\r\n",
            "a=recvonly\r\n",
        )
        .to_string())
    }

    async fn apply_answer(&self, answer_sdp: &str) -> anyhow::Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            anyhow::bail!("transport is closed");
        }
        if answer_sdp.trim().is_empty() {
            anyhow::bail!("empty SDP answer");
        }
        self.emit(TransportEvent::Connected);
        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<TransportEvent> {
        self.events.subscribe()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Factory for [`SimulatedTransport`], keeping handles to every transport it
/// has created so tests can script events and assert release discipline.
#[derive(Clone, Default)]
pub struct SimulatedTransportFactory {
    created: Arc<Mutex<Vec<Arc<SimulatedTransport>>>>,
}

impl SimulatedTransportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<Arc<SimulatedTransport>> {
        self.created.lock().expect("factory lock poisoned").clone()
    }
}

impl TransportFactory for SimulatedTransportFactory {
    fn create(&self) -> Arc<dyn MediaTransport> {
        let transport = Arc::new(SimulatedTransport::new());
        self.created
            .lock()
            .expect("factory lock poisoned")
            .push(transport.clone());
        transport
    }
}
