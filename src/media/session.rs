use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;

use super::ConnectionState;
use super::signaling::SignalingExchange;
use super::transport::{MediaTransport, TransportEvent, TransportFactory};

const STATE_CHANNEL_CAPACITY: usize = 64;

struct SessionShared {
    state: ConnectionState,
    last_error: Option<String>,
    enabled: bool,
    /// Bumped by every connect, disconnect and disable. Reconnect timers,
    /// event pumps and in-flight attempts carry the epoch they started
    /// under and stand down on mismatch, so a stale timer can never revive
    /// a torn-down session.
    epoch: u64,
    transport: Option<Arc<dyn MediaTransport>>,
}

struct SessionInner {
    url: String,
    shared: Mutex<SessionShared>,
    signaling: Arc<dyn SignalingExchange>,
    factory: Arc<dyn TransportFactory>,
    signaling_timeout: Duration,
    reconnect_interval: Duration,
    events: broadcast::Sender<ConnectionState>,
}

/// Lifecycle manager for one live inbound video connection: signaling
/// handshake under a hard deadline, connection tracking, and fixed-interval
/// automatic reconnection for as long as the session stays enabled.
///
/// Owns at most one transport handle at a time; every exit path (attempt
/// failure, supersession, explicit disconnect, disable) releases it.
#[derive(Clone)]
pub struct MediaSession {
    inner: Arc<SessionInner>,
}

impl MediaSession {
    pub fn new(
        url: String,
        signaling: Arc<dyn SignalingExchange>,
        factory: Arc<dyn TransportFactory>,
        signaling_timeout: Duration,
        reconnect_interval: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                url,
                shared: Mutex::new(SessionShared {
                    state: ConnectionState::Idle,
                    last_error: None,
                    enabled: false,
                    epoch: 0,
                    transport: None,
                }),
                signaling,
                factory,
                signaling_timeout,
                reconnect_interval,
                events,
            }),
        }
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.shared.lock().expect("session lock poisoned").state
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner
            .shared
            .lock()
            .expect("session lock poisoned")
            .last_error
            .clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner
            .shared
            .lock()
            .expect("session lock poisoned")
            .enabled
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionState> {
        self.inner.events.subscribe()
    }

    /// Mark the session wanted and begin connecting.
    pub fn enable(&self) {
        self.inner
            .shared
            .lock()
            .expect("session lock poisoned")
            .enabled = true;
        self.connect();
    }

    /// Mark the session unwanted: tear down the transport, go idle, and
    /// suppress any pending auto-reconnect.
    pub fn disable(&self) {
        let transport = self.inner.teardown(true);
        if let Some(transport) = transport {
            tokio::spawn(async move { transport.close().await });
        }
    }

    /// Begin a connection attempt in the background. A no-op while the
    /// session is disabled.
    pub fn connect(&self) {
        let inner = self.inner.clone();
        tokio::spawn(async move { inner.run_connect().await });
    }

    /// Explicit teardown to idle. Cancels any pending auto-reconnect; the
    /// session stays enabled and can be connected again on demand.
    pub fn disconnect(&self) {
        let transport = self.inner.teardown(false);
        if let Some(transport) = transport {
            tokio::spawn(async move { transport.close().await });
        }
    }

    /// Disconnect then connect, as one operation.
    pub fn reconnect(&self) {
        self.disconnect();
        self.connect();
    }
}

impl SessionInner {
    fn set_state(shared: &mut SessionShared, events: &broadcast::Sender<ConnectionState>, state: ConnectionState) {
        shared.state = state;
        let _ = events.send(state);
    }

    /// Invalidate all outstanding work and go idle, handing the transport
    /// back to the caller for async release.
    fn teardown(&self, disable: bool) -> Option<Arc<dyn MediaTransport>> {
        let mut shared = self.shared.lock().expect("session lock poisoned");
        shared.epoch += 1;
        if disable {
            shared.enabled = false;
        }
        shared.last_error = None;
        Self::set_state(&mut shared, &self.events, ConnectionState::Idle);
        shared.transport.take()
    }

    async fn run_connect(self: Arc<Self>) {
        // Idempotent cleanup of whatever came before this attempt.
        let (epoch, old_transport) = {
            let mut shared = self.shared.lock().expect("session lock poisoned");
            if !shared.enabled {
                return;
            }
            shared.epoch += 1;
            let old = shared.transport.take();
            shared.last_error = None;
            Self::set_state(&mut shared, &self.events, ConnectionState::Connecting);
            (shared.epoch, old)
        };
        if let Some(transport) = old_transport {
            transport.close().await;
        }

        tracing::debug!(url = %self.url, "media session connecting");

        let transport = self.factory.create();

        let offer = match transport.create_offer().await {
            Ok(offer) => offer,
            Err(err) => {
                return self.fail_attempt(epoch, transport, err.to_string()).await;
            }
        };

        // Hard deadline on the signaling round trip; a late answer is
        // dropped with the future.
        let exchange = self.signaling.exchange(&self.url, &offer);
        let answer = match tokio::time::timeout(self.signaling_timeout, exchange).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(err)) => {
                return self.fail_attempt(epoch, transport, err.to_string()).await;
            }
            Err(_) => {
                return self
                    .fail_attempt(epoch, transport, "Connection timed out".to_string())
                    .await;
            }
        };

        // Subscribe before arming the connection so the first event cannot
        // be missed.
        let mut transport_events = transport.events();

        if let Err(err) = transport.apply_answer(&answer).await {
            return self.fail_attempt(epoch, transport, err.to_string()).await;
        }

        let superseded = {
            let mut shared = self.shared.lock().expect("session lock poisoned");
            if shared.epoch != epoch || !shared.enabled {
                true
            } else {
                shared.transport = Some(transport.clone());
                false
            }
        };
        if superseded {
            transport.close().await;
            return;
        }

        // Pump connection-level events into session state until this
        // attempt is superseded.
        loop {
            let event = match transport_events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            };

            let schedule = {
                let mut shared = self.shared.lock().expect("session lock poisoned");
                if shared.epoch != epoch {
                    break;
                }
                match event {
                    TransportEvent::Connected => {
                        Self::set_state(&mut shared, &self.events, ConnectionState::Connected);
                        false
                    }
                    TransportEvent::Disconnected => {
                        Self::set_state(&mut shared, &self.events, ConnectionState::Disconnected);
                        shared.enabled
                    }
                    TransportEvent::Failed(message) => {
                        shared.last_error = Some(message);
                        Self::set_state(&mut shared, &self.events, ConnectionState::Failed);
                        shared.enabled
                    }
                }
            };

            if schedule {
                self.clone().schedule_reconnect(epoch);
            }
        }
    }

    async fn fail_attempt(self: Arc<Self>, epoch: u64, transport: Arc<dyn MediaTransport>, message: String) {
        transport.close().await;

        let schedule = {
            let mut shared = self.shared.lock().expect("session lock poisoned");
            if shared.epoch != epoch {
                return;
            }
            shared.last_error = Some(message.clone());
            Self::set_state(&mut shared, &self.events, ConnectionState::Failed);
            shared.enabled
        };

        tracing::warn!(url = %self.url, error = %message, "media session attempt failed");

        if schedule {
            self.schedule_reconnect(epoch);
        }
    }

    fn schedule_reconnect(self: Arc<Self>, epoch: u64) {
        let inner = self;
        tokio::spawn(async move {
            tokio::time::sleep(inner.reconnect_interval).await;
            let still_wanted = {
                let shared = inner.shared.lock().expect("session lock poisoned");
                shared.epoch == epoch
                    && shared.enabled
                    && matches!(
                        shared.state,
                        ConnectionState::Disconnected | ConnectionState::Failed
                    )
            };
            if still_wanted {
                inner.run_connect().await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::media::transport::SimulatedTransportFactory;

    enum SignalBehavior {
        Answer,
        Fail(String),
        Hang,
    }

    struct MockSignaling {
        script: Mutex<VecDeque<SignalBehavior>>,
        fallback: SignalBehavior,
        attempts: AtomicUsize,
    }

    impl MockSignaling {
        fn always(fallback: SignalBehavior) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(VecDeque::new()),
                fallback,
                attempts: AtomicUsize::new(0),
            })
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SignalingExchange for MockSignaling {
        async fn exchange(&self, _url: &str, _offer_sdp: &str) -> anyhow::Result<String> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let behavior = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| match &self.fallback {
                    SignalBehavior::Answer => SignalBehavior::Answer,
                    SignalBehavior::Fail(m) => SignalBehavior::Fail(m.clone()),
                    SignalBehavior::Hang => SignalBehavior::Hang,
                });
            match behavior {
                SignalBehavior::Answer => Ok("v=0\r\na=sendonly\r\n".to_string()),
                SignalBehavior::Fail(message) => anyhow::bail!(message),
                SignalBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    anyhow::bail!("hung exchange resolved late")
                }
            }
        }
    }

    fn session_with(
        signaling: Arc<MockSignaling>,
    ) -> (MediaSession, SimulatedTransportFactory) {
        let factory = SimulatedTransportFactory::new();
        let session = MediaSession::new(
            "http://media.local/cam1/whep".to_string(),
            signaling,
            Arc::new(factory.clone()),
            Duration::from_secs(10),
            Duration::from_secs(5),
        );
        (session, factory)
    }

    async fn next_state(rx: &mut broadcast::Receiver<ConnectionState>) -> ConnectionState {
        tokio::time::timeout(Duration::from_secs(120), rx.recv())
            .await
            .expect("timed out waiting for state change")
            .expect("state channel closed")
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_reaches_connected() {
        let signaling = MockSignaling::always(SignalBehavior::Answer);
        let (session, factory) = session_with(signaling.clone());
        let mut rx = session.subscribe();

        session.enable();
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connecting);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connected);

        assert_eq!(session.state(), ConnectionState::Connected);
        assert!(session.last_error().is_none());
        assert_eq!(signaling.attempts(), 1);
        assert_eq!(factory.created().len(), 1);
        assert!(!factory.created()[0].is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_then_retries_until_disconnect() {
        let signaling = MockSignaling::always(SignalBehavior::Hang);
        let (session, _factory) = session_with(signaling.clone());
        let mut rx = session.subscribe();

        session.enable();

        // First attempt: deadline expires.
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connecting);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Failed);
        assert_eq!(
            session.last_error().as_deref(),
            Some("Connection timed out")
        );

        // Auto-reconnect at the fixed interval, indefinitely.
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connecting);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Failed);
        assert!(signaling.attempts() >= 2);

        // Intentional teardown stops the retry loop.
        session.disconnect();
        assert_eq!(next_state(&mut rx).await, ConnectionState::Idle);

        let attempts = signaling.attempts();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(signaling.attempts(), attempts);
        assert_eq!(session.state(), ConnectionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signaling_rejection_records_error() {
        let signaling = MockSignaling::always(SignalBehavior::Fail(
            "WHEP request failed: 500 Internal Server Error".to_string(),
        ));
        let (session, factory) = session_with(signaling);
        let mut rx = session.subscribe();

        session.enable();
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connecting);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Failed);
        assert!(session.last_error().unwrap().contains("500"));

        // The attempt's transport was released on the failure path.
        assert!(factory.created()[0].is_closed());
        session.disable();
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_drop_triggers_auto_reconnect() {
        let signaling = MockSignaling::always(SignalBehavior::Answer);
        let (session, factory) = session_with(signaling.clone());
        let mut rx = session.subscribe();

        session.enable();
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connecting);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connected);

        factory.created()[0].emit(TransportEvent::Disconnected);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Disconnected);

        // Fresh attempt after the interval, on a fresh transport; the old
        // handle is released by the new attempt's cleanup.
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connecting);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connected);
        assert_eq!(signaling.attempts(), 2);
        assert_eq!(factory.created().len(), 2);
        assert!(factory.created()[0].is_closed());
        assert!(!factory.created()[1].is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_records_error() {
        let signaling = MockSignaling::always(SignalBehavior::Answer);
        let (session, factory) = session_with(signaling);
        let mut rx = session.subscribe();

        session.enable();
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connecting);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connected);

        factory.created()[0].emit(TransportEvent::Failed("ICE connection failed".to_string()));
        assert_eq!(next_state(&mut rx).await, ConnectionState::Failed);
        assert_eq!(
            session.last_error().as_deref(),
            Some("ICE connection failed")
        );
        session.disable();
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_closes_transport_and_stops_retry() {
        let signaling = MockSignaling::always(SignalBehavior::Answer);
        let (session, factory) = session_with(signaling.clone());
        let mut rx = session.subscribe();

        session.enable();
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connecting);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connected);

        session.disable();
        assert_eq!(next_state(&mut rx).await, ConnectionState::Idle);
        assert!(!session.is_enabled());

        // Spawned close runs once we yield.
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(factory.created()[0].is_closed());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(signaling.attempts(), 1);
        assert_eq!(session.state(), ConnectionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_while_disabled_is_noop() {
        let signaling = MockSignaling::always(SignalBehavior::Answer);
        let (session, factory) = session_with(signaling.clone());

        session.connect();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(session.state(), ConnectionState::Idle);
        assert_eq!(signaling.attempts(), 0);
        assert!(factory.created().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnect_replaces_transport() {
        let signaling = MockSignaling::always(SignalBehavior::Answer);
        let (session, factory) = session_with(signaling.clone());
        let mut rx = session.subscribe();

        session.enable();
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connecting);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connected);

        session.reconnect();
        assert_eq!(next_state(&mut rx).await, ConnectionState::Idle);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connecting);
        assert_eq!(next_state(&mut rx).await, ConnectionState::Connected);

        assert_eq!(signaling.attempts(), 2);
        assert_eq!(factory.created().len(), 2);
        assert!(factory.created()[0].is_closed());
    }
}
