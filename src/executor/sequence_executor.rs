use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Notify, broadcast};

use super::CommandSender;
use crate::error::{AppError, Result};
use crate::models::execution::{ExecutionEvent, ExecutionStatus, SequenceExecution, StepStatus};
use crate::models::sequence::CommandSequence;
use crate::store::HistoryStore;

const EVENT_CHANNEL_CAPACITY: usize = 256;

struct ExecutorState {
    current: Option<SequenceExecution>,
    /// Bumped on every start and reset. A driver task carries the
    /// generation it was spawned with and stops at the first mismatch, so
    /// a stale settle timer or a late command resolution can never mutate
    /// a newer execution.
    generation: u64,
}

struct ExecutorInner {
    state: Mutex<ExecutorState>,
    events: broadcast::Sender<ExecutionEvent>,
    cancel: Notify,
    sender: Arc<dyn CommandSender>,
    history: HistoryStore,
}

/// Drives one command sequence to completion against one vehicle, step by
/// step, in declared order. Holds at most one execution at a time; `reset`
/// must run before the next `start`. All failures during a run are captured
/// as status transitions, never surfaced as errors from the driver.
#[derive(Clone)]
pub struct SequenceExecutor {
    inner: Arc<ExecutorInner>,
}

impl SequenceExecutor {
    pub fn new(sender: Arc<dyn CommandSender>, history: HistoryStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(ExecutorInner {
                state: Mutex::new(ExecutorState {
                    current: None,
                    generation: 0,
                }),
                events,
                cancel: Notify::new(),
                sender,
                history,
            }),
        }
    }

    /// Begin executing `sequence` against `vehicle_id`. Rejected while an
    /// execution record exists (single-flight); the in-flight record is
    /// left untouched.
    pub fn start(&self, sequence: &CommandSequence, vehicle_id: &str) -> Result<SequenceExecution> {
        let generation;
        let snapshot;
        {
            let mut state = self.inner.state.lock().expect("executor lock poisoned");
            if state.current.is_some() {
                return Err(AppError::ExecutionInProgress);
            }

            state.generation += 1;
            generation = state.generation;

            let execution = SequenceExecution::new(sequence, vehicle_id);
            snapshot = execution.clone();
            let _ = self.inner.events.send(ExecutionEvent::Started {
                execution_id: execution.id,
                sequence_id: execution.sequence_id.clone(),
                vehicle_id: execution.vehicle_id.clone(),
            });
            state.current = Some(execution);
        }

        tracing::info!(
            sequence_id = %sequence.id,
            vehicle_id = %vehicle_id,
            steps = sequence.steps.len(),
            "starting sequence execution"
        );

        let inner = self.inner.clone();
        let sequence = sequence.clone();
        let vehicle_id = vehicle_id.to_string();
        tokio::spawn(async move {
            inner.drive(sequence, vehicle_id, generation).await;
        });

        Ok(snapshot)
    }

    /// Cancel the in-flight execution. Legal only while executing. In-flight
    /// step statuses are left as they are, and the command already handed to
    /// the sender is not retracted.
    pub fn cancel(&self) -> Result<SequenceExecution> {
        let snapshot = {
            let mut state = self.inner.state.lock().expect("executor lock poisoned");
            // Invalidate the driver before touching the record so a send
            // resolving right now cannot race the cancellation.
            state.generation += 1;
            let Some(execution) = state.current.as_mut().filter(|e| e.is_executing()) else {
                return Err(AppError::NoActiveExecution);
            };

            let finished_at = Utc::now();
            execution.status = ExecutionStatus::Cancelled;
            execution.completed_at = Some(finished_at);
            execution.error = Some("Execution cancelled".to_string());

            let result = execution.to_result(finished_at);
            self.inner.history.push(result.clone());
            let _ = self.inner.events.send(ExecutionEvent::Finished { result });
            execution.clone()
        };

        // Wake a pending settle delay so the driver observes the stale
        // generation immediately instead of at timer expiry.
        self.inner.cancel.notify_waiters();

        tracing::info!(
            sequence_id = %snapshot.sequence_id,
            vehicle_id = %snapshot.vehicle_id,
            "sequence execution cancelled"
        );
        Ok(snapshot)
    }

    /// Clear the execution record back to empty. Safe to call at any time,
    /// including mid-execution (an abandon, not a cancel: no terminal event
    /// fires for abandoned steps), and idempotent.
    pub fn reset(&self) {
        {
            let mut state = self.inner.state.lock().expect("executor lock poisoned");
            state.generation += 1;
            state.current = None;
        }
        self.inner.cancel.notify_waiters();
    }

    /// Read-only snapshot of the current execution, if any.
    pub fn snapshot(&self) -> Option<SequenceExecution> {
        self.inner
            .state
            .lock()
            .expect("executor lock poisoned")
            .current
            .clone()
    }

    /// Pull-style step status lookup. Reads as pending when no execution is
    /// active or the id is unknown, mirroring what a fresh run would show.
    pub fn step_status(&self, step_id: &str) -> StepStatus {
        self.inner
            .state
            .lock()
            .expect("executor lock poisoned")
            .current
            .as_ref()
            .map(|e| e.step_status(step_id))
            .unwrap_or(StepStatus::Pending)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExecutionEvent> {
        self.inner.events.subscribe()
    }
}

impl ExecutorInner {
    async fn drive(self: Arc<Self>, sequence: CommandSequence, vehicle_id: String, generation: u64) {
        let total = sequence.steps.len();

        for (index, step) in sequence.steps.iter().enumerate() {
            if !self.transition_step(generation, index, StepStatus::Executing, false) {
                return;
            }

            let send_result = self.sender.send(&vehicle_id, step.command).await;

            match send_result {
                Ok(()) => {
                    if !self.transition_step(generation, index, StepStatus::Completed, true) {
                        return;
                    }
                    if let Some(delay) = step.delay_after_ms {
                        if delay > 0 && index + 1 < total {
                            self.settle(delay).await;
                        }
                    }
                }
                Err(err) if step.skip_on_error => {
                    tracing::warn!(
                        sequence_id = %sequence.id,
                        step_id = %step.id,
                        error = %err,
                        "step failed, skipping"
                    );
                    // The skip path does not apply the settle delay.
                    if !self.transition_step(generation, index, StepStatus::Skipped, true) {
                        return;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        sequence_id = %sequence.id,
                        step_id = %step.id,
                        error = %err,
                        "step failed, aborting sequence"
                    );
                    self.finish_failed(generation, index, &step.label, err.to_string());
                    return;
                }
            }
        }

        self.finish_completed(generation, &sequence.id);
    }

    /// Suspend between steps. Woken early by cancel/reset; the caller's next
    /// generation check decides whether to proceed.
    async fn settle(&self, delay_ms: u64) {
        let sleep = tokio::time::sleep(Duration::from_millis(delay_ms));
        tokio::select! {
            _ = sleep => {}
            _ = self.cancel.notified() => {}
        }
    }

    /// Apply one step transition under the generation guard, emitting the
    /// status event synchronously with the change. Returns false when the
    /// driver is stale and must stop.
    fn transition_step(
        &self,
        generation: u64,
        index: usize,
        status: StepStatus,
        advance: bool,
    ) -> bool {
        let mut state = self.state.lock().expect("executor lock poisoned");
        if state.generation != generation {
            return false;
        }
        let Some(execution) = state.current.as_mut().filter(|e| e.is_executing()) else {
            return false;
        };

        if !execution.transition_step(index, status) {
            return false;
        }
        if advance {
            execution.current_step_index = index + 1;
        }

        let step_id = execution
            .step_id(index)
            .expect("step index in range")
            .to_string();
        let _ = self.events.send(ExecutionEvent::StepChanged {
            execution_id: execution.id,
            step_id,
            step_index: index,
            status,
        });
        true
    }

    fn finish_failed(&self, generation: u64, index: usize, step_label: &str, error: String) {
        let mut state = self.state.lock().expect("executor lock poisoned");
        if state.generation != generation {
            return;
        }
        let Some(execution) = state.current.as_mut().filter(|e| e.is_executing()) else {
            return;
        };

        if !execution.transition_step(index, StepStatus::Failed) {
            return;
        }
        let step_id = execution
            .step_id(index)
            .expect("step index in range")
            .to_string();
        let _ = self.events.send(ExecutionEvent::StepChanged {
            execution_id: execution.id,
            step_id,
            step_index: index,
            status: StepStatus::Failed,
        });

        let finished_at = Utc::now();
        execution.status = ExecutionStatus::Failed;
        execution.completed_at = Some(finished_at);
        execution.error = Some(format!("Step \"{}\" failed: {}", step_label, error));

        let result = execution.to_result(finished_at);
        self.history.push(result.clone());
        let _ = self.events.send(ExecutionEvent::Finished { result });
    }

    fn finish_completed(&self, generation: u64, sequence_id: &str) {
        let mut state = self.state.lock().expect("executor lock poisoned");
        if state.generation != generation {
            return;
        }
        let Some(execution) = state.current.as_mut().filter(|e| e.is_executing()) else {
            return;
        };

        let finished_at = Utc::now();
        execution.status = ExecutionStatus::Completed;
        execution.completed_at = Some(finished_at);

        let result = execution.to_result(finished_at);
        self.history.push(result.clone());
        let _ = self.events.send(ExecutionEvent::Finished { result });

        tracing::info!(sequence_id = %sequence_id, "sequence execution completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sequence::{CommandStep, SequenceCategory, SequenceSeverity};
    use crate::models::vehicle::ControlCommand;
    use async_trait::async_trait;
    use std::collections::HashSet;

    struct MockSender {
        calls: Mutex<Vec<(ControlCommand, tokio::time::Instant)>>,
        fail_commands: HashSet<ControlCommand>,
        latency: Option<Duration>,
    }

    impl MockSender {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_commands: HashSet::new(),
                latency: None,
            }
        }

        fn failing_on(commands: &[ControlCommand]) -> Self {
            Self {
                fail_commands: commands.iter().copied().collect(),
                ..Self::new()
            }
        }

        fn with_latency(latency: Duration) -> Self {
            Self {
                latency: Some(latency),
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<(ControlCommand, tokio::time::Instant)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandSender for MockSender {
        async fn send(&self, _vehicle_id: &str, command: ControlCommand) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((command, tokio::time::Instant::now()));
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            if self.fail_commands.contains(&command) {
                anyhow::bail!("command rejected: {}", command);
            }
            Ok(())
        }
    }

    fn make_step(id: &str, command: ControlCommand, delay_after_ms: Option<u64>, skip: bool) -> CommandStep {
        CommandStep {
            id: id.to_string(),
            command,
            label: id.to_string(),
            description: None,
            delay_after_ms,
            skip_on_error: skip,
            expected_duration_ms: None,
        }
    }

    fn make_sequence(steps: Vec<CommandStep>) -> CommandSequence {
        CommandSequence {
            id: "test-seq".to_string(),
            name: "Test Sequence".to_string(),
            description: String::new(),
            category: SequenceCategory::Diagnostic,
            severity: SequenceSeverity::Low,
            steps,
            estimated_duration_ms: 0,
            warning_message: None,
            preconditions: None,
        }
    }

    fn executor_with(sender: MockSender) -> (SequenceExecutor, HistoryStore) {
        let history = HistoryStore::new(50);
        let executor = SequenceExecutor::new(Arc::new(sender), history.clone());
        (executor, history)
    }

    async fn collect_until_finished(
        rx: &mut broadcast::Receiver<ExecutionEvent>,
    ) -> Vec<ExecutionEvent> {
        let mut events = Vec::new();
        loop {
            let event = tokio::time::timeout(Duration::from_secs(60), rx.recv())
                .await
                .expect("timed out waiting for events")
                .expect("event channel closed");
            let finished = matches!(event, ExecutionEvent::Finished { .. });
            events.push(event);
            if finished {
                break;
            }
        }
        events
    }

    fn step_events(events: &[ExecutionEvent]) -> Vec<(String, StepStatus)> {
        events
            .iter()
            .filter_map(|e| match e {
                ExecutionEvent::StepChanged {
                    step_id, status, ..
                } => Some((step_id.clone(), *status)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_all_steps_complete() {
        let (executor, history) = executor_with(MockSender::new());
        let sequence = make_sequence(vec![
            make_step("a", ControlCommand::Pause, None, false),
            make_step("b", ControlCommand::GripperOpen, None, false),
            make_step("c", ControlCommand::Resume, None, false),
        ]);

        let mut rx = executor.subscribe();
        executor.start(&sequence, "OHT-01").unwrap();
        let events = collect_until_finished(&mut rx).await;

        let snapshot = executor.snapshot().unwrap();
        assert_eq!(snapshot.status, ExecutionStatus::Completed);
        for id in ["a", "b", "c"] {
            assert_eq!(snapshot.step_status(id), StepStatus::Completed);
        }

        let ExecutionEvent::Finished { result } = events.last().unwrap() else {
            panic!("expected finished event");
        };
        assert!(result.success);
        assert_eq!(result.completed_steps, 3);
        assert_eq!(result.total_steps, 3);
        assert_eq!(history.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_skip_on_error_continues() {
        let (executor, _history) =
            executor_with(MockSender::failing_on(&[ControlCommand::GripperOpen]));
        let sequence = make_sequence(vec![
            make_step("a", ControlCommand::Pause, None, false),
            make_step("b", ControlCommand::GripperOpen, None, true),
            make_step("c", ControlCommand::Resume, None, false),
        ]);

        let mut rx = executor.subscribe();
        executor.start(&sequence, "OHT-01").unwrap();
        let events = collect_until_finished(&mut rx).await;

        let snapshot = executor.snapshot().unwrap();
        assert_eq!(snapshot.status, ExecutionStatus::Completed);
        assert_eq!(snapshot.step_status("a"), StepStatus::Completed);
        assert_eq!(snapshot.step_status("b"), StepStatus::Skipped);
        assert_eq!(snapshot.step_status("c"), StepStatus::Completed);

        let ExecutionEvent::Finished { result } = events.last().unwrap() else {
            panic!("expected finished event");
        };
        assert!(result.success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_hard_failure_freezes_rest() {
        let (executor, history) =
            executor_with(MockSender::failing_on(&[ControlCommand::GripperOpen]));
        let sequence = make_sequence(vec![
            make_step("a", ControlCommand::Pause, None, false),
            make_step("b", ControlCommand::GripperOpen, None, false),
            make_step("c", ControlCommand::Resume, None, false),
        ]);

        let mut rx = executor.subscribe();
        executor.start(&sequence, "OHT-01").unwrap();
        let events = collect_until_finished(&mut rx).await;

        let snapshot = executor.snapshot().unwrap();
        assert_eq!(snapshot.status, ExecutionStatus::Failed);
        assert_eq!(snapshot.step_status("a"), StepStatus::Completed);
        assert_eq!(snapshot.step_status("b"), StepStatus::Failed);
        assert_eq!(snapshot.step_status("c"), StepStatus::Pending);
        assert!(snapshot.error.as_deref().unwrap().contains("failed"));

        let ExecutionEvent::Finished { result } = events.last().unwrap() else {
            panic!("expected finished event");
        };
        assert!(!result.success);
        assert_eq!(result.completed_steps, 1);
        assert_eq!(result.failed_step_id.as_deref(), Some("b"));
        assert_eq!(history.len(), 1);

        // Step c never left pending: no executing event for it.
        let steps = step_events(&events);
        assert!(!steps.iter().any(|(id, _)| id == "c"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_execute_in_declared_order() {
        let (executor, _history) = executor_with(MockSender::new());
        let sequence = make_sequence(vec![
            make_step("a", ControlCommand::Pause, Some(100), false),
            make_step("b", ControlCommand::GripperOpen, Some(100), false),
            make_step("c", ControlCommand::Resume, None, false),
        ]);

        let mut rx = executor.subscribe();
        executor.start(&sequence, "OHT-01").unwrap();
        let events = collect_until_finished(&mut rx).await;

        let steps = step_events(&events);
        let expected = vec![
            ("a".to_string(), StepStatus::Executing),
            ("a".to_string(), StepStatus::Completed),
            ("b".to_string(), StepStatus::Executing),
            ("b".to_string(), StepStatus::Completed),
            ("c".to_string(), StepStatus::Executing),
            ("c".to_string(), StepStatus::Completed),
        ];
        assert_eq!(steps, expected);

        // At any instant at most one step is executing: every executing
        // event is followed by that same step's terminal event before the
        // next executing event.
        let mut in_flight: Option<&str> = None;
        for (id, status) in &steps {
            match status {
                StepStatus::Executing => {
                    assert!(in_flight.is_none(), "two steps executing at once");
                    in_flight = Some(id);
                }
                _ => {
                    assert_eq!(in_flight, Some(id.as_str()));
                    in_flight = None;
                }
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_delay_gates_next_step() {
        let sender = MockSender::new();
        let history = HistoryStore::new(50);
        let sender = Arc::new(sender);
        let executor = SequenceExecutor::new(sender.clone(), history);

        let sequence = make_sequence(vec![
            make_step("a", ControlCommand::Pause, Some(500), false),
            make_step("b", ControlCommand::Resume, None, false),
        ]);

        let mut rx = executor.subscribe();
        executor.start(&sequence, "OHT-01").unwrap();
        collect_until_finished(&mut rx).await;

        let calls = sender.calls();
        assert_eq!(calls.len(), 2);
        let gap = calls[1].1.duration_since(calls[0].1);
        assert!(gap >= Duration::from_millis(500), "gap was {:?}", gap);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_last_step() {
        let sender = Arc::new(MockSender::new());
        let history = HistoryStore::new(50);
        let executor = SequenceExecutor::new(sender.clone(), history);

        // Last step declares a delay; it must not be applied.
        let sequence = make_sequence(vec![make_step(
            "a",
            ControlCommand::Pause,
            Some(60_000),
            false,
        )]);

        let mut rx = executor.subscribe();
        let started = tokio::time::Instant::now();
        executor.start(&sequence, "OHT-01").unwrap();
        collect_until_finished(&mut rx).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_flight_rejects_second_start() {
        let (executor, _history) =
            executor_with(MockSender::with_latency(Duration::from_millis(200)));
        let sequence = make_sequence(vec![make_step("a", ControlCommand::Pause, None, false)]);

        let mut rx = executor.subscribe();
        executor.start(&sequence, "OHT-01").unwrap();

        // Wait for step a to reach executing, then try to start again.
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, ExecutionEvent::Started { .. }));

        let err = executor.start(&sequence, "OHT-02").unwrap_err();
        assert!(matches!(err, AppError::ExecutionInProgress));

        // The in-flight execution is untouched.
        let snapshot = executor.snapshot().unwrap();
        assert_eq!(snapshot.vehicle_id, "OHT-01");
        collect_until_finished(&mut rx).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_requires_reset_after_terminal() {
        let (executor, _history) = executor_with(MockSender::new());
        let sequence = make_sequence(vec![make_step("a", ControlCommand::Pause, None, false)]);

        let mut rx = executor.subscribe();
        executor.start(&sequence, "OHT-01").unwrap();
        collect_until_finished(&mut rx).await;

        // Terminal record still present until dismissed.
        assert!(matches!(
            executor.start(&sequence, "OHT-01"),
            Err(AppError::ExecutionInProgress)
        ));

        executor.reset();
        executor.start(&sequence, "OHT-01").unwrap();
        collect_until_finished(&mut rx).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_is_idempotent() {
        let (executor, _history) = executor_with(MockSender::new());
        executor.reset();
        assert!(executor.snapshot().is_none());
        executor.reset();
        assert!(executor.snapshot().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_settle_delay() {
        let (executor, history) = executor_with(MockSender::new());
        let sequence = make_sequence(vec![
            make_step("a", ControlCommand::Pause, Some(5_000), false),
            make_step("b", ControlCommand::Resume, None, false),
        ]);

        let mut rx = executor.subscribe();
        executor.start(&sequence, "OHT-01").unwrap();

        // Started, a executing, a completed -- then the driver sleeps.
        for _ in 0..3 {
            rx.recv().await.unwrap();
        }

        let snapshot = executor.cancel().unwrap();
        assert_eq!(snapshot.status, ExecutionStatus::Cancelled);
        assert_eq!(snapshot.step_status("a"), StepStatus::Completed);
        assert_eq!(snapshot.step_status("b"), StepStatus::Pending);
        assert_eq!(history.len(), 1);
        assert!(!history.list()[0].success);

        // Give the abandoned driver plenty of virtual time: step b must
        // never start.
        tokio::time::sleep(Duration::from_secs(30)).await;
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, ExecutionEvent::Finished { .. }));
        assert!(rx.try_recv().is_err());
        assert_eq!(
            executor.snapshot().unwrap().status,
            ExecutionStatus::Cancelled
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_without_active_execution() {
        let (executor, _history) = executor_with(MockSender::new());
        assert!(matches!(
            executor.cancel(),
            Err(AppError::NoActiveExecution)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_cannot_advance_reset_executor() {
        let sender = Arc::new(MockSender::new());
        let history = HistoryStore::new(50);
        let executor = SequenceExecutor::new(sender.clone(), history);

        let slow = make_sequence(vec![
            make_step("x1", ControlCommand::Pause, Some(10_000), false),
            make_step("x2", ControlCommand::Resume, None, false),
        ]);

        let mut rx = executor.subscribe();
        let first = executor.start(&slow, "OHT-01").unwrap();

        // Wait until x1 completes and the driver enters its settle delay.
        for _ in 0..3 {
            rx.recv().await.unwrap();
        }

        // Abandon mid-delay and start a fresh execution.
        executor.reset();
        let quick = make_sequence(vec![make_step("y1", ControlCommand::Pause, None, false)]);
        let second = executor.start(&quick, "OHT-02").unwrap();
        let events = collect_until_finished(&mut rx).await;

        // Let the abandoned timer expire; it must not touch anything.
        tokio::time::sleep(Duration::from_secs(30)).await;

        let snapshot = executor.snapshot().unwrap();
        assert_eq!(snapshot.id, second.id);
        assert_eq!(snapshot.status, ExecutionStatus::Completed);
        assert_eq!(snapshot.current_step_index, 1);

        // No event after the reset refers to the abandoned execution, and
        // x2 never dispatched.
        for event in &events {
            let id = match event {
                ExecutionEvent::Started { execution_id, .. } => execution_id,
                ExecutionEvent::StepChanged { execution_id, .. } => execution_id,
                ExecutionEvent::Finished { result } => &result.execution_id,
            };
            assert_ne!(*id, first.id);
        }
        assert!(rx.try_recv().is_err());
        assert!(
            !sender
                .calls()
                .iter()
                .any(|(c, _)| *c == ControlCommand::Resume)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_status_pull_lookup() {
        let (executor, _history) =
            executor_with(MockSender::with_latency(Duration::from_millis(100)));
        let sequence = make_sequence(vec![make_step("a", ControlCommand::Pause, None, false)]);

        assert_eq!(executor.step_status("a"), StepStatus::Pending);

        let mut rx = executor.subscribe();
        executor.start(&sequence, "OHT-01").unwrap();
        rx.recv().await.unwrap(); // started
        rx.recv().await.unwrap(); // a executing
        assert_eq!(executor.step_status("a"), StepStatus::Executing);

        collect_until_finished(&mut rx).await;
        assert_eq!(executor.step_status("a"), StepStatus::Completed);
    }
}
