use tokio::sync::broadcast;

use crate::error::{AppError, Result};
use crate::executor::{PreconditionCheck, SequenceExecutor, evaluate};
use crate::models::execution::{ExecutionEvent, ExecutionResult, SequenceExecution, StepStatus};
use crate::models::sequence::{CommandSequence, SequenceCategory};
use crate::store::{FleetStore, HistoryStore, SequenceLibrary};

/// Orchestrates sequence selection, precondition gating and execution
/// control on top of the executor.
#[derive(Clone)]
pub struct SequenceService {
    library: SequenceLibrary,
    fleet: FleetStore,
    executor: SequenceExecutor,
    history: HistoryStore,
}

impl SequenceService {
    pub fn new(
        library: SequenceLibrary,
        fleet: FleetStore,
        executor: SequenceExecutor,
        history: HistoryStore,
    ) -> Self {
        Self {
            library,
            fleet,
            executor,
            history,
        }
    }

    pub fn list_sequences(&self, category: Option<SequenceCategory>) -> Vec<CommandSequence> {
        match category {
            Some(category) => self.library.by_category(category),
            None => self.library.list(),
        }
    }

    pub fn get_sequence(&self, id: &str) -> Result<CommandSequence> {
        self.library.get(id)
    }

    /// Evaluate a sequence's preconditions against the vehicle's current
    /// snapshot, without starting anything.
    pub fn check_preconditions(
        &self,
        vehicle_id: &str,
        sequence_id: &str,
    ) -> Result<PreconditionCheck> {
        let sequence = self.library.get(sequence_id)?;
        let vehicle = self.fleet.get(vehicle_id)?;
        Ok(evaluate(&sequence, &vehicle))
    }

    /// Gate on preconditions, then hand the sequence to the executor.
    /// Preconditions are checked exactly once, here; a sequence that passes
    /// this gate runs to its terminal state without re-checks.
    pub fn start(&self, vehicle_id: &str, sequence_id: &str) -> Result<SequenceExecution> {
        let sequence = self.library.get(sequence_id)?;
        let vehicle = self.fleet.get(vehicle_id)?;

        let check = evaluate(&sequence, &vehicle);
        if !check.valid {
            let reason = check.reason.unwrap_or_else(|| "Preconditions not met".to_string());
            tracing::warn!(
                vehicle_id = %vehicle_id,
                sequence_id = %sequence_id,
                reason = %reason,
                "sequence rejected by preconditions"
            );
            return Err(AppError::PreconditionFailed(reason));
        }

        self.executor.start(&sequence, vehicle_id)
    }

    pub fn current(&self) -> Option<SequenceExecution> {
        self.executor.snapshot()
    }

    pub fn step_status(&self, step_id: &str) -> StepStatus {
        self.executor.step_status(step_id)
    }

    pub fn cancel(&self) -> Result<SequenceExecution> {
        self.executor.cancel()
    }

    pub fn reset(&self) {
        self.executor.reset();
    }

    pub fn history(&self) -> Vec<ExecutionResult> {
        self.history.list()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExecutionEvent> {
        self.executor.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::FleetCommandSender;
    use crate::models::execution::ExecutionStatus;
    use crate::models::vehicle::OperationalState;
    use crate::store::seed::seed_fleet;
    use std::sync::Arc;
    use std::time::Duration;

    fn service() -> (SequenceService, FleetStore) {
        let fleet = FleetStore::new(seed_fleet(7));
        let history = HistoryStore::new(50);
        let sender = Arc::new(FleetCommandSender::new(fleet.clone(), 0));
        let executor = SequenceExecutor::new(sender, history.clone());
        let service = SequenceService::new(
            SequenceLibrary::builtin(),
            fleet.clone(),
            executor,
            history,
        );
        (service, fleet)
    }

    async fn wait_terminal(service: &SequenceService) -> SequenceExecution {
        let mut rx = service.subscribe();
        loop {
            let event = tokio::time::timeout(Duration::from_secs(60), rx.recv())
                .await
                .expect("timed out")
                .expect("channel closed");
            if matches!(event, ExecutionEvent::Finished { .. }) {
                return service.current().expect("execution record present");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_precondition_violation_never_starts() {
        let (service, _fleet) = service();

        // Seeded OHT-01 is active with a payload; prep-maintenance
        // requires no payload.
        let err = service.start("OHT-01", "prep-maintenance").unwrap_err();
        let AppError::PreconditionFailed(reason) = err else {
            panic!("expected precondition failure");
        };
        assert_eq!(reason, "Vehicle must have no payload");
        assert!(service.current().is_none());
        assert!(service.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_preconditions_is_advisory() {
        let (service, _fleet) = service();
        let check = service
            .check_preconditions("OHT-01", "prep-maintenance")
            .unwrap();
        assert!(!check.valid);
        assert!(service.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run_through_service() {
        let (service, fleet) = service();

        // emergency-recovery declares no preconditions; run it on a moving
        // vehicle.
        let execution = service.start("OHT-01", "emergency-recovery").unwrap();
        assert_eq!(execution.total_steps(), 3);

        let terminal = wait_terminal(&service).await;
        assert_eq!(terminal.status, ExecutionStatus::Completed);
        assert_eq!(service.history().len(), 1);
        assert!(service.history()[0].success);

        // The sequence ends with pause: vehicle left stationary.
        let vehicle = fleet.get("OHT-01").unwrap();
        assert_eq!(vehicle.operational_state, OperationalState::Idle);

        service.reset();
        assert!(service.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_ids_rejected() {
        let (service, _fleet) = service();
        assert!(matches!(
            service.start("OHT-99", "quick-resume"),
            Err(AppError::VehicleNotFound(_))
        ));
        assert!(matches!(
            service.start("OHT-01", "no-such-sequence"),
            Err(AppError::SequenceNotFound(_))
        ));
    }
}
