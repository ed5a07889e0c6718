use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sequence::CommandSequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionStatus {
    Executing,
    Completed,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::Executing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Pending,
    Executing,
    Completed,
    Failed,
    Skipped,
}

impl StepStatus {
    /// Legal transitions: pending -> executing,
    /// executing -> completed | failed | skipped. Everything else is
    /// rejected.
    pub fn can_transition_to(&self, next: StepStatus) -> bool {
        matches!(
            (*self, next),
            (StepStatus::Pending, StepStatus::Executing)
                | (StepStatus::Executing, StepStatus::Completed)
                | (StepStatus::Executing, StepStatus::Failed)
                | (StepStatus::Executing, StepStatus::Skipped)
        )
    }
}

/// Runtime state for one executing sequence. Exclusively owned by the
/// executor; observers only ever see clones.
///
/// Step statuses live in an array parallel to the declared step order, with
/// an id-to-index map built once at construction, so "all steps after index
/// i stay pending" is a property of positions rather than of hash-map
/// contents.
#[derive(Debug, Clone, Serialize)]
pub struct SequenceExecution {
    pub id: uuid::Uuid,
    pub sequence_id: String,
    pub vehicle_id: String,
    pub status: ExecutionStatus,
    pub current_step_index: usize,
    step_ids: Vec<String>,
    step_statuses: Vec<StepStatus>,
    #[serde(skip)]
    id_index: HashMap<String, usize>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl SequenceExecution {
    pub fn new(sequence: &CommandSequence, vehicle_id: &str) -> Self {
        let step_ids: Vec<String> = sequence.steps.iter().map(|s| s.id.clone()).collect();
        let id_index = step_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let step_statuses = vec![StepStatus::Pending; step_ids.len()];

        Self {
            id: uuid::Uuid::new_v4(),
            sequence_id: sequence.id.clone(),
            vehicle_id: vehicle_id.to_string(),
            status: ExecutionStatus::Executing,
            current_step_index: 0,
            step_ids,
            step_statuses,
            id_index,
            started_at: Utc::now(),
            completed_at: None,
            error: None,
        }
    }

    pub fn total_steps(&self) -> usize {
        self.step_ids.len()
    }

    pub fn step_id(&self, index: usize) -> Option<&str> {
        self.step_ids.get(index).map(String::as_str)
    }

    /// O(1) status lookup by step id. Unknown ids read as pending.
    pub fn step_status(&self, step_id: &str) -> StepStatus {
        self.id_index
            .get(step_id)
            .map(|&i| self.step_statuses[i])
            .unwrap_or(StepStatus::Pending)
    }

    pub fn step_statuses(&self) -> &[StepStatus] {
        &self.step_statuses
    }

    /// Apply a step transition, enforcing the legal transition set. Once a
    /// step is terminal it stays terminal until the whole record is
    /// rebuilt by the next start.
    pub fn transition_step(&mut self, index: usize, next: StepStatus) -> bool {
        let Some(current) = self.step_statuses.get(index).copied() else {
            return false;
        };
        if !current.can_transition_to(next) {
            return false;
        }
        self.step_statuses[index] = next;
        true
    }

    pub fn is_executing(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Terminal result record for this execution. `completed_steps` is the
    /// step index reached, counting skipped steps, matching the progress
    /// the operator saw.
    pub fn to_result(&self, finished_at: DateTime<Utc>) -> ExecutionResult {
        let failed_step_id = self
            .step_statuses
            .iter()
            .position(|s| *s == StepStatus::Failed)
            .and_then(|i| self.step_ids.get(i).cloned());

        ExecutionResult {
            execution_id: self.id,
            success: self.status == ExecutionStatus::Completed,
            sequence_id: self.sequence_id.clone(),
            vehicle_id: self.vehicle_id.clone(),
            completed_steps: self.current_step_index,
            total_steps: self.step_ids.len(),
            failed_step_id,
            error: self.error.clone(),
            duration_ms: (finished_at - self.started_at).num_milliseconds(),
            finished_at,
        }
    }
}

/// Historical record of one terminal execution. Read-only once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub execution_id: uuid::Uuid,
    pub success: bool,
    pub sequence_id: String,
    pub vehicle_id: String,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub failed_step_id: Option<String>,
    pub error: Option<String>,
    pub duration_ms: i64,
    pub finished_at: DateTime<Utc>,
}

/// Push notification payload for execution observers. Emitted synchronously
/// with the state transition it describes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ExecutionEvent {
    Started {
        execution_id: uuid::Uuid,
        sequence_id: String,
        vehicle_id: String,
    },
    StepChanged {
        execution_id: uuid::Uuid,
        step_id: String,
        step_index: usize,
        status: StepStatus,
    },
    Finished {
        result: ExecutionResult,
    },
}
