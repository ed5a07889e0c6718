use serde::Serialize;

use crate::executor::PreconditionCheck;
use crate::models::sequence::{
    CommandSequence, CommandStep, Preconditions, SequenceCategory, SequenceSeverity,
    format_duration,
};
use crate::models::vehicle::ControlCommand;

#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub id: String,
    pub command: ControlCommand,
    pub label: String,
    pub description: Option<String>,
    pub delay_after_ms: Option<u64>,
    pub skip_on_error: bool,
    pub expected_duration_ms: Option<u64>,
}

impl From<CommandStep> for StepResponse {
    fn from(step: CommandStep) -> Self {
        Self {
            id: step.id,
            command: step.command,
            label: step.label,
            description: step.description,
            delay_after_ms: step.delay_after_ms,
            skip_on_error: step.skip_on_error,
            expected_duration_ms: step.expected_duration_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SequenceResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: SequenceCategory,
    pub severity: SequenceSeverity,
    pub steps: Vec<StepResponse>,
    pub estimated_duration_ms: u64,
    pub estimated_duration: String,
    pub warning_message: Option<String>,
    pub preconditions: Option<Preconditions>,
}

impl From<CommandSequence> for SequenceResponse {
    fn from(sequence: CommandSequence) -> Self {
        Self {
            id: sequence.id,
            name: sequence.name,
            description: sequence.description,
            category: sequence.category,
            severity: sequence.severity,
            steps: sequence.steps.into_iter().map(StepResponse::from).collect(),
            estimated_duration: format_duration(sequence.estimated_duration_ms),
            estimated_duration_ms: sequence.estimated_duration_ms,
            warning_message: sequence.warning_message,
            preconditions: sequence.preconditions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SequencesListResponse {
    pub data: Vec<SequenceResponse>,
}

#[derive(Debug, Serialize)]
pub struct PreconditionResponse {
    pub valid: bool,
    pub reason: Option<String>,
}

impl From<PreconditionCheck> for PreconditionResponse {
    fn from(check: PreconditionCheck) -> Self {
        Self {
            valid: check.valid,
            reason: check.reason,
        }
    }
}
