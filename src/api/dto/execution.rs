use serde::Serialize;

use crate::models::execution::{ExecutionResult, ExecutionStatus, SequenceExecution, StepStatus};

#[derive(Debug, Serialize)]
pub struct StepStatusResponse {
    pub step_id: String,
    pub status: StepStatus,
}

#[derive(Debug, Serialize)]
pub struct ExecutionResponse {
    pub id: String,
    pub sequence_id: String,
    pub vehicle_id: String,
    pub status: ExecutionStatus,
    pub current_step_index: usize,
    pub total_steps: usize,
    pub steps: Vec<StepStatusResponse>,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub error: Option<String>,
}

impl From<SequenceExecution> for ExecutionResponse {
    fn from(execution: SequenceExecution) -> Self {
        let steps = execution
            .step_statuses()
            .iter()
            .enumerate()
            .map(|(i, status)| StepStatusResponse {
                step_id: execution.step_id(i).unwrap_or_default().to_string(),
                status: *status,
            })
            .collect();

        Self {
            id: execution.id.to_string(),
            sequence_id: execution.sequence_id.clone(),
            vehicle_id: execution.vehicle_id.clone(),
            status: execution.status,
            current_step_index: execution.current_step_index,
            total_steps: execution.total_steps(),
            steps,
            started_at: execution.started_at.to_rfc3339(),
            completed_at: execution.completed_at.map(|t| t.to_rfc3339()),
            error: execution.error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExecutionResultResponse {
    pub execution_id: String,
    pub success: bool,
    pub sequence_id: String,
    pub vehicle_id: String,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub failed_step_id: Option<String>,
    pub error: Option<String>,
    pub duration_ms: i64,
    pub finished_at: String,
}

impl From<ExecutionResult> for ExecutionResultResponse {
    fn from(result: ExecutionResult) -> Self {
        Self {
            execution_id: result.execution_id.to_string(),
            success: result.success,
            sequence_id: result.sequence_id,
            vehicle_id: result.vehicle_id,
            completed_steps: result.completed_steps,
            total_steps: result.total_steps,
            failed_step_id: result.failed_step_id,
            error: result.error,
            duration_ms: result.duration_ms,
            finished_at: result.finished_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<ExecutionResultResponse>,
}
