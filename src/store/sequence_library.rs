use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::sequence::{
    CommandSequence, CommandStep, Preconditions, SequenceCategory, SequenceSeverity,
};
use crate::models::vehicle::ControlCommand;

/// Immutable catalog of the pre-configured command sequences. Built once at
/// startup; lookups clone the shared definitions.
#[derive(Clone)]
pub struct SequenceLibrary {
    sequences: Arc<Vec<CommandSequence>>,
    index: Arc<HashMap<String, usize>>,
}

impl SequenceLibrary {
    pub fn new(sequences: Vec<CommandSequence>) -> Self {
        let index = sequences
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        Self {
            sequences: Arc::new(sequences),
            index: Arc::new(index),
        }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_sequences())
    }

    pub fn list(&self) -> Vec<CommandSequence> {
        self.sequences.as_ref().clone()
    }

    pub fn by_category(&self, category: SequenceCategory) -> Vec<CommandSequence> {
        self.sequences
            .iter()
            .filter(|s| s.category == category)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<CommandSequence> {
        self.index
            .get(id)
            .map(|&i| self.sequences[i].clone())
            .ok_or_else(|| AppError::SequenceNotFound(id.to_string()))
    }
}

fn step(
    id: &str,
    command: ControlCommand,
    label: &str,
    description: &str,
    delay_after_ms: u64,
    expected_duration_ms: u64,
) -> CommandStep {
    CommandStep {
        id: id.to_string(),
        command,
        label: label.to_string(),
        description: Some(description.to_string()),
        delay_after_ms: Some(delay_after_ms),
        skip_on_error: false,
        expected_duration_ms: Some(expected_duration_ms),
    }
}

fn optional_step(
    id: &str,
    command: ControlCommand,
    label: &str,
    description: &str,
    delay_after_ms: u64,
    expected_duration_ms: u64,
) -> CommandStep {
    CommandStep {
        skip_on_error: true,
        ..step(id, command, label, description, delay_after_ms, expected_duration_ms)
    }
}

fn builtin_sequences() -> Vec<CommandSequence> {
    vec![
        CommandSequence {
            id: "prep-maintenance".to_string(),
            name: "Prep for Maintenance".to_string(),
            description: "Safely prepares the vehicle for hands-on maintenance by stopping all \
                          movement, opening the gripper, and clearing errors."
                .to_string(),
            category: SequenceCategory::Maintenance,
            severity: SequenceSeverity::High,
            estimated_duration_ms: 4500,
            warning_message: Some(
                "This will stop the vehicle and open the gripper. Ensure no payload is at risk \
                 of falling."
                    .to_string(),
            ),
            preconditions: Some(Preconditions {
                requires_no_payload: true,
                ..Preconditions::default()
            }),
            steps: vec![
                step(
                    "pm-1",
                    ControlCommand::Estop,
                    "Activate Emergency Stop",
                    "Immediately halts all vehicle movement",
                    1000,
                    500,
                ),
                step(
                    "pm-2",
                    ControlCommand::GripperOpen,
                    "Open Gripper",
                    "Releases gripper mechanism for inspection",
                    1500,
                    1000,
                ),
                step(
                    "pm-3",
                    ControlCommand::Reset,
                    "Reset E-Stop",
                    "Clears emergency stop state after gripper operation",
                    500,
                    500,
                ),
            ],
        },
        CommandSequence {
            id: "emergency-recovery".to_string(),
            name: "Emergency Recovery".to_string(),
            description: "Recovers vehicle from an error state by resetting systems and \
                          returning to idle."
                .to_string(),
            category: SequenceCategory::Recovery,
            severity: SequenceSeverity::Critical,
            estimated_duration_ms: 3000,
            warning_message: Some(
                "This will reset all error states. Verify vehicle surroundings are clear before \
                 proceeding."
                    .to_string(),
            ),
            preconditions: None,
            steps: vec![
                step(
                    "er-1",
                    ControlCommand::ManualStop,
                    "Stop All Movement",
                    "Ensures vehicle is stationary",
                    500,
                    200,
                ),
                step(
                    "er-2",
                    ControlCommand::Reset,
                    "Reset Systems",
                    "Clears error states and emergency stop",
                    1000,
                    500,
                ),
                step(
                    "er-3",
                    ControlCommand::Pause,
                    "Enter Paused State",
                    "Vehicle enters safe paused state awaiting operator input",
                    500,
                    300,
                ),
            ],
        },
        CommandSequence {
            id: "gripper-cycle-test".to_string(),
            name: "Gripper Cycle Test".to_string(),
            description: "Tests gripper mechanism by performing a full open-close cycle."
                .to_string(),
            category: SequenceCategory::Diagnostic,
            severity: SequenceSeverity::Medium,
            estimated_duration_ms: 5000,
            warning_message: Some(
                "Gripper will cycle. Ensure no obstructions in gripper path.".to_string(),
            ),
            preconditions: Some(Preconditions {
                requires_idle: true,
                requires_no_payload: true,
                ..Preconditions::default()
            }),
            steps: vec![
                step(
                    "gc-1",
                    ControlCommand::Pause,
                    "Pause Operations",
                    "Ensure vehicle is stationary for test",
                    500,
                    200,
                ),
                step(
                    "gc-2",
                    ControlCommand::GripperOpen,
                    "Open Gripper",
                    "Fully open gripper mechanism",
                    1500,
                    1000,
                ),
                step(
                    "gc-3",
                    ControlCommand::GripperClose,
                    "Close Gripper",
                    "Fully close gripper mechanism",
                    1500,
                    1000,
                ),
                step(
                    "gc-4",
                    ControlCommand::Resume,
                    "Resume Operations",
                    "Return to normal operational state",
                    500,
                    300,
                ),
            ],
        },
        CommandSequence {
            id: "safe-shutdown".to_string(),
            name: "Safe Shutdown".to_string(),
            description: "Prepares vehicle for extended downtime or power-off by returning home \
                          and stopping safely."
                .to_string(),
            category: SequenceCategory::Maintenance,
            severity: SequenceSeverity::Medium,
            estimated_duration_ms: 8000,
            warning_message: Some(
                "Vehicle will return to home position and enter shutdown state.".to_string(),
            ),
            preconditions: Some(Preconditions {
                requires_estop_inactive: true,
                ..Preconditions::default()
            }),
            steps: vec![
                step(
                    "ss-1",
                    ControlCommand::Pause,
                    "Pause Current Task",
                    "Interrupts any active task",
                    500,
                    200,
                ),
                optional_step(
                    "ss-2",
                    ControlCommand::GripperOpen,
                    "Release Payload",
                    "Opens gripper if payload is held",
                    1500,
                    1000,
                ),
                step(
                    "ss-3",
                    ControlCommand::Home,
                    "Return to Home",
                    "Navigate to home/dock position",
                    4000,
                    3000,
                ),
                step(
                    "ss-4",
                    ControlCommand::Estop,
                    "Engage Safety Stop",
                    "Final safety stop for shutdown",
                    500,
                    500,
                ),
            ],
        },
        CommandSequence {
            id: "quick-resume".to_string(),
            name: "Quick Resume".to_string(),
            description: "Quickly returns vehicle to operational state from paused or error \
                          conditions."
                .to_string(),
            category: SequenceCategory::Recovery,
            severity: SequenceSeverity::Low,
            estimated_duration_ms: 2000,
            warning_message: Some(
                "Vehicle will resume autonomous operation. Ensure path is clear.".to_string(),
            ),
            preconditions: Some(Preconditions {
                requires_estop_inactive: true,
                ..Preconditions::default()
            }),
            steps: vec![
                optional_step(
                    "qr-1",
                    ControlCommand::Reset,
                    "Clear Any Errors",
                    "Reset any lingering error states",
                    500,
                    300,
                ),
                step(
                    "qr-2",
                    ControlCommand::Resume,
                    "Resume Operations",
                    "Return to active autonomous operation",
                    500,
                    300,
                ),
            ],
        },
        CommandSequence {
            id: "calibration-position".to_string(),
            name: "Calibration Position".to_string(),
            description: "Moves vehicle to calibration/service position for sensor alignment or \
                          inspection."
                .to_string(),
            category: SequenceCategory::Calibration,
            severity: SequenceSeverity::Medium,
            estimated_duration_ms: 6000,
            warning_message: Some(
                "Vehicle will move to calibration position. Ensure area is clear.".to_string(),
            ),
            preconditions: Some(Preconditions {
                requires_no_payload: true,
                requires_estop_inactive: true,
                ..Preconditions::default()
            }),
            steps: vec![
                step(
                    "cp-1",
                    ControlCommand::Pause,
                    "Pause Current Operation",
                    "Stop any active tasks",
                    500,
                    200,
                ),
                optional_step(
                    "cp-2",
                    ControlCommand::GripperOpen,
                    "Open Gripper",
                    "Ensure gripper is in neutral position",
                    1000,
                    800,
                ),
                step(
                    "cp-3",
                    ControlCommand::Home,
                    "Navigate to Calibration Point",
                    "Move to designated calibration position",
                    3000,
                    2500,
                ),
                step(
                    "cp-4",
                    ControlCommand::Pause,
                    "Hold Position",
                    "Maintain position for calibration",
                    500,
                    200,
                ),
            ],
        },
    ]
}
