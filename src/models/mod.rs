pub mod execution;
pub mod sequence;
pub mod vehicle;

pub use execution::{ExecutionEvent, ExecutionResult, ExecutionStatus, SequenceExecution, StepStatus};
pub use sequence::{CommandSequence, CommandStep, Preconditions, SequenceCategory, SequenceSeverity};
pub use vehicle::{Camera, CameraPosition, ControlCommand, FleetStatus, FleetSummary, OperationalState, Vehicle};
