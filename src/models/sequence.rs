use serde::{Deserialize, Serialize};

use super::vehicle::ControlCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceCategory {
    Maintenance,
    Recovery,
    Calibration,
    Diagnostic,
}

impl std::str::FromStr for SequenceCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "maintenance" => Ok(SequenceCategory::Maintenance),
            "recovery" => Ok(SequenceCategory::Recovery),
            "calibration" => Ok(SequenceCategory::Calibration),
            "diagnostic" => Ok(SequenceCategory::Diagnostic),
            other => Err(format!("unknown sequence category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Boolean requirements on vehicle state, checked once before a sequence
/// starts. Never re-evaluated mid-sequence.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Preconditions {
    #[serde(default)]
    pub requires_idle: bool,
    #[serde(default)]
    pub requires_estop_inactive: bool,
    #[serde(default)]
    pub requires_no_payload: bool,
}

/// One command within a sequence. Steps execute strictly in list order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandStep {
    pub id: String,
    pub command: ControlCommand,
    pub label: String,
    pub description: Option<String>,
    /// Settle delay applied after the step completes, unless it is the
    /// last step of the sequence.
    pub delay_after_ms: Option<u64>,
    /// When true, a failing step is bypassed instead of aborting the
    /// sequence.
    #[serde(default)]
    pub skip_on_error: bool,
    /// Advisory only, for progress display.
    pub expected_duration_ms: Option<u64>,
}

/// Pre-configured command sequence definition. Defined once at startup and
/// never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSequence {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: SequenceCategory,
    pub severity: SequenceSeverity,
    pub steps: Vec<CommandStep>,
    pub estimated_duration_ms: u64,
    pub warning_message: Option<String>,
    pub preconditions: Option<Preconditions>,
}

/// Human-readable duration estimate, e.g. "~5s" or "~2m".
pub fn format_duration(ms: u64) -> String {
    let seconds = ms.div_ceil(1000);
    if seconds < 60 {
        format!("~{}s", seconds)
    } else {
        format!("~{}m", seconds.div_ceil(60))
    }
}
