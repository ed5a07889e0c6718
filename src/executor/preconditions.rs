use serde::Serialize;

use crate::models::sequence::CommandSequence;
use crate::models::vehicle::{OperationalState, Vehicle};

/// Outcome of a precondition evaluation. `reason` is the human-readable
/// explanation surfaced to the operator when `valid` is false.
#[derive(Debug, Clone, Serialize)]
pub struct PreconditionCheck {
    pub valid: bool,
    pub reason: Option<String>,
}

impl PreconditionCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn fail(reason: &str) -> Self {
        Self {
            valid: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Evaluate a sequence's preconditions against a point-in-time vehicle
/// snapshot. Pure and synchronous; checks run in fixed priority order and
/// stop at the first failure. Evaluated exactly once before a sequence
/// starts, never re-checked mid-run.
pub fn evaluate(sequence: &CommandSequence, vehicle: &Vehicle) -> PreconditionCheck {
    let Some(preconditions) = &sequence.preconditions else {
        return PreconditionCheck::ok();
    };

    if preconditions.requires_idle {
        let is_idle = matches!(
            vehicle.operational_state,
            OperationalState::Idle | OperationalState::EStopped
        );
        if !is_idle {
            return PreconditionCheck::fail("Vehicle must be idle");
        }
    }

    if preconditions.requires_estop_inactive && vehicle.safety.estop_active {
        return PreconditionCheck::fail("E-stop must be inactive");
    }

    if preconditions.requires_no_payload && vehicle.payload.is_some() {
        return PreconditionCheck::fail("Vehicle must have no payload");
    }

    PreconditionCheck::ok()
}
