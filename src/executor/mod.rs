pub mod fleet_sender;
pub mod preconditions;
pub mod sequence_executor;

use async_trait::async_trait;

use crate::models::vehicle::ControlCommand;

/// Vehicle control boundary consumed by the sequence executor. Any
/// rejection is treated as a step failure; the executor does not inspect
/// the error beyond its message.
#[async_trait]
pub trait CommandSender: Send + Sync {
    async fn send(&self, vehicle_id: &str, command: ControlCommand) -> anyhow::Result<()>;
}

pub use fleet_sender::FleetCommandSender;
pub use preconditions::{PreconditionCheck, evaluate};
pub use sequence_executor::SequenceExecutor;
