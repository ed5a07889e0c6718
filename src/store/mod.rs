pub mod fleet_store;
pub mod history_store;
pub mod seed;
pub mod sequence_library;

pub use fleet_store::FleetStore;
pub use history_store::HistoryStore;
pub use sequence_library::SequenceLibrary;
