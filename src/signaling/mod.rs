// Signal orchestration and event fan-out
pub mod events;
pub mod processor;

pub use events::EventBus;
pub use processor::{SignalProcessor, SignalReceipt};
