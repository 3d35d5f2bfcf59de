//! Trigger orchestration: the resolve state machine and doubling.

pub mod orchestrator;

pub use orchestrator::{PendingInvocation, TriggerOrchestrator, TriggerReport};
