//! Core engine types: instance ids, RNG, the event log.

pub mod entity;
pub mod log;
pub mod rng;

pub use entity::{InstanceId, InstanceIdGen};
pub use log::{EventLog, LogEntry};
pub use rng::{GameRng, GameRngState};
