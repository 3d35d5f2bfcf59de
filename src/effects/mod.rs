//! Effect specifications, outcomes, dispatch, and the built-in handlers.

pub mod handlers;
pub mod outcome;
pub mod registry;
pub mod spec;
pub mod targeting;

pub use outcome::{DiscoverPresentation, EffectError, EffectResult, ErrorKind, OutcomeData};
pub use registry::{EffectCategory, EffectRegistry, Handler};
pub use spec::{Condition, EffectParams, EffectSpec, EffectType, SpecError};
pub use targeting::{Target, TargetSelector};
