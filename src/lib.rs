//! # tavern-core
//!
//! Effect-resolution engine for a two-player collectible card game.
//!
//! The crate is organized around one flow: a host (UI, bot harness, or
//! server) plays a card through the [`Engine`]; the
//! [`TriggerOrchestrator`](trigger::TriggerOrchestrator) runs the marker
//! passes and dispatches the card's [`EffectSpec`](effects::EffectSpec)
//! through the [`EffectRegistry`](effects::EffectRegistry); handlers mutate
//! state only through the [`GameView`](state::GameView); the host reads the
//! structured [`TriggerReport`](trigger::TriggerReport) and drains the event
//! log.
//!
//! Everything is deterministic under a fixed seed: one
//! [`GameRng`](core::GameRng) feeds every random choice, history records use
//! sequence numbers instead of timestamps, and there are no process-wide
//! singletons.
//!
//! ```
//! use tavern_core::cards::{CardCatalog, CardDefinition, CardId};
//! use tavern_core::effects::{EffectSpec, EffectType, TargetSelector};
//! use tavern_core::Engine;
//!
//! let mut catalog = CardCatalog::new();
//! catalog
//!     .register(
//!         CardDefinition::spell(CardId::new(1), "Insight", 2).with_on_cast(
//!             EffectSpec::new(EffectType::Draw, TargetSelector::None).with_count(2),
//!         ),
//!     )
//!     .unwrap();
//!
//! let mut engine = Engine::new(catalog, ["Aria", "Borin"], 42);
//! engine.new_game([vec![CardId::new(1); 10], vec![CardId::new(1); 10]]);
//!
//! let report = engine.play_card(0, None).unwrap();
//! println!("{:?}", report.outcome);
//! for entry in engine.drain_log() {
//!     println!("{}", entry);
//! }
//! ```

pub mod cards;
pub mod core;
pub mod effects;
pub mod engine;
pub mod history;
pub mod memory;
pub mod state;
pub mod trigger;

pub use engine::{Engine, Side};
