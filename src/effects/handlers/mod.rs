//! Built-in effect handlers.
//!
//! Each handler resolves one effect type against the game view. Handlers
//! never touch player state directly; everything goes through the view's
//! primitives so invariants (shield absorption, heal clamping, board and
//! hand limits) hold no matter which effect is running.

mod buff;
mod damage;
mod discover;
mod draw;
mod replay;
mod summon;
mod transform;

use crate::state::GameView;

use super::registry::{EffectCategory, EffectRegistry};
use super::spec::{Condition, EffectSpec, EffectType};
use super::targeting::Target;

/// Install every built-in handler into `registry`.
///
/// Built-ins behave identically regardless of category, so each one is
/// registered under all four.
pub fn register_defaults(registry: &mut EffectRegistry) {
    const CATEGORIES: [EffectCategory; 4] = [
        EffectCategory::OnPlay,
        EffectCategory::OnDeath,
        EffectCategory::SpellCast,
        EffectCategory::Combo,
    ];

    for category in CATEGORIES {
        registry.register(category, EffectType::Damage, damage::damage);
        registry.register(category, EffectType::Heal, damage::heal);
        registry.register(category, EffectType::Freeze, damage::freeze);
        registry.register(category, EffectType::Silence, damage::silence);
        registry.register(category, EffectType::GainArmor, damage::gain_armor);
        registry.register(category, EffectType::Buff, buff::buff);
        registry.register(category, EffectType::BuffAdjacent, buff::buff_adjacent);
        registry.register(category, EffectType::BuffPerFallen, buff::buff_per_fallen);
        registry.register(category, EffectType::Draw, draw::draw);
        registry.register(category, EffectType::Summon, summon::summon);
        registry.register(category, EffectType::SummonPerFallen, summon::summon_per_fallen);
        registry.register(category, EffectType::Resurrect, summon::resurrect);
        registry.register(category, EffectType::Discover, discover::discover);
        registry.register(category, EffectType::Adapt, discover::adapt);
        registry.register(category, EffectType::Transform, transform::transform);
        registry.register(
            category,
            EffectType::ShuffleIntoDeck,
            transform::shuffle_into_deck,
        );
        registry.register(category, EffectType::ReplayTriggers, replay::replay_triggers);
    }
}

/// Concrete targets for one resolution: the host's chosen target when one
/// was supplied, otherwise whatever the spec's selector resolves to.
///
/// A targeted spec resolving without a host choice (a doubled or replayed
/// invocation) gets one random valid target instead of the full set.
fn effect_targets(view: &mut GameView<'_>, spec: &EffectSpec, chosen: Option<Target>) -> Vec<Target> {
    if let Some(target) = chosen {
        return vec![target];
    }
    let source = view.source;
    let resolved = view.resolve_targets(&spec.selector, source);
    if spec.requires_target {
        return view.rng.choose(&resolved).copied().into_iter().collect();
    }
    resolved
}

/// Evaluate a condition gate against the current view.
fn condition_met(view: &GameView<'_>, condition: &Condition) -> bool {
    match condition {
        Condition::FallenOfTribe { tribe, at_least } => {
            view.fallen.count_by_tribe(*tribe) >= *at_least as usize
        }
        Condition::HandSizeAtMost(n) => view.current.hand.len() <= *n,
        Condition::BoardCountAtLeast(n) => {
            view.current.board.iter().filter(|m| !m.is_dead()).count() >= *n
        }
        Condition::HoldingCardOfTribe(tribe) => {
            let catalog = view.catalog;
            view.current
                .holding_tribe(*tribe, |id| catalog.get(id).and_then(|def| def.tribe))
        }
    }
}
