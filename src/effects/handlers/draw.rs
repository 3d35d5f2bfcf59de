//! Card draw handlers.

use crate::cards::CardDefinition;
use crate::history::EffectHistory;
use crate::state::GameView;

use super::super::outcome::{EffectResult, OutcomeData};
use super::super::registry::EffectRegistry;
use super::super::spec::EffectSpec;
use super::super::targeting::Target;
use super::condition_met;

/// Draw `count` cards, optionally gated on a condition.
///
/// Fatigue and hand-cap burns are handled inside the view; cards lost that
/// way are not reported in the outcome.
pub(super) fn draw(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    _chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    if let Some(condition) = &spec.params.condition {
        if !condition_met(view, condition) {
            view.log_event(format!("{}'s condition was not met.", source.name));
            return Ok(OutcomeData::Fizzled);
        }
    }
    let count = spec.params.count.unwrap_or(1);
    let cards = view.draw_cards(count);
    Ok(OutcomeData::Drawn { cards })
}
