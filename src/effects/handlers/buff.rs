//! Stat buff handlers.

use smallvec::SmallVec;

use crate::cards::CardDefinition;
use crate::history::EffectHistory;
use crate::state::GameView;

use super::super::outcome::{EffectError, EffectResult, ErrorKind, OutcomeData};
use super::super::registry::EffectRegistry;
use super::super::spec::EffectSpec;
use super::super::targeting::{Target, TargetSelector};
use super::effect_targets;

fn apply_buff(
    view: &mut GameView<'_>,
    targets: &[Target],
    attack: i32,
    health: i32,
) -> SmallVec<[Target; 2]> {
    let mut buffed: SmallVec<[Target; 2]> = SmallVec::new();
    for target in targets {
        let Target::Minion(id) = target else {
            continue;
        };
        if let Some(minion) = view.minion_mut(*id) {
            minion.buff(attack, health);
            let line = format!("{} gained +{}/+{}.", minion.card.name, attack, health);
            view.log_event(line);
            buffed.push(*target);
        }
    }
    buffed
}

pub(super) fn buff(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let attack = spec.params.attack.unwrap_or(0);
    let health = spec.params.health.unwrap_or(0);
    let targets = effect_targets(view, spec, chosen);
    let buffed = apply_buff(view, &targets, attack, health);
    if buffed.is_empty() {
        return Err(EffectError::new(
            ErrorKind::NoValidTargets,
            format!("{} found nothing to buff", source.name),
        ));
    }
    Ok(OutcomeData::Buffed {
        targets: buffed,
        attack,
        health,
    })
}

pub(super) fn buff_adjacent(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    _chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let attack = spec.params.attack.unwrap_or(0);
    let health = spec.params.health.unwrap_or(0);
    let source_id = view.source;
    let targets = view.resolve_targets(&TargetSelector::AdjacentMinions, source_id);
    if targets.is_empty() {
        // A lone minion has no neighbors; the play itself was legal.
        view.log_event(format!("{} has no adjacent minions.", source.name));
        return Ok(OutcomeData::Fizzled);
    }
    let buffed = apply_buff(view, &targets, attack, health);
    Ok(OutcomeData::Buffed {
        targets: buffed,
        attack,
        health,
    })
}

/// Bone-Collector-style buff: the source gains +X/+X per matching tribe
/// record in dead-unit memory.
pub(super) fn buff_per_fallen(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    _chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let tribe = spec.params.tribe.ok_or_else(|| {
        EffectError::new(
            ErrorKind::HandlerError,
            format!("{} has a per-fallen buff without a tribe", source.name),
        )
    })?;
    let per_record_attack = spec.params.attack.unwrap_or(1);
    let per_record_health = spec.params.health.unwrap_or(1);

    let matches = view.fallen.count_by_tribe(tribe) as i32;
    if matches == 0 {
        view.log_event(format!(
            "{} finds no fallen {} to draw on.",
            source.name,
            tribe.as_str()
        ));
        return Ok(OutcomeData::Fizzled);
    }

    let Some(source_id) = view.source else {
        return Err(EffectError::new(
            ErrorKind::StaleReference,
            format!("{} is not on the board", source.name),
        ));
    };

    let attack = per_record_attack * matches;
    let health = per_record_health * matches;
    let buffed = apply_buff(view, &[Target::Minion(source_id)], attack, health);
    if buffed.is_empty() {
        return Err(EffectError::new(
            ErrorKind::StaleReference,
            format!("{} left play before its buff resolved", source.name),
        ));
    }
    Ok(OutcomeData::Buffed {
        targets: buffed,
        attack,
        health,
    })
}
