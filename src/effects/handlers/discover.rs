//! Discover and adapt handlers.
//!
//! Both present choices drawn from a shuffled pool. Discover hands the
//! choice to the host through a [`DiscoverPresentation`]; adapt resolves the
//! pick inside the engine, uniformly among the presented options.

use crate::cards::{CardDefinition, Keyword};
use crate::history::EffectHistory;
use crate::state::{CardInstance, GameView};

use super::super::outcome::{
    DiscoverPresentation, EffectError, EffectResult, ErrorKind, OutcomeData,
};
use super::super::registry::EffectRegistry;
use super::super::spec::EffectSpec;
use super::super::targeting::Target;

/// Options shown per discover or adapt roll.
const OPTIONS_SHOWN: usize = 3;

pub(super) fn discover(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    _chosen: Option<Target>,
    _registry: &EffectRegistry,
    history: &EffectHistory,
) -> EffectResult {
    let mut pool: Vec<_> = match spec.params.tribe {
        Some(tribe) => view.catalog.query_by_tag(tribe.as_str()).to_vec(),
        None => view.catalog.query_by_predicate(|_| true),
    };
    if pool.is_empty() {
        view.log_event(format!("{} found nothing to discover.", source.name));
        return Ok(OutcomeData::Fizzled);
    }

    view.rng.shuffle(&mut pool);
    pool.truncate(OPTIONS_SHOWN);

    let presentation = DiscoverPresentation {
        // Sequence numbers are unique per invocation, which makes them a
        // usable presentation handle without a second counter.
        id: history.next_seq() as u32,
        options: pool,
    };
    view.log_event(format!(
        "{} offers a choice of {} cards.",
        source.name,
        presentation.options.len()
    ));
    Ok(OutcomeData::Discover { presentation })
}

/// The ten adaptations a unit can roll.
const ADAPTATIONS: [&str; 10] = [
    "crackling_shield",
    "flaming_claws",
    "lightning_speed",
    "liquid_membrane",
    "living_spores",
    "massive",
    "poison_spit",
    "rocky_carapace",
    "swift_legs",
    "volcanic_might",
];

fn apply_adaptation(minion: &mut CardInstance, adaptation: &str) {
    match adaptation {
        "crackling_shield" => minion.grant_keyword(Keyword::DivineShield),
        "flaming_claws" => minion.buff(3, 0),
        "lightning_speed" => minion.grant_keyword(Keyword::Windfury),
        "liquid_membrane" => minion.grant_keyword(Keyword::Stealth),
        "living_spores" => minion.buff(1, 1),
        "massive" => minion.grant_keyword(Keyword::Taunt),
        "poison_spit" => minion.grant_keyword(Keyword::Lifesteal),
        "rocky_carapace" => minion.buff(0, 3),
        "swift_legs" => minion.grant_keyword(Keyword::Rush),
        "volcanic_might" => minion.buff(2, 2),
        other => log::warn!("unknown adaptation '{}'", other),
    }
}

/// Roll `count` adaptations for the source unit.
///
/// Each roll presents three options not yet applied within this invocation
/// and picks one uniformly. Host-driven adapt choice is out of scope; the
/// pick itself still consumes the shared RNG so replays stay deterministic.
pub(super) fn adapt(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    _chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let Some(source_id) = view.source else {
        return Err(EffectError::new(
            ErrorKind::StaleReference,
            format!("{} is not on the board", source.name),
        ));
    };
    if view.minion(source_id).is_none() {
        return Err(EffectError::new(
            ErrorKind::StaleReference,
            format!("{} left play before adapting", source.name),
        ));
    }

    let rolls = spec.params.count.unwrap_or(1);
    let mut applied: Vec<String> = Vec::new();
    for _ in 0..rolls {
        let mut remaining: Vec<&str> = ADAPTATIONS
            .iter()
            .copied()
            .filter(|a| !applied.iter().any(|done| done == a))
            .collect();
        if remaining.is_empty() {
            break;
        }
        view.rng.shuffle(&mut remaining);
        let presented = &remaining[..remaining.len().min(OPTIONS_SHOWN)];
        let Some(&pick) = view.rng.choose(presented) else {
            break;
        };

        if let Some(minion) = view.minion_mut(source_id) {
            apply_adaptation(minion, pick);
            let name = minion.card.name.clone();
            view.log_event(format!("{} adapted: {}.", name, pick));
        }
        applied.push(pick.to_string());
    }

    Ok(OutcomeData::Adapted { applied })
}
