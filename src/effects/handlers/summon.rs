//! Summoning handlers: token summons, graveyard summons, resurrection.
//!
//! All of these clamp to remaining board capacity. Running out of room is a
//! success with a shortfall, not a failure: the part that fit stays in play.

use crate::cards::CardDefinition;
use crate::history::EffectHistory;
use crate::state::GameView;

use super::super::outcome::{EffectError, EffectResult, ErrorKind, OutcomeData};
use super::super::registry::EffectRegistry;
use super::super::spec::EffectSpec;
use super::super::targeting::Target;

fn summon_copies(view: &mut GameView<'_>, def: &CardDefinition, requested: u32) -> OutcomeData {
    let mut summoned = Vec::new();
    for _ in 0..requested {
        match view.summon(def) {
            Some(id) => summoned.push(id),
            None => break,
        }
    }
    if (summoned.len() as u32) < requested {
        view.log_event(format!(
            "Only {} of {} {} could be summoned.",
            summoned.len(),
            requested,
            def.name
        ));
    }
    OutcomeData::Summoned {
        requested,
        summoned,
    }
}

fn token_definition<'c>(
    view: &GameView<'c>,
    spec: &EffectSpec,
    source: &CardDefinition,
) -> Result<&'c CardDefinition, EffectError> {
    let card = spec.params.card.ok_or_else(|| {
        EffectError::new(
            ErrorKind::HandlerError,
            format!("{} has a summon effect without a token card", source.name),
        )
    })?;
    view.catalog.get(card).ok_or_else(|| {
        EffectError::new(
            ErrorKind::HandlerError,
            format!("{} references unknown token {}", source.name, card),
        )
    })
}

pub(super) fn summon(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    _chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let def = token_definition(view, spec, source)?.clone();
    let requested = spec.params.count.unwrap_or(1);
    Ok(summon_copies(view, &def, requested))
}

/// One token per matching tribe record in dead-unit memory.
pub(super) fn summon_per_fallen(
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
            format!("{} has a per-fallen summon without a tribe", source.name),
        )
    })?;
    let matches = view.fallen.count_by_tribe(tribe) as u32;
    if matches == 0 {
        view.log_event(format!(
            "{} finds no fallen {} to raise.",
            source.name,
            tribe.as_str()
        ));
        return Ok(OutcomeData::Fizzled);
    }
    let def = token_definition(view, spec, source)?.clone();
    Ok(summon_copies(view, &def, matches))
}

/// Summon fresh copies of units remembered in dead-unit memory, optionally
/// filtered by tribe. Records whose card is gone from the catalog are
/// skipped.
pub(super) fn resurrect(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    _chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let records: Vec<_> = match spec.params.tribe {
        Some(tribe) => view.fallen.by_tribe(tribe).into_iter().cloned().collect(),
        None => view.fallen.all(),
    };
    if records.is_empty() {
        view.log_event(format!("{} finds no fallen to resurrect.", source.name));
        return Ok(OutcomeData::Fizzled);
    }

    let requested = records.len() as u32;
    let mut summoned = Vec::new();
    for record in records {
        let Some(def) = view.catalog.get(record.card).cloned() else {
            log::warn!("fallen record for {} has no catalog entry", record.card);
            continue;
        };
        match view.summon(&def) {
            Some(id) => summoned.push(id),
            None => break,
        }
    }
    if (summoned.len() as u32) < requested {
        view.log_event(format!(
            "Only {} of {} fallen could be resurrected.",
            summoned.len(),
            requested
        ));
    }
    Ok(OutcomeData::Summoned {
        requested,
        summoned,
    })
}

#[cfg(test)]
mod tests {
    use super::super::testutil::Fixture;
    use super::*;
    use crate::cards::{CardDefinition, CardId, Tribe};
    use crate::effects::{EffectType, TargetSelector};
    use crate::memory::FallenRecord;
    use crate::core::InstanceId;
    use crate::state::BOARD_LIMIT;

    fn skeleton() -> CardDefinition {
        CardDefinition::minion(CardId::new(50), "Skeleton", 1)
            .with_stats(1, 1)
            .with_tribe(Tribe::Undead)
    }

    fn necromancer() -> CardDefinition {
        CardDefinition::spell(CardId::new(51), "Raise the Dead", 4)
    }

    #[test]
    fn test_summon_clamps_to_board_space() {
        let mut fx = Fixture::new();
        fx.catalog.register(skeleton()).unwrap();
        for n in 0..(BOARD_LIMIT - 2) {
            fx.spawn_plain(&format!("Filler {}", n), 1, 1, true);
        }

        let spec = EffectSpec::new(EffectType::Summon, TargetSelector::None)
            .with_card(CardId::new(50))
            .with_count(3);
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();

        let outcome =
            summon(&mut fx.view(), &spec, &necromancer(), None, &registry, &history).unwrap();
        let OutcomeData::Summoned { requested, summoned } = outcome else {
            panic!("expected Summoned");
        };
        assert_eq!(requested, 3);
        assert_eq!(summoned.len(), 2);
        assert_eq!(fx.current.board.len(), BOARD_LIMIT);
    }

    #[test]
    fn test_summon_unknown_token_fails() {
        let mut fx = Fixture::new();
        let spec = EffectSpec::new(EffectType::Summon, TargetSelector::None)
            .with_card(CardId::new(404));
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();

        let err = summon(&mut fx.view(), &spec, &necromancer(), None, &registry, &history)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::HandlerError);
    }

    #[test]
    fn test_summon_per_fallen_counts_tribe() {
        let mut fx = Fixture::new();
        fx.catalog.register(skeleton()).unwrap();
        for n in 0..2 {
            fx.fallen.record(FallenRecord {
                instance: InstanceId(u64::from(900 + n)),
                card: CardId::new(900 + n),
                name: format!("Fallen {}", n),
                tribe: Some(Tribe::Undead),
                keywords: Vec::new(),
                cost: 2,
                attack: 2,
                health: 2,
                turn: 1,
            });
        }

        let spec = EffectSpec::new(EffectType::SummonPerFallen, TargetSelector::None)
            .with_card(CardId::new(50))
            .with_tribe(Tribe::Undead);
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();

        let outcome =
            summon_per_fallen(&mut fx.view(), &spec, &necromancer(), None, &registry, &history)
                .unwrap();
        let OutcomeData::Summoned { summoned, .. } = outcome else {
            panic!("expected Summoned");
        };
        assert_eq!(summoned.len(), 2);
    }

    #[test]
    fn test_resurrect_empty_memory_fizzles() {
        let mut fx = Fixture::new();
        let spec = EffectSpec::new(EffectType::Resurrect, TargetSelector::None);
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();

        let outcome =
            resurrect(&mut fx.view(), &spec, &necromancer(), None, &registry, &history).unwrap();
        assert_eq!(outcome, OutcomeData::Fizzled);
    }

    #[test]
    fn test_resurrect_summons_remembered_units() {
        let mut fx = Fixture::new();
        fx.catalog.register(skeleton()).unwrap();
        fx.fallen.record(FallenRecord {
            instance: InstanceId(900),
            card: CardId::new(50),
            name: "Skeleton".to_string(),
            tribe: Some(Tribe::Undead),
            keywords: Vec::new(),
            cost: 1,
            attack: 1,
            health: 1,
            turn: 1,
        });

        let spec = EffectSpec::new(EffectType::Resurrect, TargetSelector::None);
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();

        let outcome =
            resurrect(&mut fx.view(), &spec, &necromancer(), None, &registry, &history).unwrap();
        let OutcomeData::Summoned { summoned, .. } = outcome else {
            panic!("expected Summoned");
        };
        assert_eq!(summoned.len(), 1);
        assert_eq!(fx.current.board[0].card.name, "Skeleton");
    }
}
