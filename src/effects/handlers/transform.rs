//! Transform and deck-manipulation handlers.

use crate::cards::CardDefinition;
use crate::history::EffectHistory;
use crate::state::{CardInstance, GameView};

use super::super::outcome::{EffectError, EffectResult, ErrorKind, OutcomeData};
use super::super::registry::EffectRegistry;
use super::super::spec::EffectSpec;
use super::super::targeting::Target;
use super::effect_targets;

/// Replace a minion in place with a fresh instance of another card.
///
/// The replacement keeps the board position but gets a new instance id;
/// handles to the old unit go stale, which is what transform means.
pub(super) fn transform(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let into = spec.params.card.ok_or_else(|| {
        EffectError::new(
            ErrorKind::HandlerError,
            format!("{} has a transform effect without a result card", source.name),
        )
    })?;
    let new_def = view
        .catalog
        .get(into)
        .ok_or_else(|| {
            EffectError::new(
                ErrorKind::HandlerError,
                format!("{} transforms into unknown card {}", source.name, into),
            )
        })?
        .clone();

    let targets = effect_targets(view, spec, chosen);
    let Some(Target::Minion(from)) = targets.first().copied() else {
        return Err(EffectError::new(
            ErrorKind::NoValidTargets,
            format!("{} found no minion to transform", source.name),
        ));
    };

    let new_id = view.ids.alloc();
    let replacement = CardInstance::new(new_id, new_def);
    for player in [&mut *view.current, &mut *view.opponent] {
        if let Some(idx) = player.minion_index(from) {
            let old_name = player.board[idx].card.name.clone();
            let line = format!("{} was transformed into {}.", old_name, replacement.card.name);
            player.board[idx] = replacement;
            view.log.push(view.turn, line);
            return Ok(OutcomeData::Transformed { from, into });
        }
    }
    Err(EffectError::new(
        ErrorKind::StaleReference,
        format!("{}'s target is no longer in play", source.name),
    ))
}

/// Shuffle copies of a card into the acting player's deck.
pub(super) fn shuffle_into_deck(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    _chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let card = spec.params.card.ok_or_else(|| {
        EffectError::new(
            ErrorKind::HandlerError,
            format!("{} shuffles in an unspecified card", source.name),
        )
    })?;
    let count = spec.params.count.unwrap_or(1);

    for _ in 0..count {
        let slot = view.rng.gen_range_usize(0..view.current.deck.len() + 1);
        view.current.deck.insert(slot, card);
    }
    let name = view
        .catalog
        .get(card)
        .map_or_else(|| format!("{}", card), |def| def.name.clone());
    view.log_event(format!(
        "{} copies of {} were shuffled into the deck.",
        count, name
    ));
    Ok(OutcomeData::Shuffled { count })
}

#[cfg(test)]
mod tests {
    use super::super::testutil::Fixture;
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::effects::{EffectType, TargetSelector};

    fn sheep() -> CardDefinition {
        CardDefinition::minion(CardId::new(60), "Sheep", 1).with_stats(1, 1)
    }

    #[test]
    fn test_transform_replaces_in_place() {
        let mut fx = Fixture::new();
        fx.catalog.register(sheep()).unwrap();
        let left = fx.spawn_plain("Left", 1, 1, false);
        let target = fx.spawn_plain("Ogre", 6, 7, false);
        let right = fx.spawn_plain("Right", 1, 1, false);

        let spec = EffectSpec::new(EffectType::Transform, TargetSelector::EnemyMinion)
            .with_card(CardId::new(60))
            .requiring_target();
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();
        let source = CardDefinition::spell(CardId::new(61), "Sheep Shot", 4);

        let outcome = transform(
            &mut fx.view(),
            &spec,
            &source,
            Some(Target::Minion(target)),
            &registry,
            &history,
        )
        .unwrap();

        assert_eq!(
            outcome,
            OutcomeData::Transformed {
                from: target,
                into: CardId::new(60)
            }
        );
        assert_eq!(fx.opponent.board.len(), 3);
        assert_eq!(fx.opponent.board[1].card.name, "Sheep");
        assert_eq!(fx.opponent.board[0].id, left);
        assert_eq!(fx.opponent.board[2].id, right);
        assert!(fx.opponent.minion(target).is_none());
    }

    #[test]
    fn test_transform_stale_target() {
        let mut fx = Fixture::new();
        fx.catalog.register(sheep()).unwrap();
        let spec = EffectSpec::new(EffectType::Transform, TargetSelector::EnemyMinion)
            .with_card(CardId::new(60))
            .requiring_target();
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();
        let source = CardDefinition::spell(CardId::new(61), "Sheep Shot", 4);

        let err = transform(
            &mut fx.view(),
            &spec,
            &source,
            Some(Target::Minion(crate::core::InstanceId(999))),
            &registry,
            &history,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StaleReference);
    }

    #[test]
    fn test_shuffle_into_deck() {
        let mut fx = Fixture::new();
        fx.catalog.register(sheep()).unwrap();
        fx.current.deck = vec![CardId::new(1), CardId::new(2)];

        let spec = EffectSpec::new(EffectType::ShuffleIntoDeck, TargetSelector::None)
            .with_card(CardId::new(60))
            .with_count(3);
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();
        let source = CardDefinition::spell(CardId::new(61), "Seeding", 2);

        let outcome =
            shuffle_into_deck(&mut fx.view(), &spec, &source, None, &registry, &history).unwrap();
        assert_eq!(outcome, OutcomeData::Shuffled { count: 3 });
        assert_eq!(fx.current.deck.len(), 5);
        assert_eq!(
            fx.current
                .deck
                .iter()
                .filter(|&&c| c == CardId::new(60))
                .count(),
            3
        );
    }
}
