//! Damage, heal, freeze, silence, and armor handlers.

use smallvec::SmallVec;

use crate::cards::CardDefinition;
use crate::history::EffectHistory;
use crate::state::GameView;

use super::super::outcome::{EffectError, EffectResult, ErrorKind, OutcomeData};
use super::super::registry::EffectRegistry;
use super::super::spec::EffectSpec;
use super::super::targeting::Target;
use super::effect_targets;

pub(super) fn damage(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let amount = spec.params.amount.unwrap_or(0);
    let targets = effect_targets(view, spec, chosen);
    if targets.is_empty() {
        return Err(EffectError::new(
            ErrorKind::NoValidTargets,
            format!("{} found nothing to damage", source.name),
        ));
    }

    let mut hit: SmallVec<[(Target, i32); 2]> = SmallVec::new();
    for target in targets {
        if let Some(dealt) = view.deal_damage(target, amount) {
            hit.push((target, dealt));
        }
    }
    if hit.is_empty() {
        return Err(EffectError::new(
            ErrorKind::StaleReference,
            format!("{}'s target is no longer in play", source.name),
        ));
    }
    Ok(OutcomeData::DamageDealt { targets: hit })
}

pub(super) fn heal(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let amount = spec.params.amount.unwrap_or(0);
    let targets = effect_targets(view, spec, chosen);
    if targets.is_empty() {
        return Err(EffectError::new(
            ErrorKind::NoValidTargets,
            format!("{} found nothing to heal", source.name),
        ));
    }

    let mut healed: SmallVec<[(Target, i32); 2]> = SmallVec::new();
    for target in targets {
        if let Some(delta) = view.heal(target, amount) {
            healed.push((target, delta));
        }
    }
    if healed.is_empty() {
        return Err(EffectError::new(
            ErrorKind::StaleReference,
            format!("{}'s target is no longer in play", source.name),
        ));
    }
    Ok(OutcomeData::Healed { targets: healed })
}

pub(super) fn freeze(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let targets = effect_targets(view, spec, chosen);
    let mut frozen: SmallVec<[Target; 2]> = SmallVec::new();
    for target in &targets {
        let Target::Minion(id) = target else {
            continue;
        };
        if let Some(minion) = view.minion_mut(*id) {
            minion.frozen = true;
            let name = minion.card.name.clone();
            view.log_event(format!("{} is frozen.", name));
            frozen.push(*target);
        }
    }
    if frozen.is_empty() {
        return Err(EffectError::new(
            ErrorKind::NoValidTargets,
            format!("{} found nothing to freeze", source.name),
        ));
    }
    Ok(OutcomeData::Frozen { targets: frozen })
}

pub(super) fn silence(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let targets = effect_targets(view, spec, chosen);
    let mut silenced: SmallVec<[Target; 2]> = SmallVec::new();
    for target in &targets {
        let Target::Minion(id) = target else {
            continue;
        };
        if let Some(minion) = view.minion_mut(*id) {
            minion.silence();
            let name = minion.card.name.clone();
            view.log_event(format!("{} was silenced.", name));
            silenced.push(*target);
        }
    }
    if silenced.is_empty() {
        return Err(EffectError::new(
            ErrorKind::NoValidTargets,
            format!("{} found nothing to silence", source.name),
        ));
    }
    Ok(OutcomeData::Silenced { targets: silenced })
}

pub(super) fn gain_armor(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    _source: &CardDefinition,
    _chosen: Option<Target>,
    _registry: &EffectRegistry,
    _history: &EffectHistory,
) -> EffectResult {
    let amount = spec.params.amount.unwrap_or(0);
    view.gain_armor(amount);
    Ok(OutcomeData::ArmorGained { amount })
}

#[cfg(test)]
mod tests {
    use super::super::testutil::Fixture;
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::effects::{EffectType, TargetSelector};
    use crate::history::EffectHistory;
    use crate::effects::registry::EffectRegistry;

    fn spell() -> CardDefinition {
        CardDefinition::spell(CardId::new(1), "Test Spell", 2)
    }

    #[test]
    fn test_damage_with_chosen_target() {
        let mut fx = Fixture::new();
        let id = fx.spawn_plain("Ogre", 4, 6, false);
        let spec = EffectSpec::new(EffectType::Damage, TargetSelector::Any)
            .with_amount(4)
            .requiring_target();
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();

        let outcome = damage(
            &mut fx.view(),
            &spec,
            &spell(),
            Some(Target::Minion(id)),
            &registry,
            &history,
        )
        .unwrap();

        assert!(matches!(outcome, OutcomeData::DamageDealt { .. }));
        assert_eq!(fx.opponent.minion(id).unwrap().health, 2);
    }

    #[test]
    fn test_damage_no_targets_fails() {
        let mut fx = Fixture::new();
        let spec =
            EffectSpec::new(EffectType::Damage, TargetSelector::EnemyMinion).with_amount(2);
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();

        let err = damage(&mut fx.view(), &spec, &spell(), None, &registry, &history).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoValidTargets);
    }

    #[test]
    fn test_heal_reports_clamped_delta() {
        let mut fx = Fixture::new();
        fx.current.health = 26;
        let spec = EffectSpec::new(EffectType::Heal, TargetSelector::FriendlyHero).with_amount(8);
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();

        let outcome = heal(&mut fx.view(), &spec, &spell(), None, &registry, &history).unwrap();
        let OutcomeData::Healed { targets } = outcome else {
            panic!("expected Healed");
        };
        assert_eq!(targets[0], (Target::FriendlyHero, 4));
    }

    #[test]
    fn test_freeze_skips_heroes() {
        let mut fx = Fixture::new();
        let id = fx.spawn_plain("Yeti", 4, 5, false);
        let spec = EffectSpec::new(EffectType::Freeze, TargetSelector::EnemyCharacter);
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();

        let outcome = freeze(&mut fx.view(), &spec, &spell(), None, &registry, &history).unwrap();
        let OutcomeData::Frozen { targets } = outcome else {
            panic!("expected Frozen");
        };
        assert_eq!(targets.as_slice(), &[Target::Minion(id)]);
        assert!(fx.opponent.minion(id).unwrap().frozen);
    }

    #[test]
    fn test_gain_armor() {
        let mut fx = Fixture::new();
        let spec = EffectSpec::new(EffectType::GainArmor, TargetSelector::None).with_amount(5);
        let registry = EffectRegistry::new();
        let history = EffectHistory::new();

        let outcome =
            gain_armor(&mut fx.view(), &spec, &spell(), None, &registry, &history).unwrap();
        assert_eq!(outcome, OutcomeData::ArmorGained { amount: 5 });
        assert_eq!(fx.current.armor, 5);
    }
}
