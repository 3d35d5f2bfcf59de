//! Engine-level tests for trigger orchestration: marker-keyword passes,
//! doubling as a two-phase continuation, and history recording.

use tavern_core::cards::{CardCatalog, CardDefinition, CardId, Keyword, Rarity, Tribe};
use tavern_core::effects::{
    EffectSpec, EffectType, ErrorKind, OutcomeData, Target, TargetSelector,
};
use tavern_core::Engine;

fn echo_shade() -> CardDefinition {
    CardDefinition::minion(CardId::new(1), "Echo Shade", 3)
        .with_stats(2, 4)
        .with_keyword(Keyword::EchoesTriggers)
}

fn fire_imp() -> CardDefinition {
    CardDefinition::minion(CardId::new(2), "Fire Imp", 1)
        .with_stats(2, 1)
        .with_on_play(
            EffectSpec::new(EffectType::Damage, TargetSelector::FriendlyMinion)
                .with_amount(1)
                .requiring_target(),
        )
}

fn engine_with(cards: Vec<CardDefinition>) -> Engine {
    let mut catalog = CardCatalog::new();
    for card in cards {
        catalog.register(card).unwrap();
    }
    let mut engine = Engine::new(catalog, ["Aria", "Borin"], 99);
    engine.new_game([Vec::new(), Vec::new()]);
    engine
}

#[test]
fn doubling_resolves_twice_with_fresh_targets() {
    let mut engine = engine_with(vec![echo_shade(), fire_imp()]);
    engine.player_mut(0).hand.push(CardId::new(1));
    engine.player_mut(0).hand.push(CardId::new(2));

    engine.play_card(0, None).unwrap();
    let shade = engine.player(0).board[0].id;

    let report = engine.play_card(0, Some(Target::Minion(shade))).unwrap();
    assert!(report.doubled);
    // Only the first resolution has happened so far.
    assert_eq!(engine.player(0).minion(shade).unwrap().health, 3);

    let second = engine.presentation_complete().unwrap().unwrap();
    assert!(matches!(second, OutcomeData::DamageDealt { .. }));
    assert!(engine.presentation_complete().is_none());

    let damage_entries = engine
        .event_log()
        .entries()
        .iter()
        .filter(|e| e.message.contains("took 1 damage"))
        .count();
    assert_eq!(damage_entries, 2);
}

#[test]
fn no_doubling_without_marker() {
    let mut engine = engine_with(vec![fire_imp()]);
    engine.player_mut(0).hand.push(CardId::new(2));
    engine.player_mut(0).hand.push(CardId::new(2));
    engine.play_card(0, None).unwrap();
    let first = engine.player(0).board[0].id;

    let report = engine.play_card(0, Some(Target::Minion(first))).unwrap();
    assert!(!report.doubled);
    assert!(engine.presentation_complete().is_none());
}

#[test]
fn silenced_marker_does_not_double() {
    let mut engine = engine_with(vec![echo_shade(), fire_imp()]);
    engine.player_mut(0).hand.push(CardId::new(1));
    engine.player_mut(0).hand.push(CardId::new(2));
    engine.play_card(0, None).unwrap();
    let shade = engine.player(0).board[0].id;
    engine.player_mut(0).minion_mut(shade).unwrap().silence();

    let report = engine.play_card(0, Some(Target::Minion(shade))).unwrap();
    assert!(!report.doubled);
}

#[test]
fn play_blocked_while_doubling_pending() {
    let mut engine = engine_with(vec![echo_shade(), fire_imp()]);
    engine.player_mut(0).hand.push(CardId::new(1));
    engine.player_mut(0).hand.push(CardId::new(2));
    engine.player_mut(0).hand.push(CardId::new(2));
    engine.play_card(0, None).unwrap();
    let shade = engine.player(0).board[0].id;
    engine.play_card(0, Some(Target::Minion(shade))).unwrap();

    let err = engine.play_card(0, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::HandlerError);
    assert!(err.message.contains("pending"));

    engine.presentation_complete().unwrap().unwrap();
    engine.play_card(0, Some(Target::Minion(shade))).unwrap();
}

#[test]
fn end_turn_cancels_pending_doubling() {
    let mut engine = engine_with(vec![echo_shade(), fire_imp()]);
    engine.player_mut(0).hand.push(CardId::new(1));
    engine.player_mut(0).hand.push(CardId::new(2));
    engine.play_card(0, None).unwrap();
    let shade = engine.player(0).board[0].id;
    engine.play_card(0, Some(Target::Minion(shade))).unwrap();

    engine.end_turn();
    assert!(engine.presentation_complete().is_none());
}

#[test]
fn rally_marker_gains_stats_on_play() {
    let rallier = CardDefinition::minion(CardId::new(3), "Crowd Cheerer", 2)
        .with_stats(2, 2)
        .with_keyword(Keyword::RallyOnTrigger);
    let mut engine = engine_with(vec![rallier, fire_imp()]);
    engine.player_mut(0).hand.push(CardId::new(3));
    engine.player_mut(0).hand.push(CardId::new(2));
    engine.play_card(0, None).unwrap();
    let cheerer = engine.player(0).board[0].id;

    engine.play_card(0, Some(Target::Minion(cheerer))).unwrap();

    // +1/+1 from the rally pass, then 1 damage from the imp's effect.
    let minion = engine.player(0).minion(cheerer).unwrap();
    assert_eq!(minion.attack, 3);
    assert_eq!(minion.health, 2);
    assert!(engine
        .event_log()
        .entries()
        .iter()
        .any(|e| e.message.contains("rallies")));
}

#[test]
fn inheritance_marker_copies_combat_keywords() {
    let heir = CardDefinition::minion(CardId::new(4), "Mimic Ooze", 2)
        .with_stats(1, 3)
        .with_keyword(Keyword::InheritsKeywords);
    let shielded = CardDefinition::minion(CardId::new(5), "Shieldbearer", 3)
        .with_stats(2, 4)
        .with_keyword(Keyword::DivineShield)
        .with_keyword(Keyword::Taunt)
        .with_on_play(EffectSpec::new(EffectType::GainArmor, TargetSelector::None).with_amount(2));
    let mut engine = engine_with(vec![heir, shielded]);
    engine.player_mut(0).hand.push(CardId::new(4));
    engine.player_mut(0).hand.push(CardId::new(5));
    engine.play_card(0, None).unwrap();
    let ooze = engine.player(0).board[0].id;

    engine.play_card(0, None).unwrap();

    let minion = engine.player(0).minion(ooze).unwrap();
    assert!(minion.has_keyword(Keyword::DivineShield));
    assert!(minion.has_keyword(Keyword::Taunt));
    assert!(!minion.has_keyword(Keyword::Lifesteal));
}

#[test]
fn history_records_invocations_in_order() {
    let mut engine = engine_with(vec![fire_imp()]);
    engine.player_mut(0).hand.push(CardId::new(2));
    engine.player_mut(0).hand.push(CardId::new(2));
    engine.play_card(0, None).unwrap();
    let first = engine.player(0).board[0].id;
    engine.play_card(0, Some(Target::Minion(first))).unwrap();

    // The first imp, played alone, picked itself as the only valid target;
    // both plays recorded, in order.
    let records = engine.history().records();
    assert_eq!(records.len(), 2);
    assert!(records[0].seq < records[1].seq);
    assert_eq!(records[1].source, CardId::new(2));
    assert_eq!(records[1].source_rarity, Rarity::Common);
    assert_eq!(records[1].chosen, Some(Target::Minion(first)));
}

#[test]
fn failed_invocation_still_leaves_a_record() {
    let bolt = CardDefinition::spell(CardId::new(9), "Searing Bolt", 1).with_on_cast(
        EffectSpec::new(EffectType::Damage, TargetSelector::EnemyMinion).with_amount(3),
    );
    let mut engine = engine_with(vec![bolt]);
    engine.player_mut(0).hand.push(CardId::new(9));

    // No enemy minions: the resolution fails and the play unwinds.
    let err = engine.play_card(0, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoValidTargets);
    assert_eq!(engine.player(0).hand, vec![CardId::new(9)]);
    assert!(engine.player(0).graveyard.is_empty());

    // The attempt is recorded before dispatch, so it survives the unwind.
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.history().records()[0].source, CardId::new(9));
}

#[test]
fn doubled_discover_waits_for_the_first_choice() {
    let caller = CardDefinition::minion(CardId::new(10), "Beast Caller", 2)
        .with_stats(2, 2)
        .with_on_play(
            EffectSpec::new(EffectType::Discover, TargetSelector::None).with_tribe(Tribe::Beast),
        );
    let mut cards = vec![echo_shade(), caller];
    for n in 0..5u32 {
        cards.push(
            CardDefinition::minion(CardId::new(20 + n), format!("Beast {}", n), 2)
                .with_stats(2, 2)
                .with_tribe(Tribe::Beast),
        );
    }
    let mut engine = engine_with(cards);
    engine.player_mut(0).hand.push(CardId::new(1));
    engine.player_mut(0).hand.push(CardId::new(10));
    engine.play_card(0, None).unwrap();

    let report = engine.play_card(0, None).unwrap();
    assert!(report.doubled);
    let OutcomeData::Discover { presentation } = report.outcome else {
        panic!("expected Discover, got {:?}", report.outcome);
    };

    // The echoed invocation may not run over the unanswered choice; doing
    // so would replace it with a fresh presentation.
    let err = engine.presentation_complete().unwrap().unwrap_err();
    assert_eq!(err.kind, ErrorKind::HandlerError);
    assert!(err.message.contains("discover"));
    engine.choose_discover(presentation.id, 0).unwrap();

    let second = engine.presentation_complete().unwrap().unwrap();
    let OutcomeData::Discover {
        presentation: second,
    } = second
    else {
        panic!("expected a second Discover");
    };
    assert_ne!(second.id, presentation.id);
    engine.choose_discover(second.id, 0).unwrap();
    assert!(engine.presentation_complete().is_none());
}

#[test]
fn replay_invocations_are_not_recorded() {
    let echo_spell = CardDefinition::spell(CardId::new(6), "Echoes of Battle", 4).with_on_cast(
        EffectSpec::new(EffectType::ReplayTriggers, TargetSelector::None).with_count(2),
    );
    let zap = CardDefinition::spell(CardId::new(7), "Zap", 1)
        .with_on_cast(EffectSpec::new(EffectType::Damage, TargetSelector::EnemyHero).with_amount(1));
    let mut engine = engine_with(vec![echo_spell, zap]);
    engine.player_mut(0).hand.push(CardId::new(7));
    engine.player_mut(0).hand.push(CardId::new(6));

    engine.play_card(0, None).unwrap();
    assert_eq!(engine.history().len(), 1);

    let report = engine.play_card(0, None).unwrap();
    assert_eq!(report.outcome, OutcomeData::Replayed { count: 1 });
    // The zap hit the enemy hero again; the replay itself left no record.
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.player(1).health, 28);
}

#[test]
fn stale_instance_is_rejected_without_mutation() {
    // An on-play spec can only be resolved for an instance on the acting
    // board; the engine guards this, so force it through a death first.
    let collector = CardDefinition::minion(CardId::new(8), "Grave Watcher", 3)
        .with_stats(2, 2)
        .with_on_death(
            EffectSpec::new(EffectType::Damage, TargetSelector::EnemyHero).with_amount(2),
        );
    let mut engine = engine_with(vec![collector]);
    engine.player_mut(0).hand.push(CardId::new(8));
    engine.play_card(0, None).unwrap();
    let id = engine.player(0).board[0].id;
    engine.player_mut(0).minion_mut(id).unwrap().health = 0;

    engine.resolve_death(id).unwrap();
    assert_eq!(engine.player(1).health, 28);

    let err = engine.resolve_death(id).unwrap_err();
    assert_eq!(err.kind, ErrorKind::StaleReference);
    assert_eq!(engine.player(1).health, 28);
}
