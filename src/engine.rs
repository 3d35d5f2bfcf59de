//! The per-game engine.
//!
//! `Engine` owns one of every stateful component and is the only surface a
//! host talks to. There are no process-wide singletons; two concurrent
//! games are two `Engine` values. Inbound calls are `play_card`,
//! `choose_discover`, `presentation_complete`, `resolve_death`, and the
//! turn/game lifecycle; outbound the host reads the [`TriggerReport`] and
//! drains new event-log entries.
//!
//! Failure semantics: a failed or panicking resolution restores both player
//! states, the RNG, and the log to exactly what they were before the call.
//! A play that fails is a play that did not happen.

use crate::cards::{CardCatalog, CardCategory, CardDefinition, CardId};
use crate::core::{EventLog, GameRng, GameRngState, InstanceId, InstanceIdGen, LogEntry};
use crate::effects::{
    DiscoverPresentation, EffectCategory, EffectError, EffectRegistry, EffectResult, EffectSpec,
    ErrorKind, OutcomeData, Target,
};
use crate::history::EffectHistory;
use crate::memory::DeadUnitMemory;
use crate::state::{CardInstance, GameView, PlayerState};
use crate::trigger::{TriggerOrchestrator, TriggerReport};

/// Index of a player within the engine. 0 and 1.
pub type Side = usize;

/// One running game.
pub struct Engine {
    catalog: CardCatalog,
    registry: EffectRegistry,
    orchestrator: TriggerOrchestrator,
    players: [PlayerState; 2],
    fallen: [DeadUnitMemory; 2],
    rng: GameRng,
    log: EventLog,
    ids: InstanceIdGen,
    active: Side,
    turn: u32,
    pending_discover: Option<DiscoverPresentation>,
    winner: Option<Side>,
}

impl Engine {
    /// Build an engine over a catalog with the built-in handler set.
    #[must_use]
    pub fn new(catalog: CardCatalog, names: [&str; 2], seed: u64) -> Self {
        Self {
            catalog,
            registry: EffectRegistry::with_defaults(),
            orchestrator: TriggerOrchestrator::new(),
            players: [PlayerState::new(names[0]), PlayerState::new(names[1])],
            fallen: [DeadUnitMemory::new(), DeadUnitMemory::new()],
            rng: GameRng::new(seed),
            log: EventLog::new(),
            ids: InstanceIdGen::new(),
            active: 0,
            turn: 1,
            pending_discover: None,
            winner: None,
        }
    }

    /// The dispatch registry, for installing game-specific handlers.
    pub fn registry_mut(&mut self) -> &mut EffectRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn player(&self, side: Side) -> &PlayerState {
        &self.players[side]
    }

    /// Direct mutable access, for hosts that manage zones themselves and
    /// for test setup.
    pub fn player_mut(&mut self, side: Side) -> &mut PlayerState {
        &mut self.players[side]
    }

    #[must_use]
    pub fn fallen(&self, side: Side) -> &DeadUnitMemory {
        &self.fallen[side]
    }

    #[must_use]
    pub fn active_side(&self) -> Side {
        self.active
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn history(&self) -> &EffectHistory {
        self.orchestrator.history()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Event-log entries appended since the host last asked.
    pub fn drain_log(&mut self) -> Vec<LogEntry> {
        self.log.drain_new()
    }

    #[must_use]
    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Start a new game with the given decks. Decks are shuffled and each
    /// player draws an opening hand of three.
    pub fn new_game(&mut self, decks: [Vec<CardId>; 2]) {
        self.orchestrator.clear();
        self.log.clear();
        self.ids = InstanceIdGen::new();
        self.pending_discover = None;
        self.winner = None;
        self.active = 0;
        self.turn = 1;

        for (side, deck) in decks.into_iter().enumerate() {
            let name = self.players[side].name.clone();
            self.players[side] = PlayerState::new(name);
            self.players[side].deck = deck;
            self.rng.shuffle(&mut self.players[side].deck);
            self.fallen[side].clear();
        }
        self.players[0].begin_turn();
        for side in 0..2 {
            for _ in 0..3 {
                if !self.players[side].deck.is_empty() {
                    let card = self.players[side].deck.remove(0);
                    self.players[side].hand.push(card);
                }
            }
        }
        self.log.push(self.turn, "A new game begins.");
    }

    /// Pass the turn to the other player.
    pub fn end_turn(&mut self) {
        self.orchestrator.cancel_pending();
        self.pending_discover = None;
        self.active = 1 - self.active;
        if self.active == 0 {
            self.turn += 1;
        }
        self.players[self.active].begin_turn();
        let name = self.players[self.active].name.clone();
        self.log.push(self.turn, format!("{}'s turn begins.", name));
    }

    /// Concede the game for `side`.
    pub fn concede(&mut self, side: Side) {
        self.orchestrator.cancel_pending();
        self.pending_discover = None;
        self.winner = Some(1 - side);
        let name = self.players[side].name.clone();
        self.log.push(self.turn, format!("{} conceded.", name));
    }

    /// Play the card at `hand_index` of the acting player's hand.
    ///
    /// Minions are placed on the board and their on-play effect resolves
    /// through the orchestrator; spells resolve their cast effect and go to
    /// the graveyard. On any failure the play is fully undone and the card
    /// is back in hand.
    pub fn play_card(
        &mut self,
        hand_index: usize,
        chosen: Option<Target>,
    ) -> Result<TriggerReport, EffectError> {
        if self.orchestrator.has_pending() {
            return Err(EffectError::new(
                ErrorKind::HandlerError,
                "a doubled effect is still pending; call presentation_complete first",
            ));
        }
        if self.pending_discover.is_some() {
            return Err(EffectError::new(
                ErrorKind::HandlerError,
                "a discover choice is still pending; call choose_discover first",
            ));
        }

        let player = &self.players[self.active];
        let Some(&card_id) = player.hand.get(hand_index) else {
            return Err(EffectError::new(
                ErrorKind::StaleReference,
                format!("no card at hand index {}", hand_index),
            ));
        };
        let def = self
            .catalog
            .get(card_id)
            .ok_or_else(|| {
                EffectError::new(
                    ErrorKind::HandlerError,
                    format!("{} is not in the catalog", card_id),
                )
            })?
            .clone();

        if def.category == CardCategory::Minion && !player.has_board_space() {
            return Err(EffectError::new(
                ErrorKind::BoardFull,
                format!("no room on the board for {}", def.name),
            ));
        }

        let actor = self.players[self.active].name.clone();
        let snapshot = self.snapshot();

        self.players[self.active].hand.remove(hand_index);
        self.players[self.active].cards_played_this_turn += 1;

        let result = match def.category {
            CardCategory::Minion => {
                let instance_id = self.ids.alloc();
                let instance = CardInstance::new(instance_id, def.clone());
                self.log
                    .push(self.turn, format!("{} played {}.", actor, instance));
                self.players[self.active].board.push(instance);

                match &def.on_play {
                    Some(spec) => {
                        let spec = spec.clone();
                        self.resolve_guarded(
                            EffectCategory::OnPlay,
                            &spec,
                            &def,
                            Some(instance_id),
                            chosen,
                        )
                    }
                    None => Ok(TriggerReport {
                        outcome: OutcomeData::None,
                        doubled: false,
                    }),
                }
            }
            CardCategory::Spell => {
                self.log
                    .push(self.turn, format!("{} cast {}.", actor, def.name));
                let report = match &def.on_cast {
                    Some(spec) => {
                        let spec = spec.clone();
                        self.resolve_guarded(EffectCategory::SpellCast, &spec, &def, None, chosen)
                    }
                    None => Ok(TriggerReport {
                        outcome: OutcomeData::None,
                        doubled: false,
                    }),
                };
                if report.is_ok() {
                    self.players[self.active].graveyard.push(card_id);
                }
                report
            }
            CardCategory::Weapon | CardCategory::HeroPower => Err(EffectError::new(
                ErrorKind::HandlerError,
                format!("{} cannot be played from hand", def.name),
            )),
        };

        match result {
            Ok(report) => {
                if let OutcomeData::Discover { presentation } = &report.outcome {
                    self.pending_discover = Some(presentation.clone());
                }
                Ok(report)
            }
            Err(err) => {
                self.restore(snapshot);
                self.log
                    .push(self.turn, format!("{} could not resolve.", def.name));
                Err(err)
            }
        }
    }

    /// Advance the doubled invocation scheduled by the last play, if any.
    ///
    /// The host calls this once its presentation of the first resolution is
    /// done. An unanswered discover choice must be resolved first, or a
    /// doubled discover would overwrite it. Returns `None` when nothing was
    /// pending.
    pub fn presentation_complete(&mut self) -> Option<EffectResult> {
        if !self.orchestrator.has_pending() {
            return None;
        }
        if self.pending_discover.is_some() {
            return Some(Err(EffectError::new(
                ErrorKind::HandlerError,
                "a discover choice is still pending; call choose_discover first",
            )));
        }
        let snapshot = self.snapshot();
        let result = {
            let (orchestrator, registry, mut view) = self.parts();
            orchestrator.advance(registry, &mut view)
        }?;
        match &result {
            Ok(outcome) => {
                if let OutcomeData::Discover { presentation } = outcome {
                    self.pending_discover = Some(presentation.clone());
                }
            }
            Err(_) => self.restore(snapshot),
        }
        Some(result)
    }

    /// Answer a pending discover choice.
    ///
    /// The chosen card goes to the acting player's hand; a full hand burns
    /// it instead.
    pub fn choose_discover(
        &mut self,
        presentation_id: u32,
        index: usize,
    ) -> Result<CardId, EffectError> {
        let Some(presentation) = &self.pending_discover else {
            return Err(EffectError::new(
                ErrorKind::StaleReference,
                "no discover choice is pending",
            ));
        };
        if presentation.id != presentation_id {
            return Err(EffectError::new(
                ErrorKind::StaleReference,
                format!("discover presentation {} is not pending", presentation_id),
            ));
        }
        let Some(&card) = presentation.options.get(index) else {
            return Err(EffectError::new(
                ErrorKind::HandlerError,
                format!("discover option {} is out of range", index),
            ));
        };
        self.pending_discover = None;

        let name = self
            .catalog
            .get(card)
            .map_or_else(|| format!("{}", card), |d| d.name.clone());
        if self.players[self.active].has_hand_space() {
            self.players[self.active].hand.push(card);
            self.log.push(self.turn, format!("Discovered {}.", name));
        } else {
            self.players[self.active].graveyard.push(card);
            self.log
                .push(self.turn, format!("{} burned: hand is full.", name));
        }
        Ok(card)
    }

    /// Remove a dead minion from play and resolve its death.
    ///
    /// This is the external cleanup pass: combat or effects mark units dead
    /// (health at or below zero) but leave them on the board; the host calls
    /// this per corpse. Records the unit in its owner's graveyard and
    /// dead-unit memory, then fires its on-death effect.
    pub fn resolve_death(
        &mut self,
        instance: InstanceId,
    ) -> Result<Option<TriggerReport>, EffectError> {
        let located =
            (0..2).find_map(|s| self.players[s].minion_index(instance).map(|idx| (s, idx)));
        let Some((owner, idx)) = located else {
            return Err(EffectError::new(
                ErrorKind::StaleReference,
                format!("{} is not on either board", instance),
            ));
        };
        let unit = self.players[owner].board.remove(idx);

        self.log
            .push(self.turn, format!("{} was destroyed.", unit.card.name));
        self.players[owner].graveyard.push(unit.card.id);
        self.fallen[owner].record(unit.fallen_record(self.turn));

        let spec = match (&unit.card.on_death, unit.silenced) {
            (Some(spec), false) => spec.clone(),
            _ => return Ok(None),
        };

        // The dying unit's owner acts for its death effect.
        let prior_active = self.active;
        self.active = owner;
        let snapshot = self.snapshot();
        let result = self.resolve_guarded(
            EffectCategory::OnDeath,
            &spec,
            &unit.card,
            None,
            None,
        );
        if result.is_err() {
            self.restore(snapshot);
        }
        self.active = prior_active;
        result.map(Some)
    }

    /// Resolve through the orchestrator with panic containment: on a panic
    /// the caller's snapshot semantics apply and a `HandlerError` is
    /// returned.
    fn resolve_guarded(
        &mut self,
        category: EffectCategory,
        spec: &EffectSpec,
        source: &CardDefinition,
        instance: Option<InstanceId>,
        chosen: Option<Target>,
    ) -> Result<TriggerReport, EffectError> {
        let (orchestrator, registry, mut view) = self.parts();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            orchestrator.resolve(registry, &mut view, category, spec, source, instance, chosen)
        }));
        match outcome {
            Ok(result) => result,
            Err(_) => {
                log::error!("resolution of {} panicked", source.name);
                Err(EffectError::new(
                    ErrorKind::HandlerError,
                    format!("resolution of {} panicked", source.name),
                ))
            }
        }
    }

    /// Split borrows for one resolution.
    fn parts(&mut self) -> (&mut TriggerOrchestrator, &EffectRegistry, GameView<'_>) {
        let (left, right) = self.players.split_at_mut(1);
        let (current, opponent) = if self.active == 0 {
            (&mut left[0], &mut right[0])
        } else {
            (&mut right[0], &mut left[0])
        };
        let view = GameView {
            current,
            opponent,
            catalog: &self.catalog,
            fallen: &self.fallen[self.active],
            rng: &mut self.rng,
            log: &mut self.log,
            ids: &mut self.ids,
            turn: self.turn,
            source: None,
        };
        (&mut self.orchestrator, &self.registry, view)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            players: self.players.clone(),
            rng: self.rng.state(),
            ids: self.ids.clone(),
            log_len: self.log.len(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.players = snapshot.players;
        self.rng = GameRng::from_state(&snapshot.rng);
        self.ids = snapshot.ids;
        self.log.truncate(snapshot.log_len);
    }
}

/// Pre-resolution state for failure rollback.
struct Snapshot {
    players: [PlayerState; 2],
    rng: GameRngState,
    ids: InstanceIdGen,
    log_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::effects::{EffectSpec, EffectType, TargetSelector};

    fn engine_with(cards: Vec<CardDefinition>) -> Engine {
        let mut catalog = CardCatalog::new();
        for card in cards {
            catalog.register(card).unwrap();
        }
        let mut engine = Engine::new(catalog, ["Aria", "Borin"], 3);
        engine.new_game([Vec::new(), Vec::new()]);
        engine
    }

    #[test]
    fn test_play_vanilla_minion() {
        let mut engine = engine_with(vec![CardDefinition::minion(CardId::new(1), "Scout", 1)
            .with_stats(2, 1)]);
        engine.player_mut(0).hand.push(CardId::new(1));

        let report = engine.play_card(0, None).unwrap();
        assert_eq!(report.outcome, OutcomeData::None);
        assert!(!report.doubled);
        assert_eq!(engine.player(0).board.len(), 1);
        assert!(engine.player(0).hand.is_empty());
    }

    #[test]
    fn test_play_card_bad_index() {
        let mut engine = engine_with(vec![]);
        let err = engine.play_card(0, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StaleReference);
    }

    #[test]
    fn test_board_full_returns_card_to_hand() {
        let mut engine = engine_with(vec![CardDefinition::minion(CardId::new(1), "Scout", 1)
            .with_stats(2, 1)]);
        for _ in 0..7 {
            engine.player_mut(0).hand.push(CardId::new(1));
            engine.play_card(0, None).unwrap();
        }
        engine.player_mut(0).hand.push(CardId::new(1));

        let err = engine.play_card(0, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BoardFull);
        assert_eq!(engine.player(0).hand.len(), 1);
        assert_eq!(engine.player(0).board.len(), 7);
    }

    #[test]
    fn test_failed_spell_is_fully_undone() {
        let mut engine = engine_with(vec![CardDefinition::spell(CardId::new(2), "Bolt", 1)
            .with_on_cast(
                EffectSpec::new(EffectType::Damage, TargetSelector::EnemyMinion).with_amount(3),
            )]);
        engine.player_mut(0).hand.push(CardId::new(2));
        let log_before = engine.event_log().len();

        // No enemy minions: the damage effect fails and the play unwinds.
        let err = engine.play_card(0, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoValidTargets);
        assert_eq!(engine.player(0).hand, vec![CardId::new(2)]);
        assert!(engine.player(0).graveyard.is_empty());
        assert_eq!(engine.player(0).cards_played_this_turn, 0);
        // Only the failure note remains in the log.
        assert_eq!(engine.event_log().len(), log_before + 1);
    }

    #[test]
    fn test_failed_play_rewinds_rng_stream() {
        let scry = CardDefinition::spell(CardId::new(4), "Scry", 1).with_on_cast(
            EffectSpec::new(EffectType::Custom("scry".into()), TargetSelector::None),
        );
        let mut engine_a = engine_with(vec![scry.clone()]);
        let mut engine_b = engine_with(vec![scry]);
        engine_a.registry_mut().register(
            EffectCategory::SpellCast,
            EffectType::Custom("scry".into()),
            |view, _, _, _, _, _| {
                view.rng.gen_range(0..100);
                Err(EffectError::new(ErrorKind::HandlerError, "the vision fades"))
            },
        );
        engine_a.player_mut(0).hand.push(CardId::new(4));
        engine_a.play_card(0, None).unwrap_err();

        // The failed play rolled the rng back, so both engines shuffle the
        // same deck from the same stream position.
        let deck: Vec<CardId> = (10u32..30).map(CardId::new).collect();
        engine_a.new_game([deck.clone(), Vec::new()]);
        engine_b.new_game([deck, Vec::new()]);
        assert_eq!(engine_a.player(0).deck, engine_b.player(0).deck);
    }

    #[test]
    fn test_resolve_death_records_memory_and_graveyard() {
        let mut engine = engine_with(vec![CardDefinition::minion(CardId::new(1), "Scout", 1)
            .with_stats(2, 1)]);
        engine.player_mut(0).hand.push(CardId::new(1));
        engine.play_card(0, None).unwrap();
        let id = engine.player(0).board[0].id;
        engine.player_mut(0).board[0].health = 0;

        let report = engine.resolve_death(id).unwrap();
        assert!(report.is_none());
        assert!(engine.player(0).board.is_empty());
        assert_eq!(engine.player(0).graveyard, vec![CardId::new(1)]);
        assert_eq!(engine.fallen(0).len(), 1);
        assert_eq!(engine.fallen(0).all()[0].name, "Scout");
    }

    #[test]
    fn test_end_turn_flips_active_and_counts_turns() {
        let mut engine = engine_with(vec![]);
        assert_eq!(engine.active_side(), 0);
        assert_eq!(engine.turn(), 1);

        engine.end_turn();
        assert_eq!(engine.active_side(), 1);
        assert_eq!(engine.turn(), 1);

        engine.end_turn();
        assert_eq!(engine.active_side(), 0);
        assert_eq!(engine.turn(), 2);
    }

    #[test]
    fn test_concede_sets_winner() {
        let mut engine = engine_with(vec![]);
        engine.concede(0);
        assert_eq!(engine.winner(), Some(1));
    }
}
