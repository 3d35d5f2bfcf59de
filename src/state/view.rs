//! The game view.
//!
//! `GameView` is the transient façade handed to effect handlers for one
//! resolution. It borrows exactly the state a handler is allowed to touch:
//! both player states (from the acting player's perspective), the catalog,
//! dead-unit memory, the shared RNG, the event log, and the instance id
//! generator. Handlers never see the engine itself, so a handler cannot
//! start a nested resolution or reach into orchestrator state.

use crate::cards::CardDefinition;
use crate::cards::CardId;
use crate::core::{EventLog, GameRng, InstanceId, InstanceIdGen};
use crate::effects::{Target, TargetSelector};
use crate::memory::DeadUnitMemory;

use super::instance::CardInstance;
use super::player::{PlayerState, BOARD_LIMIT, HAND_LIMIT};

/// Mutable window onto the game for one effect resolution.
pub struct GameView<'a> {
    /// The acting player.
    pub current: &'a mut PlayerState,
    /// The acting player's opponent.
    pub opponent: &'a mut PlayerState,
    pub catalog: &'a crate::cards::CardCatalog,
    /// The acting player's dead-unit memory.
    pub fallen: &'a DeadUnitMemory,
    pub rng: &'a mut GameRng,
    pub log: &'a mut EventLog,
    pub ids: &'a mut InstanceIdGen,
    /// Current turn number, for log entries.
    pub turn: u32,
    /// Instance whose effect is resolving, when it came from a board unit.
    pub source: Option<InstanceId>,
}

impl<'a> GameView<'a> {
    /// Append a gameplay event to the log.
    pub fn log_event(&mut self, message: impl Into<String>) {
        self.log.push(self.turn, message);
    }

    /// Find a minion on either board.
    #[must_use]
    pub fn minion(&self, id: InstanceId) -> Option<&CardInstance> {
        self.current.minion(id).or_else(|| self.opponent.minion(id))
    }

    /// Find a minion on either board, mutably.
    pub fn minion_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        if self.current.minion(id).is_some() {
            return self.current.minion_mut(id);
        }
        self.opponent.minion_mut(id)
    }

    /// Deal damage to a target.
    ///
    /// Divine shield consumes the entire hit. Heroes lose armor before
    /// health. A dead minion is logged but stays on the board; removal is a
    /// separate cleanup pass so that simultaneous deaths resolve against a
    /// stable board.
    ///
    /// Returns the damage that actually reached armor or health, or `None`
    /// if the target no longer resolves.
    pub fn deal_damage(&mut self, target: Target, amount: i32) -> Option<i32> {
        let amount = amount.max(0);
        match target {
            Target::FriendlyHero | Target::EnemyHero => {
                let (player, label) = if target == Target::FriendlyHero {
                    (&mut *self.current, "friendly")
                } else {
                    (&mut *self.opponent, "enemy")
                };
                let absorbed = amount.min(player.armor);
                player.armor -= absorbed;
                let to_health = amount - absorbed;
                player.health -= to_health;
                let name = player.name.clone();
                let health = player.health;
                self.log_event(format!(
                    "{} ({} hero) took {} damage ({} to armor), now at {} health.",
                    name, label, amount, absorbed, health
                ));
                Some(amount)
            }
            Target::Minion(id) => {
                let minion = self.minion_mut(id)?;
                if minion.shielded {
                    minion.shielded = false;
                    let name = minion.card.name.clone();
                    self.log_event(format!(
                        "{}'s divine shield absorbed {} damage.",
                        name, amount
                    ));
                    return Some(0);
                }
                minion.health -= amount;
                let name = minion.card.name.clone();
                let health = minion.health;
                self.log_event(format!(
                    "{} took {} damage, now at {} health.",
                    name, amount, health
                ));
                if health <= 0 {
                    self.log_event(format!("{} died.", name));
                }
                Some(amount)
            }
        }
    }

    /// Heal a target, clamping to its maximum.
    ///
    /// Returns the health actually restored (post-clamp), or `None` if the
    /// target no longer resolves.
    pub fn heal(&mut self, target: Target, amount: i32) -> Option<i32> {
        let amount = amount.max(0);
        match target {
            Target::FriendlyHero | Target::EnemyHero => {
                let player = if target == Target::FriendlyHero {
                    &mut *self.current
                } else {
                    &mut *self.opponent
                };
                let healed = amount.min(player.max_health - player.health);
                player.health += healed;
                let name = player.name.clone();
                let health = player.health;
                self.log_event(format!(
                    "{} healed for {}, now at {} health.",
                    name, healed, health
                ));
                Some(healed)
            }
            Target::Minion(id) => {
                let minion = self.minion_mut(id)?;
                let healed = amount.min(minion.max_health - minion.health);
                minion.health += healed;
                let name = minion.card.name.clone();
                let health = minion.health;
                self.log_event(format!(
                    "{} healed for {}, now at {} health.",
                    name, healed, health
                ));
                Some(healed)
            }
        }
    }

    /// Grant armor to the acting player's hero.
    pub fn gain_armor(&mut self, amount: i32) {
        let amount = amount.max(0);
        self.current.armor += amount;
        let name = self.current.name.clone();
        let armor = self.current.armor;
        self.log_event(format!("{} gained {} armor, now at {}.", name, amount, armor));
    }

    /// Draw up to `n` cards for the acting player.
    ///
    /// An empty deck logs fatigue and skips the draw; a full hand burns the
    /// card. Only cards that actually reached the hand are returned.
    pub fn draw_cards(&mut self, n: u32) -> Vec<CardId> {
        let mut drawn = Vec::new();
        for _ in 0..n {
            if self.current.deck.is_empty() {
                self.current.fatigue += 1;
                let name = self.current.name.clone();
                self.log_event(format!("{} has no cards left to draw.", name));
                continue;
            }
            let card = self.current.deck.remove(0);
            if self.current.hand.len() >= HAND_LIMIT {
                self.current.graveyard.push(card);
                let name = self.card_name(card);
                self.log_event(format!("{} burned: hand is full.", name));
                continue;
            }
            self.current.hand.push(card);
            self.current.cards_drawn_this_turn += 1;
            drawn.push(card);
            let name = self.card_name(card);
            self.log_event(format!("Drew {}.", name));
        }
        drawn
    }

    fn card_name(&self, card: CardId) -> String {
        self.catalog
            .get(card)
            .map_or_else(|| format!("{}", card), |def| def.name.clone())
    }

    /// Summon a fresh instance of `def` onto the acting board.
    ///
    /// Returns `None` when the board is full.
    pub fn summon(&mut self, def: &CardDefinition) -> Option<InstanceId> {
        if self.current.board.len() >= BOARD_LIMIT {
            self.log_event(format!("No room to summon {}.", def.name));
            return None;
        }
        let id = self.ids.alloc();
        let instance = CardInstance::new(id, def.clone());
        self.log_event(format!("Summoned {}.", instance));
        self.current.board.push(instance);
        Some(id)
    }

    /// Resolve a selector to concrete target handles.
    ///
    /// Dead (zero-health) minions are excluded. Stealthed minions are
    /// excluded from the opposing side's view, so enemy-facing and random
    /// selectors never pick them; a player's own effects still can. Random
    /// selectors consume the shared RNG. Unknown custom tags resolve to an
    /// empty set with a diagnostic, never an error.
    pub fn resolve_targets(
        &mut self,
        selector: &TargetSelector,
        source: Option<InstanceId>,
    ) -> Vec<Target> {
        let friendly: Vec<Target> = self
            .current
            .board
            .iter()
            .filter(|m| !m.is_dead())
            .map(|m| Target::Minion(m.id))
            .collect();
        let enemy: Vec<Target> = self
            .opponent
            .board
            .iter()
            .filter(|m| !m.is_dead() && !m.stealthed)
            .map(|m| Target::Minion(m.id))
            .collect();

        match selector {
            TargetSelector::None => Vec::new(),
            TargetSelector::SourceSelf => source.map(Target::Minion).into_iter().collect(),
            TargetSelector::FriendlyHero => vec![Target::FriendlyHero],
            TargetSelector::EnemyHero => vec![Target::EnemyHero],
            TargetSelector::AnyHero => vec![Target::FriendlyHero, Target::EnemyHero],
            TargetSelector::FriendlyMinion => friendly,
            TargetSelector::EnemyMinion => enemy,
            TargetSelector::AnyMinion => {
                let mut all = friendly;
                all.extend(enemy);
                all
            }
            TargetSelector::FriendlyCharacter => {
                let mut all = vec![Target::FriendlyHero];
                all.extend(friendly);
                all
            }
            TargetSelector::EnemyCharacter => {
                let mut all = vec![Target::EnemyHero];
                all.extend(enemy);
                all
            }
            TargetSelector::Any => {
                let mut all = vec![Target::FriendlyHero, Target::EnemyHero];
                all.extend(friendly);
                all.extend(enemy);
                all
            }
            TargetSelector::RandomMinion => {
                let mut all = friendly;
                all.extend(enemy);
                self.rng.choose(&all).copied().into_iter().collect()
            }
            TargetSelector::RandomEnemyMinion => {
                self.rng.choose(&enemy).copied().into_iter().collect()
            }
            TargetSelector::RandomFriendlyMinion => {
                self.rng.choose(&friendly).copied().into_iter().collect()
            }
            TargetSelector::AdjacentMinions => {
                let Some(source) = source else {
                    return Vec::new();
                };
                let Some(idx) = self.current.minion_index(source) else {
                    return Vec::new();
                };
                let mut adjacent = Vec::new();
                if idx > 0 {
                    adjacent.push(Target::Minion(self.current.board[idx - 1].id));
                }
                if idx + 1 < self.current.board.len() {
                    adjacent.push(Target::Minion(self.current.board[idx + 1].id));
                }
                adjacent
            }
            TargetSelector::Custom(tag) => {
                log::warn!("unrecognized target selector tag '{}'", tag);
                Vec::new()
            }
        }
    }
}
