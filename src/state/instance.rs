//! Live card instances.
//!
//! A `CardInstance` is one concrete copy of a card in play: a stable
//! instance id plus mutable combat state layered over a snapshot of the
//! definition. The snapshot is by value so a live unit keeps its printed
//! text even if the catalog is reloaded mid-game.

use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, Keyword};
use crate::core::InstanceId;
use crate::memory::FallenRecord;

/// A unit or other card in play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Stable per-game identity.
    pub id: InstanceId,
    /// Snapshot of the printed card.
    pub card: CardDefinition,
    /// Current attack.
    pub attack: i32,
    /// Current health.
    pub health: i32,
    /// Current maximum health; healing clamps to this.
    pub max_health: i32,
    /// Divine shield up.
    pub shielded: bool,
    /// Stealthed (hidden from enemy target selection).
    pub stealthed: bool,
    /// Frozen (skips its next attack).
    pub frozen: bool,
    /// Silenced: printed keywords and effects are masked.
    pub silenced: bool,
    /// Cannot attack the turn it entered play, absent Charge or Rush.
    pub summoning_sick: bool,
    /// Attacks made this turn.
    pub attacks_this_turn: u32,
    /// Keywords granted after the card was played.
    pub granted_keywords: Vec<Keyword>,
}

impl CardInstance {
    /// Materialize a definition into a fresh instance.
    ///
    /// Minions without printed stats are rejected by the catalog, so the
    /// zero fallback here only applies to non-minion instances.
    #[must_use]
    pub fn new(id: InstanceId, card: CardDefinition) -> Self {
        let attack = card.attack.unwrap_or(0);
        let health = card.health.unwrap_or(0);
        let shielded = card.has_keyword(Keyword::DivineShield);
        let stealthed = card.has_keyword(Keyword::Stealth);
        Self {
            id,
            card,
            attack,
            health,
            max_health: health,
            shielded,
            stealthed,
            frozen: false,
            silenced: false,
            summoning_sick: true,
            attacks_this_turn: 0,
            granted_keywords: Vec::new(),
        }
    }

    /// Whether the instance carries a keyword right now.
    ///
    /// Silence masks printed keywords but not ones granted afterwards.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        if self.granted_keywords.contains(&keyword) {
            return true;
        }
        !self.silenced && self.card.has_keyword(keyword)
    }

    /// Grant a keyword at runtime.
    pub fn grant_keyword(&mut self, keyword: Keyword) {
        if !self.granted_keywords.contains(&keyword) {
            if keyword == Keyword::DivineShield {
                self.shielded = true;
            }
            if keyword == Keyword::Stealth {
                self.stealthed = true;
            }
            self.granted_keywords.push(keyword);
        }
    }

    /// Permanently raise attack and both current and max health.
    pub fn buff(&mut self, attack: i32, health: i32) {
        self.attack += attack;
        self.max_health += health;
        self.health += health;
    }

    /// Strip printed effects and keywords and revert stat buffs to the
    /// printed values. Damage already taken is not healed back.
    pub fn silence(&mut self) {
        self.silenced = true;
        self.granted_keywords.clear();
        self.shielded = false;
        self.stealthed = false;
        self.attack = self.card.attack.unwrap_or(0);
        self.max_health = self.card.health.unwrap_or(0);
        self.health = self.health.min(self.max_health);
    }

    /// Whether the unit has taken damage.
    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }

    /// Whether the unit is at or below zero health.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Snapshot this unit for dead-unit memory.
    #[must_use]
    pub fn fallen_record(&self, turn: u32) -> FallenRecord {
        FallenRecord {
            instance: self.id,
            card: self.card.id,
            name: self.card.name.clone(),
            tribe: self.card.tribe,
            keywords: self.card.keywords.clone(),
            cost: self.card.cost,
            attack: self.card.attack.unwrap_or(0),
            health: self.card.health.unwrap_or(0),
            turn,
        }
    }
}

impl std::fmt::Display for CardInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/{})", self.card.name, self.attack, self.health)
    }
}
