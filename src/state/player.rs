//! Per-player state.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Tribe};
use crate::core::InstanceId;

use super::instance::CardInstance;

/// Maximum cards a hand can hold; draws past this burn the card.
pub const HAND_LIMIT: usize = 10;

/// Maximum minions on one board; summons past this are dropped.
pub const BOARD_LIMIT: usize = 7;

/// Mana available to a player this turn.
///
/// `pending_penalty` is mana already committed against next turn; it is
/// subtracted when the pool refills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaPool {
    pub current: u32,
    pub max: u32,
    pub pending_penalty: u32,
}

impl ManaPool {
    /// Spend mana if available.
    pub fn spend(&mut self, cost: u32) -> bool {
        if cost > self.current {
            return false;
        }
        self.current -= cost;
        true
    }

    /// Grow the pool by one (to 10) and refill, applying any pending penalty.
    pub fn refill_for_turn(&mut self) {
        if self.max < 10 {
            self.max += 1;
        }
        self.current = self.max.saturating_sub(self.pending_penalty);
        self.pending_penalty = 0;
    }
}

/// One player's complete game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    /// Hero health.
    pub health: i32,
    pub max_health: i32,
    /// Armor absorbs hero damage before health.
    pub armor: i32,
    pub mana: ManaPool,
    /// Cards in hand, oldest first. Drawn cards append at the back.
    pub hand: Vec<CardId>,
    /// Deck, index 0 is the top.
    pub deck: Vec<CardId>,
    /// Minions in play, left to right.
    pub board: Vec<CardInstance>,
    /// Cards that have been spent or destroyed.
    pub graveyard: Vec<CardId>,
    /// Consecutive draws attempted from an empty deck.
    pub fatigue: u32,
    pub cards_played_this_turn: u32,
    pub cards_drawn_this_turn: u32,
}

impl PlayerState {
    /// A fresh player with 30 health and an empty hand.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: 30,
            max_health: 30,
            armor: 0,
            mana: ManaPool::default(),
            hand: Vec::new(),
            deck: Vec::new(),
            board: Vec::new(),
            graveyard: Vec::new(),
            fatigue: 0,
            cards_played_this_turn: 0,
            cards_drawn_this_turn: 0,
        }
    }

    /// Find a minion on this board.
    #[must_use]
    pub fn minion(&self, id: InstanceId) -> Option<&CardInstance> {
        self.board.iter().find(|m| m.id == id)
    }

    /// Find a minion on this board, mutably.
    pub fn minion_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        self.board.iter_mut().find(|m| m.id == id)
    }

    /// Index of a minion on this board.
    #[must_use]
    pub fn minion_index(&self, id: InstanceId) -> Option<usize> {
        self.board.iter().position(|m| m.id == id)
    }

    /// Whether the board has room for another minion.
    #[must_use]
    pub fn has_board_space(&self) -> bool {
        self.board.len() < BOARD_LIMIT
    }

    /// Whether the hand has room for another card.
    #[must_use]
    pub fn has_hand_space(&self) -> bool {
        self.hand.len() < HAND_LIMIT
    }

    /// Whether any card in hand matches the tribe, per the catalog-free
    /// check: hand stores ids, so callers needing tribe info pass a lookup.
    #[must_use]
    pub fn holding_tribe(
        &self,
        tribe: Tribe,
        tribe_of: impl Fn(CardId) -> Option<Tribe>,
    ) -> bool {
        self.hand.iter().any(|&id| tribe_of(id) == Some(tribe))
    }

    /// Reset the per-turn counters. Called at the start of this player's turn.
    pub fn begin_turn(&mut self) {
        self.cards_played_this_turn = 0;
        self.cards_drawn_this_turn = 0;
        self.mana.refill_for_turn();
        for minion in &mut self.board {
            minion.summoning_sick = false;
            minion.attacks_this_turn = 0;
            minion.frozen = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;

    #[test]
    fn test_mana_spend_and_refill() {
        let mut mana = ManaPool::default();
        mana.refill_for_turn();
        assert_eq!((mana.current, mana.max), (1, 1));

        assert!(mana.spend(1));
        assert!(!mana.spend(1));

        mana.pending_penalty = 2;
        mana.refill_for_turn();
        assert_eq!((mana.current, mana.max), (0, 2));
        assert_eq!(mana.pending_penalty, 0);
    }

    #[test]
    fn test_mana_caps_at_ten() {
        let mut mana = ManaPool::default();
        for _ in 0..12 {
            mana.refill_for_turn();
        }
        assert_eq!(mana.max, 10);
        assert_eq!(mana.current, 10);
    }

    #[test]
    fn test_board_lookup() {
        let mut player = PlayerState::new("Aria");
        let def = CardDefinition::minion(CardId::new(1), "Scout", 1).with_stats(1, 1);
        player
            .board
            .push(CardInstance::new(InstanceId(1), def));

        assert!(player.minion(InstanceId(1)).is_some());
        assert!(player.minion(InstanceId(2)).is_none());
        assert_eq!(player.minion_index(InstanceId(1)), Some(0));
    }

    #[test]
    fn test_begin_turn_clears_counters_and_flags() {
        let mut player = PlayerState::new("Aria");
        let def = CardDefinition::minion(CardId::new(1), "Scout", 1).with_stats(1, 1);
        let mut unit = CardInstance::new(InstanceId(1), def);
        unit.frozen = true;
        player.board.push(unit);
        player.cards_played_this_turn = 3;

        player.begin_turn();
        assert_eq!(player.cards_played_this_turn, 0);
        assert!(!player.board[0].frozen);
        assert!(!player.board[0].summoning_sick);
    }
}
