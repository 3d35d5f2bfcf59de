//! Dead-unit memory.
//!
//! A bounded FIFO of snapshots of the last few friendly units to die, one
//! per player. Graveyard-driven effects (resurrect, per-fallen buffs and
//! summons) read from it; death resolution writes to it. Records are
//! by-value snapshots of the printed card, so later catalog changes or
//! buffs on the living unit never reach back into memory.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Keyword, Tribe};
use crate::core::{GameRng, InstanceId};

/// Default number of fallen units remembered.
pub const DEFAULT_CAPACITY: usize = 5;

/// Snapshot of a unit at the moment it died.
///
/// Stats are the printed values, not buffed ones; effect specs are looked
/// up from the catalog by `card` when a record is re-materialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FallenRecord {
    /// The instance that died.
    pub instance: InstanceId,
    /// The card it was a copy of.
    pub card: CardId,
    pub name: String,
    pub tribe: Option<Tribe>,
    pub keywords: Vec<Keyword>,
    pub cost: u32,
    pub attack: i32,
    pub health: i32,
    /// Turn the unit died on.
    pub turn: u32,
}

/// Bounded FIFO of [`FallenRecord`]s.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeadUnitMemory {
    records: VecDeque<FallenRecord>,
    capacity: usize,
}

impl Default for DeadUnitMemory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl DeadUnitMemory {
    /// Memory with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory with an explicit capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a record, evicting the oldest once past capacity.
    pub fn record(&mut self, record: FallenRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// All records, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<FallenRecord> {
        self.records.iter().cloned().collect()
    }

    /// Records of the given tribe, oldest first.
    #[must_use]
    pub fn by_tribe(&self, tribe: Tribe) -> Vec<&FallenRecord> {
        self.records
            .iter()
            .filter(|r| r.tribe == Some(tribe))
            .collect()
    }

    /// Number of records of the given tribe.
    #[must_use]
    pub fn count_by_tribe(&self, tribe: Tribe) -> usize {
        self.records
            .iter()
            .filter(|r| r.tribe == Some(tribe))
            .count()
    }

    /// One uniformly random record, if any.
    #[must_use]
    pub fn random_entry(&self, rng: &mut GameRng) -> Option<&FallenRecord> {
        if self.records.is_empty() {
            return None;
        }
        let idx = rng.gen_range_usize(0..self.records.len());
        self.records.get(idx)
    }

    /// Forget everything. Called at game start, never mid-game.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
