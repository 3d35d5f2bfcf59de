//! Instance identification.
//!
//! Every live card instance (a copy of a card in a hand, deck, board, or
//! graveyard) has a unique `InstanceId`, distinct from its `CardId`: several
//! copies of one definition may be alive at the same time.
//!
//! Ids are minted by `InstanceIdGen` and never reused within one game, so a
//! stale handle can be detected instead of silently resolving to a new unit.

use serde::{Deserialize, Serialize};

/// Unique identifier for a live card instance.
///
/// Identifies one specific copy of a card during a game, not the card
/// definition itself (that is `CardId`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl InstanceId {
    /// Create an instance ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// Monotonic allocator for `InstanceId`s.
///
/// Owned by the engine; one per game. Ids are never reused, which keeps
/// "locate by id" unambiguous even after units die or transform.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceIdGen {
    next: u64,
}

impl InstanceIdGen {
    /// Create a generator starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next instance ID.
    pub fn alloc(&mut self) -> InstanceId {
        let id = InstanceId(self.next);
        self.next += 1;
        id
    }

    /// The raw value the next `alloc` will return.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next
    }
}
