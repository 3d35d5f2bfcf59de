//! Effect invocation history.
//!
//! A bounded record of past effect invocations, consumed by replay effects
//! that re-cast "what has already happened this game". Records carry a
//! monotonic sequence number rather than a wall-clock timestamp so replays
//! stay deterministic under a fixed seed.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Rarity};
use crate::effects::{EffectCategory, EffectSpec, Target};

/// Appends beyond this length trigger a prune.
const PRUNE_THRESHOLD: usize = 100;

/// How many most-recent records a prune always keeps.
const KEEP_RECENT: usize = 10;

/// Cap on the thinned middle section a prune keeps.
const KEEP_THINNED: usize = 40;

/// One past effect invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvocationRecord {
    /// Monotonic position in the game's invocation order.
    pub seq: u64,
    /// The spec that was resolved, as registered on the card.
    pub spec: EffectSpec,
    pub category: EffectCategory,
    /// Card that carried the effect.
    pub source: CardId,
    pub source_name: String,
    pub source_rarity: Rarity,
    /// Host-chosen target at the original invocation, if any. Replays
    /// ignore this and resolve fresh targets.
    pub chosen: Option<Target>,
}

impl InvocationRecord {
    /// Records worth keeping through a prune: a Legendary source whose
    /// effect is not a trivial draw or heal.
    #[must_use]
    pub fn is_important(&self) -> bool {
        self.source_rarity == Rarity::Legendary && !self.spec.effect_type.is_trivial()
    }
}

/// Bounded, pruned invocation history.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EffectHistory {
    records: Vec<InvocationRecord>,
    next_seq: u64,
}

impl EffectHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next record will get.
    #[must_use]
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Append a record, assigning its sequence number. Prunes afterwards if
    /// the history has grown past the threshold.
    pub fn record(
        &mut self,
        spec: EffectSpec,
        category: EffectCategory,
        source: CardId,
        source_name: impl Into<String>,
        source_rarity: Rarity,
        chosen: Option<Target>,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.push(InvocationRecord {
            seq,
            spec,
            category,
            source,
            source_name: source_name.into(),
            source_rarity,
            chosen,
        });
        if self.records.len() > PRUNE_THRESHOLD {
            self.prune();
        }
        seq
    }

    /// Thin the history: keep every important record, the most recent few,
    /// and every second record of what remains (the cap favors the newest
    /// thinned entries), then restore sequence order.
    fn prune(&mut self) {
        let before = self.records.len();
        let recent_floor = self.records.len() - KEEP_RECENT;

        let mut kept: Vec<InvocationRecord> = Vec::new();
        let mut thinned: Vec<InvocationRecord> = Vec::new();
        for (i, record) in self.records.drain(..).enumerate() {
            if i >= recent_floor || record.is_important() {
                kept.push(record);
            } else if i % 2 == 0 {
                thinned.push(record);
            }
        }
        if thinned.len() > KEEP_THINNED {
            thinned.drain(..thinned.len() - KEEP_THINNED);
        }
        kept.append(&mut thinned);
        kept.sort_by_key(|r| r.seq);
        self.records = kept;
        log::debug!(
            "pruned effect history from {} to {} records",
            before,
            self.records.len()
        );
    }

    /// The `k` most recent records, most recent first.
    #[must_use]
    pub fn recent(&self, k: usize) -> Vec<&InvocationRecord> {
        self.records.iter().rev().take(k).collect()
    }

    /// All records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[InvocationRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reset for a new game. Sequence numbering restarts as well.
    pub fn clear(&mut self) {
        self.records.clear();
        self.next_seq = 0;
    }
}
