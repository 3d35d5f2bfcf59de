//! Effect outcomes and errors.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardId;
use crate::core::InstanceId;

use super::targeting::Target;

/// Why an effect failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No handler is registered for the (category, type) pair.
    UnknownEffectType,
    /// The handler itself failed or panicked.
    HandlerError,
    /// A targeted effect found nothing legal to hit.
    NoValidTargets,
    /// A summon found no room on the board.
    BoardFull,
    /// The effect referenced an instance that is no longer where it
    /// was expected.
    StaleReference,
}

/// A failed effect resolution.
///
/// Failures are contained: the game state is left exactly as it was before
/// the resolution attempt began.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EffectError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EffectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for EffectError {}

/// What a successful effect resolution produced.
///
/// Structured data for the host; the human-readable account of the same
/// events goes to the [`EventLog`](crate::core::EventLog).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeData {
    /// The effect ran and has nothing further to report.
    None,
    /// A gated effect whose condition failed; legitimate no-op.
    Fizzled,
    /// Damage was dealt; one entry per target actually hit.
    DamageDealt {
        targets: SmallVec<[(Target, i32); 2]>,
    },
    /// Healing applied; amounts are actual deltas after clamping.
    Healed {
        targets: SmallVec<[(Target, i32); 2]>,
    },
    /// Stat buffs applied.
    Buffed {
        targets: SmallVec<[Target; 2]>,
        attack: i32,
        health: i32,
    },
    /// Armor gained by the acting player's hero.
    ArmorGained { amount: i32 },
    /// Cards drawn into the acting player's hand; burned cards excluded.
    Drawn { cards: Vec<CardId> },
    /// Tokens summoned; `summoned` may fall short of `requested` when the
    /// board filled up.
    Summoned {
        requested: u32,
        summoned: Vec<InstanceId>,
    },
    /// A discover choice is being presented to the host.
    Discover { presentation: DiscoverPresentation },
    /// Adapt rolls applied to the source unit.
    Adapted { applied: Vec<String> },
    /// A minion was transformed into another card.
    Transformed { from: InstanceId, into: CardId },
    /// Cards were shuffled into the acting player's deck.
    Shuffled { count: u32 },
    /// Targets were frozen.
    Frozen { targets: SmallVec<[Target; 2]> },
    /// Targets were silenced.
    Silenced { targets: SmallVec<[Target; 2]> },
    /// Past effects re-invoked from history.
    Replayed { count: u32 },
}

/// Result of one effect resolution.
pub type EffectResult = Result<OutcomeData, EffectError>;

/// A pending discover choice.
///
/// The engine holds the authoritative copy; the host answers with
/// [`Engine::choose_discover`](crate::engine::Engine::choose_discover)
/// naming the presentation id and an option index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverPresentation {
    /// Identifies this presentation among possibly several in flight.
    pub id: u32,
    /// The cards offered, in presentation order.
    pub options: Vec<CardId>,
}
