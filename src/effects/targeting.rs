//! Effect targeting vocabulary.
//!
//! A `TargetSelector` names which zone/relationship an effect's targets must
//! satisfy; the game view turns a selector into concrete [`Target`] handles
//! against the two player states. Selectors are a closed set with a
//! `Custom` fallback bucket for data-driven tags the engine does not know.
//! Those resolve to an empty set with a diagnostic, never an error, since
//! card data may be incomplete.

use serde::{Deserialize, Serialize};

use crate::core::InstanceId;

/// Which entities an effect may target.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSelector {
    /// No targets (self-contained effects like "draw 2 cards").
    None,
    /// The source unit itself.
    SourceSelf,
    /// Any character: both heroes and all minions.
    Any,
    /// Friendly hero plus friendly minions.
    FriendlyCharacter,
    /// Enemy hero plus enemy minions.
    EnemyCharacter,
    /// Minions on the acting player's board.
    FriendlyMinion,
    /// Minions on the opponent's board.
    EnemyMinion,
    /// Minions on either board.
    AnyMinion,
    /// The acting player's hero.
    FriendlyHero,
    /// The opponent's hero.
    EnemyHero,
    /// Either hero.
    AnyHero,
    /// One uniformly random minion from either board.
    RandomMinion,
    /// One uniformly random enemy minion.
    RandomEnemyMinion,
    /// One uniformly random friendly minion.
    RandomFriendlyMinion,
    /// The minions adjacent to the source unit on its board.
    AdjacentMinions,
    /// Data-driven tag the engine does not recognize.
    ///
    /// Resolves to an empty set with a `warn!` diagnostic.
    Custom(String),
}

impl TargetSelector {
    /// Whether resolution consumes randomness from the shared RNG.
    #[must_use]
    pub fn is_random(&self) -> bool {
        matches!(
            self,
            TargetSelector::RandomMinion
                | TargetSelector::RandomEnemyMinion
                | TargetSelector::RandomFriendlyMinion
        )
    }
}

/// A resolved target handle.
///
/// Targets are handles into the two player states, never references: a
/// minion is addressed by its stable `InstanceId` and looked up at the
/// moment of use, so a target that has left the board simply fails to
/// resolve instead of dangling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// The acting player's hero.
    FriendlyHero,
    /// The opponent's hero.
    EnemyHero,
    /// A minion on either board.
    Minion(InstanceId),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::FriendlyHero => write!(f, "friendly hero"),
            Target::EnemyHero => write!(f, "enemy hero"),
            Target::Minion(id) => write!(f, "minion {}", id),
        }
    }
}
