//! Effect specifications.
//!
//! An `EffectSpec` is the immutable, data-driven description of what an
//! effect does: a type tag that drives dispatch, a target selector that
//! drives targeting, and a closed set of typed parameters. Specs are
//! attached to card definitions and validated when the catalog registers
//! the card, so handlers can rely on their required parameters being
//! present.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Keyword, Tribe};

use super::targeting::TargetSelector;

/// The closed vocabulary of effect types.
///
/// `Custom` is the fallback bucket for data-driven tags: it participates in
/// dispatch like any other type (games may register handlers for it), but
/// nothing is built in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    Damage,
    Heal,
    Buff,
    BuffAdjacent,
    GainArmor,
    Draw,
    Summon,
    Resurrect,
    Discover,
    Adapt,
    Transform,
    ShuffleIntoDeck,
    Freeze,
    Silence,
    /// Buff the source by +1/+1 per matching record in dead-unit memory.
    BuffPerFallen,
    /// Summon one token per matching record in dead-unit memory.
    SummonPerFallen,
    /// Re-invoke past recorded effects with freshly resolved targets.
    ReplayTriggers,
    /// Data-driven tag with no built-in handler.
    Custom(String),
}

impl EffectType {
    /// Replay-type effects are excluded from effect history to prevent
    /// self-referential growth.
    #[must_use]
    pub fn is_replay(&self) -> bool {
        matches!(self, EffectType::ReplayTriggers)
    }

    /// Effect types considered trivial when deciding which history records
    /// are worth keeping through a prune.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        matches!(self, EffectType::Draw | EffectType::Heal)
    }
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectType::Custom(tag) => write!(f, "custom:{}", tag),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Condition gating a conditional effect.
///
/// Evaluated against dead-unit memory or player state *before* any resource
/// is consumed. A failed condition is a fizzle (success with no-op), never
/// an error: the card was still legitimately played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// Dead-unit memory holds at least `at_least` records of `tribe`.
    FallenOfTribe { tribe: Tribe, at_least: u32 },
    /// The acting player's hand holds at most `n` cards.
    HandSizeAtMost(usize),
    /// The acting player's board holds at least `n` minions.
    BoardCountAtLeast(usize),
    /// The acting player's hand holds a card of `tribe`.
    HoldingCardOfTribe(Tribe),
}

/// Typed parameter bag for an effect.
///
/// A small closed set of optional parameters; which ones are required is
/// determined per effect type by [`EffectSpec::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectParams {
    /// Magnitude: damage dealt, healing done, armor gained.
    pub amount: Option<i32>,
    /// Repetition count: cards drawn, copies summoned, adapt rolls.
    pub count: Option<u32>,
    /// Attack delta for buffs.
    pub attack: Option<i32>,
    /// Health delta for buffs.
    pub health: Option<i32>,
    /// Referenced card: token to summon, card to shuffle in, transform result.
    pub card: Option<CardId>,
    /// Tribe filter for graveyard-driven and discover effects.
    pub tribe: Option<Tribe>,
    /// Keyword granted by the effect.
    pub keyword: Option<Keyword>,
    /// Condition gating the effect.
    pub condition: Option<Condition>,
}

/// Error from validating an effect spec at registration time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecError {
    pub message: String,
}

impl std::fmt::Display for SpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid effect spec: {}", self.message)
    }
}

impl std::error::Error for SpecError {}

/// A complete effect specification.
///
/// ## Example
///
/// ```
/// use tavern_core::effects::{EffectSpec, EffectType, TargetSelector};
///
/// let bolt = EffectSpec::new(EffectType::Damage, TargetSelector::Any)
///     .with_amount(3)
///     .requiring_target();
///
/// assert!(bolt.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    /// Drives dispatch.
    pub effect_type: EffectType,
    /// Drives targeting.
    pub selector: TargetSelector,
    /// Whether the host must supply a chosen target when playing the card.
    pub requires_target: bool,
    /// Typed parameters.
    pub params: EffectParams,
}

impl EffectSpec {
    /// Create a spec with empty parameters.
    #[must_use]
    pub fn new(effect_type: EffectType, selector: TargetSelector) -> Self {
        Self {
            effect_type,
            selector,
            requires_target: false,
            params: EffectParams::default(),
        }
    }

    /// Mark the spec as requiring a host-chosen target (builder).
    #[must_use]
    pub fn requiring_target(mut self) -> Self {
        self.requires_target = true;
        self
    }

    /// Set the magnitude parameter (builder).
    #[must_use]
    pub fn with_amount(mut self, amount: i32) -> Self {
        self.params.amount = Some(amount);
        self
    }

    /// Set the count parameter (builder).
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.params.count = Some(count);
        self
    }

    /// Set the buff deltas (builder).
    #[must_use]
    pub fn with_buff(mut self, attack: i32, health: i32) -> Self {
        self.params.attack = Some(attack);
        self.params.health = Some(health);
        self
    }

    /// Set the referenced card (builder).
    #[must_use]
    pub fn with_card(mut self, card: CardId) -> Self {
        self.params.card = Some(card);
        self
    }

    /// Set the tribe filter (builder).
    #[must_use]
    pub fn with_tribe(mut self, tribe: Tribe) -> Self {
        self.params.tribe = Some(tribe);
        self
    }

    /// Set the condition gate (builder).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.params.condition = Some(condition);
        self
    }

    /// Check that the parameters required by this spec's effect type are
    /// present. Called during catalog registration so malformed card data is
    /// rejected up front instead of failing inside a handler.
    pub fn validate(&self) -> Result<(), SpecError> {
        let missing = |what: &str| {
            Err(SpecError {
                message: format!("{} requires {}", self.effect_type, what),
            })
        };

        match &self.effect_type {
            EffectType::Damage | EffectType::Heal | EffectType::GainArmor => {
                if self.params.amount.is_none() {
                    return missing("an amount");
                }
            }
            EffectType::Buff | EffectType::BuffAdjacent => {
                if self.params.attack.is_none() || self.params.health.is_none() {
                    return missing("attack and health deltas");
                }
            }
            EffectType::BuffPerFallen => {
                if self.params.tribe.is_none() {
                    return missing("a tribe");
                }
            }
            EffectType::Draw => {
                if self.params.count.is_none() {
                    return missing("a count");
                }
            }
            EffectType::Summon => {
                if self.params.card.is_none() {
                    return missing("a card to summon");
                }
            }
            EffectType::SummonPerFallen => {
                if self.params.card.is_none() || self.params.tribe.is_none() {
                    return missing("a token card and a tribe");
                }
            }
            EffectType::Transform | EffectType::ShuffleIntoDeck => {
                if self.params.card.is_none() {
                    return missing("a card");
                }
            }
            EffectType::Adapt | EffectType::ReplayTriggers => {
                if self.params.count.is_none() {
                    return missing("a count");
                }
            }
            // Discover draws its pool from params.tribe or the full catalog;
            // nothing is strictly required. Custom tags are opaque here.
            EffectType::Discover
            | EffectType::Freeze
            | EffectType::Silence
            | EffectType::Resurrect
            | EffectType::Custom(_) => {}
        }

        Ok(())
    }
}
