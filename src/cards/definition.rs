//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable template of a card: identity, cost,
//! classification, baseline stats, and any embedded effect specifications.
//! Runtime state (current health, buffs, flags) lives in
//! [`crate::state::CardInstance`].

use serde::{Deserialize, Serialize};

use crate::effects::EffectSpec;

/// Unique identifier for a card definition.
///
/// Identifies the "kind" of card (e.g. "Bone Collector"), not a specific
/// copy in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// What kind of card this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Minion,
    Spell,
    Weapon,
    HeroPower,
}

impl CardCategory {
    /// Lowercase tag used by the catalog index.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CardCategory::Minion => "minion",
            CardCategory::Spell => "spell",
            CardCategory::Weapon => "weapon",
            CardCategory::HeroPower => "hero_power",
        }
    }
}

/// Card rarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Free,
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Lowercase tag used by the catalog index.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Free => "free",
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// Class allegiance of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardClass {
    Neutral,
    Mage,
    Warrior,
    Priest,
    Rogue,
    Druid,
    Warlock,
    Necromancer,
}

impl CardClass {
    /// Lowercase tag used by the catalog index.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CardClass::Neutral => "neutral",
            CardClass::Mage => "mage",
            CardClass::Warrior => "warrior",
            CardClass::Priest => "priest",
            CardClass::Rogue => "rogue",
            CardClass::Druid => "druid",
            CardClass::Warlock => "warlock",
            CardClass::Necromancer => "necromancer",
        }
    }
}

/// Minion tribe, for tribal synergies and graveyard queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tribe {
    Undead,
    Beast,
    Dragon,
    Murloc,
    Mech,
    Elemental,
    Demon,
    Pirate,
    Totem,
}

impl Tribe {
    /// Lowercase tag used by the catalog index and tribe queries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tribe::Undead => "undead",
            Tribe::Beast => "beast",
            Tribe::Dragon => "dragon",
            Tribe::Murloc => "murloc",
            Tribe::Mech => "mech",
            Tribe::Elemental => "elemental",
            Tribe::Demon => "demon",
            Tribe::Pirate => "pirate",
            Tribe::Totem => "totem",
        }
    }

    /// Parse a tribe name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "undead" => Some(Tribe::Undead),
            "beast" => Some(Tribe::Beast),
            "dragon" => Some(Tribe::Dragon),
            "murloc" => Some(Tribe::Murloc),
            "mech" => Some(Tribe::Mech),
            "elemental" => Some(Tribe::Elemental),
            "demon" => Some(Tribe::Demon),
            "pirate" => Some(Tribe::Pirate),
            "totem" => Some(Tribe::Totem),
            _ => None,
        }
    }
}

/// Keyword tags carried by a card.
///
/// Combat keywords change how a unit fights; marker keywords change how the
/// trigger orchestrator treats other cards being played:
///
/// - `EchoesTriggers`: while this unit is on your board, your on-play
///   effects resolve twice.
/// - `RallyOnTrigger`: this unit gains +1/+1 whenever you play a card with
///   an on-play effect.
/// - `InheritsKeywords`: after an on-play effect resolves, this unit copies
///   the played card's combat keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Taunt,
    DivineShield,
    Stealth,
    Lifesteal,
    Windfury,
    Charge,
    Rush,
    EchoesTriggers,
    RallyOnTrigger,
    InheritsKeywords,
}

impl Keyword {
    /// Lowercase tag used by the catalog index.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Taunt => "taunt",
            Keyword::DivineShield => "divine_shield",
            Keyword::Stealth => "stealth",
            Keyword::Lifesteal => "lifesteal",
            Keyword::Windfury => "windfury",
            Keyword::Charge => "charge",
            Keyword::Rush => "rush",
            Keyword::EchoesTriggers => "echoes_triggers",
            Keyword::RallyOnTrigger => "rally_on_trigger",
            Keyword::InheritsKeywords => "inherits_keywords",
        }
    }

    /// Combat keywords that `InheritsKeywords` units copy from played cards.
    pub const INHERITABLE: [Keyword; 4] = [
        Keyword::DivineShield,
        Keyword::Taunt,
        Keyword::Lifesteal,
        Keyword::Windfury,
    ];
}

/// Static card definition.
///
/// Immutable after catalog registration; instances reference it by value
/// snapshot so live units stay valid even if the catalog is reloaded.
///
/// ## Example
///
/// ```
/// use tavern_core::cards::{CardDefinition, CardId, CardCategory, Rarity, CardClass, Tribe};
///
/// let raider = CardDefinition::minion(CardId::new(7), "Grave Raider", 3)
///     .with_stats(3, 2)
///     .with_tribe(Tribe::Undead)
///     .with_rarity(Rarity::Common);
///
/// assert_eq!(raider.category, CardCategory::Minion);
/// assert_eq!(raider.class, CardClass::Neutral);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this definition.
    pub id: CardId,

    /// Card name, unique within a catalog.
    pub name: String,

    /// What kind of card this is.
    pub category: CardCategory,

    /// Resource cost to play.
    pub cost: u32,

    /// Rarity.
    pub rarity: Rarity,

    /// Class allegiance.
    pub class: CardClass,

    /// Minion tribe, if any.
    pub tribe: Option<Tribe>,

    /// Keyword tags.
    pub keywords: Vec<Keyword>,

    /// Baseline attack (minions and weapons).
    pub attack: Option<i32>,

    /// Baseline health (minions) or durability (weapons).
    pub health: Option<i32>,

    /// Effect resolved when the card is played from hand.
    pub on_play: Option<EffectSpec>,

    /// Effect resolved when the unit dies.
    pub on_death: Option<EffectSpec>,

    /// Effect resolved when cast as a spell.
    pub on_cast: Option<EffectSpec>,
}

impl CardDefinition {
    /// Create a definition with the given category and no stats or effects.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, category: CardCategory, cost: u32) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            cost,
            rarity: Rarity::Common,
            class: CardClass::Neutral,
            tribe: None,
            keywords: Vec::new(),
            attack: None,
            health: None,
            on_play: None,
            on_death: None,
            on_cast: None,
        }
    }

    /// Shorthand for a minion definition.
    #[must_use]
    pub fn minion(id: CardId, name: impl Into<String>, cost: u32) -> Self {
        Self::new(id, name, CardCategory::Minion, cost)
    }

    /// Shorthand for a spell definition.
    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, cost: u32) -> Self {
        Self::new(id, name, CardCategory::Spell, cost)
    }

    /// Set baseline attack and health (builder).
    #[must_use]
    pub fn with_stats(mut self, attack: i32, health: i32) -> Self {
        self.attack = Some(attack);
        self.health = Some(health);
        self
    }

    /// Set rarity (builder).
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Set class (builder).
    #[must_use]
    pub fn with_class(mut self, class: CardClass) -> Self {
        self.class = class;
        self
    }

    /// Set tribe (builder).
    #[must_use]
    pub fn with_tribe(mut self, tribe: Tribe) -> Self {
        self.tribe = Some(tribe);
        self
    }

    /// Add a keyword (builder).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
        self
    }

    /// Attach an on-play effect (builder).
    #[must_use]
    pub fn with_on_play(mut self, spec: EffectSpec) -> Self {
        self.on_play = Some(spec);
        self
    }

    /// Attach an on-death effect (builder).
    #[must_use]
    pub fn with_on_death(mut self, spec: EffectSpec) -> Self {
        self.on_death = Some(spec);
        self
    }

    /// Attach a spell-cast effect (builder).
    #[must_use]
    pub fn with_on_cast(mut self, spec: EffectSpec) -> Self {
        self.on_cast = Some(spec);
        self
    }

    /// Check for a keyword on the printed card.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectSpec, EffectType, TargetSelector};

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_minion_builder() {
        let card = CardDefinition::minion(CardId::new(1), "Bog Lurker", 4)
            .with_stats(3, 5)
            .with_tribe(Tribe::Beast)
            .with_keyword(Keyword::Taunt)
            .with_rarity(Rarity::Rare);

        assert_eq!(card.name, "Bog Lurker");
        assert_eq!(card.category, CardCategory::Minion);
        assert_eq!(card.attack, Some(3));
        assert_eq!(card.health, Some(5));
        assert!(card.has_keyword(Keyword::Taunt));
        assert!(!card.has_keyword(Keyword::Stealth));
    }

    #[test]
    fn test_duplicate_keyword_ignored() {
        let card = CardDefinition::minion(CardId::new(1), "X", 1)
            .with_keyword(Keyword::Taunt)
            .with_keyword(Keyword::Taunt);
        assert_eq!(card.keywords.len(), 1);
    }

    #[test]
    fn test_tribe_parse_case_insensitive() {
        assert_eq!(Tribe::parse("Undead"), Some(Tribe::Undead));
        assert_eq!(Tribe::parse("UNDEAD"), Some(Tribe::Undead));
        assert_eq!(Tribe::parse("pirate"), Some(Tribe::Pirate));
        assert_eq!(Tribe::parse("squirrel"), None);
    }

    #[test]
    fn test_effect_spec_attachment() {
        let card = CardDefinition::minion(CardId::new(2), "Fire Imp", 1).with_on_play(
            EffectSpec::new(EffectType::Damage, TargetSelector::Any).with_amount(2),
        );

        assert!(card.on_play.is_some());
        assert!(card.on_death.is_none());
    }

    #[test]
    fn test_serialization() {
        let card = CardDefinition::minion(CardId::new(3), "Test", 2).with_stats(2, 2);
        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(card, deserialized);
    }
}
