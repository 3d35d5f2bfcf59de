//! The card catalog.
//!
//! A validated, indexed collection of every card definition a game can use.
//! Registration validates embedded effect specs up front; lookups afterwards
//! are infallible by construction. Beyond the primary id index the catalog
//! maintains a name index (case-insensitive) and a tag index over category,
//! class, rarity, tribe, keywords, and cost, so deck builders and discover
//! pools can query without scanning.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId};

/// Error from registering a malformed card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// A different definition is already registered under this id.
    ConflictingId { id: CardId, existing: String },
    /// A different card is already registered under this name.
    ConflictingName { name: String },
    /// An embedded effect spec failed validation.
    InvalidSpec { id: CardId, message: String },
    /// A minion definition without stats.
    MissingStats { id: CardId },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::ConflictingId { id, existing } => {
                write!(f, "{} already registered as \"{}\"", id, existing)
            }
            CatalogError::ConflictingName { name } => {
                write!(f, "card name \"{}\" already registered", name)
            }
            CatalogError::InvalidSpec { id, message } => {
                write!(f, "{} carries an invalid effect spec: {}", id, message)
            }
            CatalogError::MissingStats { id } => {
                write!(f, "{} is a minion without attack/health", id)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Indexed collection of card definitions.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
    /// Lowercased name to id.
    by_name: FxHashMap<String, CardId>,
    /// Tag to ids carrying that tag.
    by_tag: FxHashMap<String, Vec<CardId>>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition.
    ///
    /// Registering the exact same definition twice is a no-op; registering a
    /// *different* definition under a taken id or name is an error, as is any
    /// malformed definition. The catalog is unchanged on error.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), CatalogError> {
        if let Some(existing) = self.cards.get(&card.id) {
            if *existing == card {
                log::debug!("{} re-registered, ignoring", card.id);
                return Ok(());
            }
            return Err(CatalogError::ConflictingId {
                id: card.id,
                existing: existing.name.clone(),
            });
        }

        let name_key = card.name.to_ascii_lowercase();
        if self.by_name.contains_key(&name_key) {
            return Err(CatalogError::ConflictingName {
                name: card.name.clone(),
            });
        }

        if card.category == super::CardCategory::Minion
            && (card.attack.is_none() || card.health.is_none())
        {
            return Err(CatalogError::MissingStats { id: card.id });
        }

        for spec in [&card.on_play, &card.on_death, &card.on_cast]
            .into_iter()
            .flatten()
        {
            spec.validate().map_err(|e| CatalogError::InvalidSpec {
                id: card.id,
                message: e.message.clone(),
            })?;
        }

        for tag in Self::tags_of(&card) {
            self.by_tag.entry(tag).or_default().push(card.id);
        }
        self.by_name.insert(name_key, card.id);
        self.cards.insert(card.id, card);
        Ok(())
    }

    fn tags_of(card: &CardDefinition) -> Vec<String> {
        let mut tags = vec![
            card.category.as_str().to_string(),
            card.class.as_str().to_string(),
            card.rarity.as_str().to_string(),
            format!("cost_{}", card.cost),
        ];
        if let Some(tribe) = card.tribe {
            tags.push(tribe.as_str().to_string());
        }
        for keyword in &card.keywords {
            tags.push(keyword.as_str().to_string());
        }
        tags
    }

    /// Look up a definition by id.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Look up a definition by name, case-insensitively.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&CardDefinition> {
        let id = self.by_name.get(&name.to_ascii_lowercase())?;
        self.cards.get(id)
    }

    /// All ids carrying `tag`. Unknown tags yield an empty slice.
    #[must_use]
    pub fn query_by_tag(&self, tag: &str) -> &[CardId] {
        self.by_tag.get(tag).map_or(&[], Vec::as_slice)
    }

    /// Ids carrying *every* tag in `tags`.
    ///
    /// Starts from the scarcest tag and filters, so broad tags like a
    /// category don't dominate the cost.
    #[must_use]
    pub fn query_by_all_tags(&self, tags: &[&str]) -> Vec<CardId> {
        if tags.is_empty() {
            return Vec::new();
        }
        let Some(seed) = tags
            .iter()
            .map(|t| self.query_by_tag(t))
            .min_by_key(|ids| ids.len())
        else {
            return Vec::new();
        };
        seed.iter()
            .copied()
            .filter(|id| {
                tags.iter()
                    .all(|tag| self.query_by_tag(tag).contains(id))
            })
            .collect()
    }

    /// Ids whose definitions satisfy `pred`.
    #[must_use]
    pub fn query_by_predicate(&self, pred: impl Fn(&CardDefinition) -> bool) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .cards
            .values()
            .filter(|c| pred(c))
            .map(|c| c.id)
            .collect();
        ids.sort_by_key(|id| id.raw());
        ids
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}
