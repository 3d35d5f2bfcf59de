//! Static card data: definitions and the indexed catalog.

pub mod catalog;
pub mod definition;

pub use catalog::{CardCatalog, CatalogError};
pub use definition::{CardCategory, CardClass, CardDefinition, CardId, Keyword, Rarity, Tribe};
