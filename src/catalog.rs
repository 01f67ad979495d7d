//! The item catalog collaborator.
//!
//! The container tree stores only item ids and amounts; the catalog holds
//! the full item records and is consulted on demand (see
//! [`Container::all_item_attributes`](crate::Container::all_item_attributes)).

use std::collections::HashMap;

use crate::domain::Item;

/// A lookup service resolving item ids to full catalog records.
///
/// Implementations may be backed by anything from an in-process map to an
/// external document store; the tree only depends on this seam.
pub trait ItemCatalog {
    /// Resolves an item id to its catalog record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the id has no catalog entry.
    /// An unresolvable id referenced by the tree indicates the two have
    /// diverged; the tree does not validate ids against the catalog itself.
    fn resolve(&self, item_id: &str) -> Result<Item, CatalogError>;
}

/// Errors raised by an item catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The item id has no catalog entry.
    #[error("item '{0}' not found in catalog")]
    NotFound(String),

    /// The catalog backend failed.
    #[error("catalog backend error: {0}")]
    Backend(String),
}

/// A map-backed catalog.
///
/// The in-process implementation, also used as the test double for
/// catalog-crossing queries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: HashMap<String, Item>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item, returning the previous record under the same id if
    /// one existed.
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.item_id().to_string(), item)
    }

    /// Removes an item by id, returning it if present.
    pub fn remove(&mut self, item_id: &str) -> Option<Item> {
        self.items.remove(item_id)
    }

    /// The number of catalogued items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemCatalog for InMemoryCatalog {
    fn resolve(&self, item_id: &str) -> Result<Item, CatalogError> {
        self.items
            .get(item_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(item_id.to_string()))
    }
}
