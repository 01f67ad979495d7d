use serde::{Deserialize, Serialize};

use crate::domain::attribute::ItemAttribute;

/// A catalog-level item description.
///
/// The container tree only stores item ids and amounts; the full item record
/// lives in the item catalog and is resolved on demand. Storing items inline
/// in the tree would duplicate catalog data across every container that
/// stocks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    item_id: String,
    name: String,
    attributes: Vec<ItemAttribute>,
}

impl Item {
    /// Creates a new item with no attributes.
    pub fn new(item_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// The item's unique catalog identifier.
    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// The item's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The item's attributes, in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[ItemAttribute] {
        &self.attributes
    }

    /// Consumes the item, returning its attributes.
    #[must_use]
    pub fn into_attributes(self) -> Vec<ItemAttribute> {
        self.attributes
    }

    /// Appends an attribute to the item.
    ///
    /// Duplicate names are allowed; deduplication is the caller's
    /// responsibility via [`Self::remove_attribute`].
    pub fn add_attribute(&mut self, attribute: ItemAttribute) {
        self.attributes.push(attribute);
    }

    /// Removes the first attribute with the given name and returns it, or
    /// `None` when the item has no such attribute.
    pub fn remove_attribute(&mut self, name: &str) -> Option<ItemAttribute> {
        let index = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(index))
    }

    /// Removes all attributes from the item.
    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
    }
}
