use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    catalog::{CatalogError, ItemCatalog},
    domain::{
        attribute::{ContainerAttribute, ItemAttribute},
        id::ContainerId,
    },
};

/// A node in the storage tree.
///
/// A storage consists of a single root container with the id `"0"`; all
/// structure is created by nesting further containers inside it. The first
/// container added to the root gets the id `"0-0"`, the second `"0-1"`, the
/// first container added to `"0-0"` gets `"0-0-0"`, and so on. The resulting
/// tree mirrors the physical layout of the storage (rooms, shelves, bins)
/// and lets lookups by id descend directly along the encoded path.
///
/// Children are exclusively owned by their parent: dropping a container
/// drops its entire subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    id: ContainerId,
    name: String,
    attributes: Vec<ContainerAttribute>,
    children: Vec<Container>,
    items: Vec<StockEntry>,
}

/// A stocked quantity of a catalog item inside one container.
///
/// The entry records only the item id and the amount; the owning container
/// is implied by where the entry lives in the tree and is surfaced as a
/// derived field on [`StockRecord`] during traversal, so it can never go
/// stale when subtrees move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    item_id: String,
    amount: u64,
}

impl StockEntry {
    /// The catalog id of the stocked item.
    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// The stocked amount.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.amount
    }
}

/// A borrowed view of one stock entry together with the id of the container
/// currently holding it.
///
/// Produced by [`Container::all_items`]; the `container_id` is computed
/// during traversal rather than stored on the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockRecord<'a> {
    /// Id of the container holding the entry.
    pub container_id: &'a ContainerId,
    /// The catalog id of the stocked item.
    pub item_id: &'a str,
    /// The stocked amount.
    pub amount: u64,
}

/// Errors that can occur when adjusting the stock of a container.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StockError {
    /// Stock adjustments must move a positive amount.
    #[error("stock adjustments must be non-zero")]
    ZeroAmount,

    /// Removal asked for more than the container holds.
    #[error("cannot remove {requested} of item '{item_id}': only {stocked} stocked")]
    ExceedsStock {
        /// The item whose stock was adjusted.
        item_id: String,
        /// The requested removal amount.
        requested: u64,
        /// The amount actually stocked.
        stocked: u64,
    },

    /// Adding would overflow the stored amount.
    #[error("stock amount overflow for item '{item_id}'")]
    Overflow {
        /// The item whose stock was adjusted.
        item_id: String,
    },
}

impl Container {
    /// Creates a new root container with the id `"0"` and no attributes,
    /// children or items.
    ///
    /// Containers destined to become children are created the same way; they
    /// receive their real id when attached via [`Self::add_child`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ContainerId::root(),
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            items: Vec::new(),
        }
    }

    /// The container's positional id.
    #[must_use]
    pub const fn id(&self) -> &ContainerId {
        &self.id
    }

    /// The container's display name. Names carry no uniqueness constraint.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The container's own attributes, in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[ContainerAttribute] {
        &self.attributes
    }

    /// The container's direct children, in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Container] {
        &self.children
    }

    /// The container's own stock entries, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[StockEntry] {
        &self.items
    }

    /// Computes the first free child id under this container.
    ///
    /// Collects the trailing path segment of every direct child, sorts them
    /// ascending and scans for the first index `k` whose value differs from
    /// `k`; that index is the free slot. When the segments form a contiguous
    /// `0..n` run the free slot is `n`. Slots freed by [`Self::remove_child`]
    /// are therefore reused before new ones are appended.
    ///
    /// Duplicate or gap-containing segments (possible after manual edits)
    /// are tolerated; the scan silently yields the first gap.
    #[must_use]
    pub fn free_child_id(&self) -> ContainerId {
        let mut trailing: Vec<u32> = self.children.iter().map(|c| c.id.trailing()).collect();
        trailing.sort_unstable();

        let mut slot = u32::try_from(trailing.len()).expect("child count exceeds u32");
        for (k, segment) in (0..).zip(&trailing) {
            if *segment != k {
                slot = k;
                break;
            }
        }
        self.id.child(slot)
    }

    /// Attaches `child` to this container, assigning it the first free child
    /// id, and returns the id it was given.
    ///
    /// Ids encode the path from the root, so when an existing subtree is
    /// re-parented every id below its top node is stale. The attached
    /// container's children are detached and re-inserted through this same
    /// operation, rebuilding the ids of the whole subtree. Attributes and
    /// items of the moved subtree are untouched.
    #[instrument(skip(self, child), fields(parent = %self.id))]
    pub fn add_child(&mut self, mut child: Container) -> ContainerId {
        child.id = self.free_child_id();

        let grandchildren = std::mem::take(&mut child.children);
        for grandchild in grandchildren {
            child.add_child(grandchild);
        }

        let id = child.id.clone();
        self.children.push(child);
        id
    }

    /// Creates and attaches `amount` empty child containers named
    /// `prefix0 … prefix(amount-1)`.
    ///
    /// Each child receives its own copy of `attributes`, so editing one
    /// sibling's attributes never affects the others. `amount == 0` is a
    /// no-op.
    pub fn add_children(&mut self, prefix: &str, amount: usize, attributes: &[ContainerAttribute]) {
        for i in 0..amount {
            let mut child = Self::new(format!("{prefix}{i}"));
            child.attributes = attributes.to_vec();
            self.add_child(child);
        }
    }

    /// Detaches and returns the first direct child whose id matches, or
    /// `None` when there is no match.
    ///
    /// Removal may reorder the remaining children.
    pub fn remove_child(&mut self, id: &ContainerId) -> Option<Container> {
        let index = self.children.iter().position(|c| &c.id == id)?;
        Some(self.children.swap_remove(index))
    }

    /// Drops all direct children (and with them their subtrees).
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Appends an attribute to the container.
    ///
    /// Duplicate names are allowed; deduplication is the caller's
    /// responsibility via [`Self::remove_attribute`].
    pub fn add_attribute(&mut self, attribute: ContainerAttribute) {
        self.attributes.push(attribute);
    }

    /// Removes the first attribute with the given name and returns it, or
    /// `None` when the container has no such attribute.
    pub fn remove_attribute(&mut self, name: &str) -> Option<ContainerAttribute> {
        let index = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(index))
    }

    /// Removes all attributes from the container.
    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
    }

    /// Stocks `amount` of the item in this container and returns the new
    /// total.
    ///
    /// Amounts accumulate: if the item is already stocked its amount is
    /// increased, otherwise a new entry is appended.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::ZeroAmount`] when `amount` is zero and
    /// [`StockError::Overflow`] when the total would exceed `u64::MAX`.
    pub fn add_item(&mut self, item_id: &str, amount: u64) -> Result<u64, StockError> {
        if amount == 0 {
            return Err(StockError::ZeroAmount);
        }

        if let Some(entry) = self.items.iter_mut().find(|e| e.item_id == item_id) {
            entry.amount =
                entry
                    .amount
                    .checked_add(amount)
                    .ok_or_else(|| StockError::Overflow {
                        item_id: item_id.to_string(),
                    })?;
            Ok(entry.amount)
        } else {
            self.items.push(StockEntry {
                item_id: item_id.to_string(),
                amount,
            });
            Ok(amount)
        }
    }

    /// Removes `amount` of the item from this container.
    ///
    /// Removing exactly the stocked amount drops the entry; removing less
    /// decrements it. Returns the remaining amount, or `Ok(None)` when the
    /// item is not stocked here at all (absence is not an error; callers
    /// must check).
    ///
    /// # Errors
    ///
    /// Returns [`StockError::ZeroAmount`] when `amount` is zero and
    /// [`StockError::ExceedsStock`] when `amount` is larger than the stocked
    /// amount. Stock never goes negative.
    pub fn remove_item(&mut self, item_id: &str, amount: u64) -> Result<Option<u64>, StockError> {
        if amount == 0 {
            return Err(StockError::ZeroAmount);
        }

        let Some(index) = self.items.iter().position(|e| e.item_id == item_id) else {
            return Ok(None);
        };

        let stocked = self.items[index].amount;
        match amount.cmp(&stocked) {
            Ordering::Greater => Err(StockError::ExceedsStock {
                item_id: item_id.to_string(),
                requested: amount,
                stocked,
            }),
            Ordering::Equal => {
                self.items.swap_remove(index);
                Ok(Some(0))
            }
            Ordering::Less => {
                self.items[index].amount = stocked - amount;
                Ok(Some(stocked - amount))
            }
        }
    }

    /// Removes all stock entries from this container. Does not recurse.
    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    /// Returns the stock entry for the item, or `None` when the item is not
    /// stocked directly in this container.
    ///
    /// Checks this container's own items only; first match wins. Use
    /// [`Self::all_items`] to search the whole subtree.
    #[must_use]
    pub fn stock(&self, item_id: &str) -> Option<&StockEntry> {
        self.items.iter().find(|e| e.item_id == item_id)
    }

    /// Collects every stock entry in this container and its descendants,
    /// depth-first pre-order: this container's own items first, then each
    /// child's result in child order.
    ///
    /// A pure function of the current tree state; calling it twice without
    /// mutation yields identical sequences.
    #[must_use]
    pub fn all_items(&self) -> Vec<StockRecord<'_>> {
        let mut records = Vec::new();
        self.collect_items(&mut records);
        records
    }

    fn collect_items<'a>(&'a self, records: &mut Vec<StockRecord<'a>>) {
        for entry in &self.items {
            records.push(StockRecord {
                container_id: &self.id,
                item_id: &entry.item_id,
                amount: entry.amount,
            });
        }
        for child in &self.children {
            child.collect_items(records);
        }
    }

    /// Collects the attributes of this container and all of its descendants,
    /// depth-first pre-order.
    #[must_use]
    pub fn all_attributes(&self) -> Vec<&ContainerAttribute> {
        let mut attributes = Vec::new();
        self.collect_attributes(&mut attributes);
        attributes
    }

    fn collect_attributes<'a>(&'a self, attributes: &mut Vec<&'a ContainerAttribute>) {
        attributes.extend(self.attributes.iter());
        for child in &self.children {
            child.collect_attributes(attributes);
        }
    }

    /// Like [`Self::all_attributes`], filtered to compulsory attributes.
    #[must_use]
    pub fn compulsory_attributes(&self) -> Vec<&ContainerAttribute> {
        self.all_attributes()
            .into_iter()
            .filter(|a| a.compulsory)
            .collect()
    }

    /// Resolves every item stocked under this container through the catalog
    /// and returns the union of their attributes, de-duplicated by name in
    /// first-seen-wins order.
    ///
    /// # Errors
    ///
    /// Propagates the catalog's lookup failure when an item id cannot be
    /// resolved. An unresolvable id means the catalog and the tree have
    /// diverged; the tree cannot recover that locally.
    pub fn all_item_attributes(
        &self,
        catalog: &impl ItemCatalog,
    ) -> Result<Vec<ItemAttribute>, CatalogError> {
        let mut attributes: Vec<ItemAttribute> = Vec::new();

        for record in self.all_items() {
            let item = catalog.resolve(record.item_id)?;
            for attribute in item.into_attributes() {
                if !attributes.iter().any(|a| a.name == attribute.name) {
                    attributes.push(attribute);
                }
            }
        }
        Ok(attributes)
    }

    /// Finds the container with the given id within the subtree rooted at
    /// this container.
    ///
    /// Exploits the path encoding: at each level only the child whose id is
    /// a path prefix of the searched id is entered, so the search costs
    /// O(depth) rather than O(size). Returns `None` when no container with
    /// that exact id exists in the subtree.
    #[must_use]
    pub fn get(&self, id: &ContainerId) -> Option<&Self> {
        if &self.id == id {
            return Some(self);
        }
        self.children
            .iter()
            .find(|c| c.id.is_prefix_of(id))?
            .get(id)
    }

    /// Mutable variant of [`Self::get`].
    pub fn get_mut(&mut self, id: &ContainerId) -> Option<&mut Self> {
        if &self.id == id {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find(|c| c.id.is_prefix_of(id))?
            .get_mut(id)
    }

    /// Renders a diagnostic dump of the subtree: one `id<TAB>name` line per
    /// container, pre-order.
    ///
    /// Not a serialization format; use serde for round-trippable output.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}\t{}", self.id, self.name)?;
        for child in &self.children {
            write!(f, "{child}")?;
        }
        Ok(())
    }
}
