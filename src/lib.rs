//! Hierarchical storage for inventory management.
//!
//! A storage is a tree of nested containers. Each container carries a
//! positional id encoding its path from the root (`"0"`, `"0-1"`,
//! `"0-1-2"`, …), a set of typed attributes, sub-containers, and stocked
//! item quantities. Full item records live in an external catalog and are
//! resolved by id on demand.

pub mod domain;
pub use domain::{
    AttributeValue, Config, Container, ContainerAttribute, ContainerId, Item, ItemAttribute,
    StockEntry, StockError, StockRecord,
};

/// The item catalog collaborator.
pub mod catalog;
pub use catalog::{CatalogError, InMemoryCatalog, ItemCatalog};

/// Document persistence for the container tree.
pub mod storage;
pub use storage::{DocumentStore, StoreError};
