//! Domain models for hierarchical storage.
//!
//! This module contains the core domain types: the container tree, the
//! positional container id, attributes, and the catalog-level item record.

/// Container tree: the storage data structure and its operations.
pub mod container;
pub use container::{Container, StockEntry, StockError, StockRecord};

mod config;
pub use config::Config;

/// Positional container id types and parsing.
pub mod id;
pub use id::{ContainerId, Error as IdError};

/// Attribute types shared by containers and items.
pub mod attribute;
pub use attribute::{AttributeValue, ContainerAttribute, ItemAttribute};

/// Catalog-level item record.
pub mod item;
pub use item::Item;
