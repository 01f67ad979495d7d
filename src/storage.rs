/// Document persistence for the container tree.
pub mod document;

pub use document::{DocumentStore, Loaded, StoreError, Unloaded};
