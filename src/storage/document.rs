//! A file-backed store for the container tree.
//!
//! The whole tree is serialized as a single JSON document; there is no
//! partial or incremental persistence. The [`DocumentStore`] is a thin
//! wrapper around the filesystem-agnostic [`Container`] tree.

use std::{
    fs::{self, File, OpenOptions},
    io,
    path::PathBuf,
};

use fs2::FileExt;

use crate::domain::{Config, Container};

/// An unloaded store: the document has been locked but not yet read.
#[derive(Debug, PartialEq, Eq)]
pub struct Unloaded;

/// A loaded store holding the in-memory root container.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    root: Container,
}

/// A file-backed store of one storage tree.
///
/// The store enforces a single-writer discipline: opening it takes an
/// exclusive lock on a sidecar `.lock` file, held until the store is
/// dropped. A second writer fails fast with [`StoreError::Locked`] rather
/// than waiting or spinning. Callers needing concurrent access must
/// serialize through one owning store.
#[derive(Debug)]
pub struct DocumentStore<S> {
    /// Path of the JSON document holding the serialized tree.
    path: PathBuf,
    /// Lock file handle; the exclusive lock lives as long as the store.
    lock: File,
    state: S,
}

/// Errors raised by the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another store instance holds the write lock for this document.
    #[error("storage document '{0}' is locked by another writer")]
    Locked(PathBuf),

    /// The document exists but could not be deserialized.
    #[error("malformed storage document")]
    Malformed(#[source] serde_json::Error),

    /// The tree could not be serialized.
    #[error("failed to serialize storage document")]
    Serialize(#[source] serde_json::Error),

    /// An underlying filesystem operation failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DocumentStore<Unloaded> {
    /// Opens the store for the document at `path`, taking the write lock.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Locked`] when another store already holds the
    /// lock, or [`StoreError::Io`] when the lock file cannot be created.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let lock_path = path.with_extension("lock");
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        lock.try_lock_exclusive()
            .map_err(|_| StoreError::Locked(path.clone()))?;

        Ok(Self {
            path,
            lock,
            state: Unloaded,
        })
    }

    /// Reads the whole tree from the document.
    ///
    /// A missing document is not an error: the storage is initialized with a
    /// fresh root container named per the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Malformed`] when the document cannot be
    /// deserialized, or [`StoreError::Io`] when it cannot be read.
    pub fn load(self, config: &Config) -> Result<DocumentStore<Loaded>, StoreError> {
        let root = match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).map_err(StoreError::Malformed)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(
                    "No storage document at {}; initializing '{}'",
                    self.path.display(),
                    config.root_name()
                );
                Container::new(config.root_name())
            }
            Err(e) => return Err(e.into()),
        };

        Ok(DocumentStore {
            path: self.path,
            lock: self.lock,
            state: Loaded { root },
        })
    }
}

impl DocumentStore<Loaded> {
    /// The in-memory root container.
    #[must_use]
    pub const fn root(&self) -> &Container {
        &self.state.root
    }

    /// Mutable access to the root container.
    pub const fn root_mut(&mut self) -> &mut Container {
        &mut self.state.root
    }

    /// Writes the whole tree back to the document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] when the tree cannot be serialized,
    /// or [`StoreError::Io`] when the document cannot be written.
    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        let text = if config.pretty {
            serde_json::to_string_pretty(&self.state.root)
        } else {
            serde_json::to_string(&self.state.root)
        }
        .map_err(StoreError::Serialize)?;

        fs::write(&self.path, text)?;
        tracing::debug!("Saved storage document to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Container;

    fn open(path: &std::path::Path) -> DocumentStore<Unloaded> {
        DocumentStore::open(path.to_path_buf()).unwrap()
    }

    #[test]
    fn missing_document_initializes_fresh_root() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::default();

        let store = open(&tmp.path().join("storage.json")).load(&config).unwrap();
        assert_eq!(store.root().name(), "Storage");
        assert!(store.root().children().is_empty());
    }

    #[test]
    fn fresh_root_uses_configured_name() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.set_root_name("Basement");

        let store = open(&tmp.path().join("storage.json")).load(&config).unwrap();
        assert_eq!(store.root().name(), "Basement");
    }

    #[test]
    fn save_and_load_round_trips_the_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");
        let config = Config::default();

        let mut store = open(&path).load(&config).unwrap();
        store.root_mut().add_child(Container::new("shelf"));
        store
            .root_mut()
            .get_mut(&"0-0".parse().unwrap())
            .unwrap()
            .add_item("screw", 42)
            .unwrap();
        store.save(&config).unwrap();
        let saved = store.root().clone();
        drop(store);

        let reloaded = open(&path).load(&config).unwrap();
        assert_eq!(reloaded.root(), &saved);
    }

    #[test]
    fn pretty_config_pretty_prints_document() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");
        let mut config = Config::default();
        config.pretty = true;

        let store = open(&path).load(&config).unwrap();
        store.save(&config).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));
    }

    #[test]
    fn second_writer_is_rejected_immediately() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");

        let _first = open(&path);
        let second = DocumentStore::open(path.clone());
        assert!(matches!(second, Err(StoreError::Locked(p)) if p == path));
    }

    #[test]
    fn lock_is_released_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");

        drop(open(&path));
        assert!(DocumentStore::open(path).is_ok());
    }

    #[test]
    fn malformed_document_is_a_distinct_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let error = open(&path).load(&Config::default()).unwrap_err();
        assert!(matches!(error, StoreError::Malformed(_)));
    }
}
