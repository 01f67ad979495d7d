use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a storage instance.
///
/// Controls how the persisted document is produced and how a fresh storage
/// is initialized when no document exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Display name given to the root container when a store initializes an
    /// empty storage.
    root_name: String,

    /// Whether saved documents are pretty-printed.
    ///
    /// Compact output is the default; pretty output is useful when the
    /// document is kept under version control or inspected by hand.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            pretty: false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The display name given to a freshly initialized root container.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Sets the root container name used on initialization.
    pub fn set_root_name(&mut self, name: impl Into<String>) {
        self.root_name = name.into();
    }
}

fn default_root_name() -> String {
    "Storage".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_root_name")]
        root_name: String,

        #[serde(default)]
        pretty: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 { root_name, pretty } => Self { root_name, pretty },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            root_name: config.root_name,
            pretty: config.pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nroot_name = \"Basement\"\npretty = true\n")
            .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.root_name(), "Basement");
        assert!(config.pretty);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\npretty = \"yes\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        // Tests that deserialising a version-only file returns the default
        // configuration.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stocktree.toml");

        let mut config = Config::default();
        config.set_root_name("Attic");
        config.pretty = true;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
