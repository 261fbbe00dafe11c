//! Local cache for form state
//!
//! A small keyed store backed by one JSON file, playing the part browser
//! local storage plays for a web form. Values are stored as raw JSON so a
//! bad entry only invalidates itself.

use crate::error::Result;
use crate::logging::get_logger;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Cache key of the full editable state tree
pub const STATE_KEY: &str = "hammerqr.config_state";

/// Cache key of the advanced-visibility flag
pub const SHOW_ADVANCED_KEY: &str = "hammerqr.show_advanced";

/// File-backed key/value cache
pub struct LocalCache {
    file_path: PathBuf,
    entries: Map<String, Value>,
    logger: crate::logging::StructuredLogger,
}

impl LocalCache {
    /// Create an empty cache bound to `file_path`; nothing is read yet
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            entries: Map::new(),
            logger: get_logger("persistence"),
        }
    }

    /// Open a cache and load whatever the file holds.
    ///
    /// A missing or unreadable file yields an empty cache; the failure is
    /// logged.
    pub fn open<P: AsRef<Path>>(file_path: P) -> Self {
        let mut cache = Self::new(file_path);
        if let Err(e) = cache.load() {
            cache
                .logger
                .warn(&format!("Ignoring unreadable cache file: {e}"));
        }
        cache
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Load entries from disk
    pub fn load(&mut self) -> Result<()> {
        self.entries.clear();

        if !self.file_path.exists() {
            self.logger.info("No cache file found, starting empty");
            return Ok(());
        }

        let contents = std::fs::read_to_string(&self.file_path)?;
        self.entries = serde_json::from_str(&contents)?;
        self.logger.debug(&format!(
            "Loaded {} cache entries from {}",
            self.entries.len(),
            self.file_path.display()
        ));

        Ok(())
    }

    /// Save entries to disk
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.file_path, contents)?;
        self.logger.debug("Saved cache to disk");

        Ok(())
    }

    /// Read and decode one entry.
    ///
    /// `Ok(None)` when the key is absent, an error when the stored value does
    /// not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.entries.get(key) {
            Some(value) => Ok(Some(T::deserialize(value)?)),
            None => Ok(None),
        }
    }

    /// Store one entry and write the file
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.entries
            .insert(key.to_string(), serde_json::to_value(value)?);
        self.save()
    }

    /// Drop one entry and write the file
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::open(dir.path().join("absent.json"));
        assert!(!cache.contains(SHOW_ADVANCED_KEY));
        assert_eq!(cache.get::<bool>(SHOW_ADVANCED_KEY).unwrap(), None);
    }

    #[test]
    fn wrong_type_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = LocalCache::new(dir.path().join("cache.json"));
        cache.set(SHOW_ADVANCED_KEY, &"yes").unwrap();
        assert!(cache.get::<bool>(SHOW_ADVANCED_KEY).is_err());
    }

    #[test]
    fn open_remembers_its_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cache.json");
        let mut cache = LocalCache::open(&file);
        assert_eq!(cache.path(), file.as_path());

        cache.remove(STATE_KEY).unwrap();
        assert!(!file.exists(), "removing an absent key writes nothing");
    }
}
