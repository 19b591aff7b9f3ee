//! Key-value persistence for the city list.
//!
//! Mirrors the browser's `localStorage` contract: string keys, string values,
//! `get` returning nothing for unknown keys.

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

pub trait KeyValueStore: Send + Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object file (`{"key": "value", ...}`).
///
/// Every `set` rewrites the whole file. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents; `None` when the file doesn't exist yet.
    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage file: {}", self.path.display()))?;

        Ok(Some(contents))
    }

    fn parse(&self, contents: &str) -> Result<BTreeMap<String, String>> {
        serde_json::from_str(contents)
            .with_context(|| format!("Failed to parse storage file: {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.read_raw()? {
            Some(contents) => Ok(self.parse(&contents)?.remove(key)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        // A corrupt file is replaced rather than blocking every write; I/O errors are not.
        let mut items = match self.read_raw()? {
            Some(contents) => self.parse(&contents).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "discarding corrupt storage file");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        items.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create storage directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&items).context("Failed to serialize storage")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write storage file: {}", self.path.display()))?;

        Ok(())
    }
}
