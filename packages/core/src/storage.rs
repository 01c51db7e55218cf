//! # Storage Backends
//!
//! A backend is a keyed blob store: one JSON value per key. The anchor store
//! uses a single key, but backends do not know or care what is inside.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::StorageError;

/// Keyed persistence slot injected into the store
pub trait StorageBackend {
    /// Read the value stored under `key`, if any
    fn read(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Replace the value stored under `key`
    fn write(&mut self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// In-memory backend (tests and embedding hosts)
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    slots: HashMap<String, Value>,
    writes: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw value already in a slot
    pub fn with_slot(key: impl Into<String>, value: Value) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value);
        Self { slots, writes: 0 }
    }

    /// Number of writes performed so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn slot(&self, key: &str) -> Option<&Value> {
        self.slots.get(key)
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

/// File backend: a JSON object whose members are the slots
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a reader sees either the old object or the new one.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(StorageError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageBackend for JsonFileBackend {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let mut object = self.read_object()?;
        Ok(object.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn write(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut object = self.read_object()?;
        object.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(&Value::Object(object))?;
        let temp = self.temp_path();
        fs::write(&temp, data)?;
        replace_file(&temp, &self.path)?;

        debug!("Wrote state file");
        Ok(())
    }
}

/// Rename `temp` over `target`, removing `temp` if the rename fails
fn replace_file(temp: &Path, target: &Path) -> Result<(), StorageError> {
    if let Err(err) = fs::rename(temp, target) {
        let _ = fs::remove_file(temp);
        return Err(err.into());
    }
    Ok(())
}
