//! Backing resources for button maps.
//!
//! The store treats persistence as an opaque, fallible collaborator:
//! [`MapStorage`] loads and saves a whole [`ButtonMap`] atomically. Two
//! implementations ship with the crate: [`MemoryStorage`] for tests and
//! volatile sessions, and [`FileStorage`] for a JSON file on disk.

use crate::feature::ButtonMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a backing resource.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("backing resource unavailable: {0}")]
    Unavailable(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed button map: {0}")]
    Format(#[from] serde_json::Error),
}

/// Backing resource holding one device's button map.
///
/// Both operations are treated as atomic: a failed [`load`](MapStorage::load)
/// or [`save`](MapStorage::save) must leave the resource unchanged.
pub trait MapStorage {
    fn load(&mut self) -> Result<ButtonMap, StorageError>;
    fn save(&mut self, map: &ButtonMap) -> Result<(), StorageError>;
}

/// In-memory backing resource.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    map: ButtonMap,
}

impl MemoryStorage {
    pub fn new(map: ButtonMap) -> Self {
        Self { map }
    }
}

impl MapStorage for MemoryStorage {
    fn load(&mut self) -> Result<ButtonMap, StorageError> {
        Ok(self.map.clone())
    }

    fn save(&mut self, map: &ButtonMap) -> Result<(), StorageError> {
        self.map = map.clone();
        Ok(())
    }
}

/// JSON file backing resource.
///
/// A missing file loads as an empty button map, so a freshly created device
/// starts from a clean slate without an explicit bootstrap step.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl MapStorage for FileStorage {
    fn load(&mut self) -> Result<ButtonMap, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ButtonMap::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&mut self, map: &ButtonMap) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
