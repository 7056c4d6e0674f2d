use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{BoardError, BoardResult};

/// Keys of the four persisted collections.
pub mod keys {
    pub const TASKS: &str = "neighborly_tasks";
    pub const HELPERS: &str = "neighborly_helpers";
    pub const SKILLS: &str = "neighborly_skills";
    pub const THANKS: &str = "neighborly_thanks";

    pub const ALL: [&str; 4] = [TASKS, HELPERS, SKILLS, THANKS];
}

/// Returns the directory holding the board's data files.
///
/// The path is determined in the following order:
/// 1. `NEIGHBORLY_HOME` environment variable.
/// 2. `~/.local/share/neighborly` (on Linux).
/// 3. `./neighborly` (fallback).
pub fn default_data_dir() -> PathBuf {
    std::env::var("NEIGHBORLY_HOME").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("neighborly");
        p
    })
}

/// Minimal string key-value backend, the shape of browser `localStorage`.
pub trait KeyValueStore {
    /// Returns `None` when nothing is stored under `key`.
    fn read(&self, key: &str) -> io::Result<Option<String>>;
    /// Overwrites whatever is stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let mut f = OpenOptions::new().read(true).open(&path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        Ok(Some(s))
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.key_path(key))?;
        f.write_all(value.as_bytes())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-process backend for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Reads and parses the collection stored under `key`.
///
/// Missing, `null` or malformed values yield `fallback`; read errors are
/// logged and never propagated.
pub fn load<T, S>(store: &S, key: &str, fallback: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match try_load(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => fallback,
        Err(e) => {
            warn!(error = %e, "using default collection");
            fallback
        }
    }
}

fn try_load<T, S>(store: &S, key: &str) -> BoardResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = store.read(key).map_err(|e| BoardError::StorageRead {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: Option<T> = serde_json::from_str(&raw).map_err(|e| BoardError::StorageRead {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    Ok(value)
}

/// Serializes `value` and overwrites `key` with it.
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> BoardResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let s = serde_json::to_string_pretty(value).map_err(|e| BoardError::Serialize {
        key: key.to_string(),
        source: e,
    })?;
    store.write(key, &s).map_err(|e| BoardError::StorageWrite {
        key: key.to_string(),
        source: e,
    })?;
    debug!(key, bytes = s.len(), "saved collection");
    Ok(())
}

/// Deletes every board collection from the backend.
pub fn delete_all<S: KeyValueStore + ?Sized>(store: &mut S) -> BoardResult<()> {
    for key in keys::ALL {
        store.remove(key).map_err(|e| BoardError::StorageWrite {
            key: key.to_string(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.write("k", "null").unwrap();
        let v: Vec<u32> = load(&store, "k", vec![7]);
        assert_eq!(v, vec![7]);
    }

    #[test]
    fn wrong_shape_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.write("k", r#"{"not":"a list"}"#).unwrap();
        let v: Vec<u32> = load(&store, "k", Vec::new());
        assert!(v.is_empty());
    }
}
