//! JSON file backed key-value store.

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use directories::ProjectDirs;
use log::{debug, info};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const STORE_FILENAME: &str = "storage.json";

/// Key-value store persisted as one JSON object.
///
/// Entries are cached in memory; every write rewrites the whole file through a
/// temporary file and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = load_entries(&path)?;
        info!(
            "opened file store (path={}, entries={})",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "learnchat").map(|dirs| dirs.data_dir().join(STORE_FILENAME))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = self.temp_path();
        fs::write(&temp_path, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&temp_path, &self.path)?;
        debug!(
            "file store flushed (path={}, entries={})",
            self.path.display(),
            entries.len()
        );
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.write_entries(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.write_entries(&next)?;
        *entries = next;
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => return Err(StoreError::Io(err)),
    };
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&contents).map_err(|err| StoreError::Corrupt {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}
