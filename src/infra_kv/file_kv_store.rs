use crate::domain_port::*;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// [`KvStore`] kept in a single JSON object file.
///
/// The file is re-read on every access and rewritten on every mutation, so
/// several processes pointed at the same file see each other's writes.
/// Nothing coordinates them: concurrent read-modify-write is last-write-wins.
pub struct FileKvStore {
    path: PathBuf,
    // serializes access from this process only
    lock: Mutex<()>,
}

impl FileKvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileKvStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, KvError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(KvError::Unavailable(e.to_string())),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| KvError::Corrupt(e.to_string()))
    }

    /// Like `read_all`, but an unreadable file is replaced rather than
    /// blocking every future write.
    fn read_for_update(&self) -> Result<BTreeMap<String, String>, KvError> {
        match self.read_all() {
            Err(KvError::Corrupt(e)) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt store file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), KvError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| KvError::Unavailable(e.to_string()))?;
            }
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| KvError::Unavailable(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(|e| KvError::Unavailable(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| KvError::Unavailable(e.to_string()))?;
        debug!(path = %self.path.display(), keys = entries.len(), "store file written");
        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_for_update()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
