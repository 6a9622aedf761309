use crate::domain_port::*;
use dashmap::DashMap;

/// In-process [`KvStore`]. Contents live as long as the value does.
///
/// An optional quota caps the total bytes of keys plus values, so callers can
/// exercise the "storage full" path the way a browser's quota would.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: DashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        MemoryKvStore {
            entries: DashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.key() != key)
            .map(|entry| entry.key().len() + entry.value().len())
            .sum()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(KvError::Unavailable(format!(
                    "quota exceeded: {} of {} bytes",
                    needed, quota
                )));
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_remove() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.remove("k").unwrap();
    }

    #[test]
    fn quota_rejects_growth_but_allows_shrinking_overwrite() {
        let store = MemoryKvStore::with_quota(10);
        store.set("k", "12345678").unwrap();
        let err = store.set("other", "x").unwrap_err();
        assert!(matches!(err, KvError::Unavailable(_)));
        // replacing the same key only counts the new value
        store.set("k", "1").unwrap();
        store.set("j", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1"));
    }
}
