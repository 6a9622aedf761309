use super::storage_keys::WISHLIST_KEY;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::notice::{Notice, NoticeBoard};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// [`WishlistService`] holding the list in memory and writing it through to a
/// [`KvStore`] after every change.
///
/// Each write stores the whole list, so another process writing the same key
/// in between is silently overwritten (last write wins). Updates are
/// optimistic: if the write fails, the in-memory change stays and a notice
/// is posted.
///
/// While the store is unreachable the last list that was read is kept. Until
/// the persisted list has been read once, changes stay in memory only and are
/// merged with it when storage comes back.
pub struct LocalWishlistStore {
    kv: Arc<dyn KvStore>,
    notices: Arc<NoticeBoard>,
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    entries: Vec<WishlistEntry>,
    synced: bool,
}

impl LocalWishlistStore {
    pub fn new(kv: Arc<dyn KvStore>, notices: Arc<NoticeBoard>) -> Self {
        let store = LocalWishlistStore {
            kv,
            notices,
            state: RwLock::new(State::default()),
        };
        store.load();
        store
    }

    /// `None` when the store could not be reached.
    fn read_persisted(&self) -> Option<Vec<WishlistEntry>> {
        let raw = match self.kv.get(WISHLIST_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Some(Vec::new()),
            Err(KvError::Unavailable(e)) => {
                warn!(error = %e, "wishlist storage unavailable, keeping last known list");
                self.notices
                    .post(Notice::warning("Your saved wishlist could not be read right now."));
                return None;
            }
            Err(KvError::Corrupt(e)) => {
                self.report_unreadable(&e);
                return Some(Vec::new());
            }
        };
        match serde_json::from_str::<Vec<WishlistEntry>>(&raw) {
            Ok(entries) => Some(dedup_by_id(entries)),
            Err(e) => {
                self.report_unreadable(&e.to_string());
                Some(Vec::new())
            }
        }
    }

    fn report_unreadable(&self, error: &str) {
        warn!(error, "wishlist is unreadable, starting empty");
        self.notices
            .post(Notice::warning("Your saved wishlist was unreadable and has been reset."));
    }

    /// Folds the persisted list in under any changes made before it could be
    /// read. Returns whether `state` is now in sync with storage.
    fn resync(&self, state: &mut State) -> bool {
        if !state.synced {
            if let Some(persisted) = self.read_persisted() {
                let offline = std::mem::take(&mut state.entries);
                state.entries = dedup_by_id(offline.into_iter().chain(persisted).collect());
                state.synced = true;
            }
        }
        state.synced
    }

    fn persist(&self, state: &mut State) {
        if !self.resync(state) {
            self.notices
                .post(Notice::warning("Your wishlist change could not be saved."));
            return;
        }
        let result = serde_json::to_string(&state.entries)
            .map_err(|e| KvError::Unavailable(e.to_string()))
            .and_then(|raw| self.kv.set(WISHLIST_KEY, &raw));
        if let Err(e) = result {
            warn!(error = %e, "failed to save wishlist");
            self.notices
                .post(Notice::warning("Your wishlist change could not be saved."));
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Keeps the first (newest) entry for each id.
fn dedup_by_id(entries: Vec<WishlistEntry>) -> Vec<WishlistEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.id()))
        .collect()
}

impl WishlistService for LocalWishlistStore {
    fn load(&self) -> Vec<WishlistEntry> {
        let mut state = self.write();
        if state.synced {
            if let Some(loaded) = self.read_persisted() {
                state.entries = loaded;
            }
        } else {
            self.resync(&mut state);
        }
        debug!(count = state.entries.len(), synced = state.synced, "wishlist loaded");
        state.entries.clone()
    }

    fn entries(&self) -> Vec<WishlistEntry> {
        self.read().entries.clone()
    }

    fn is_saved(&self, id: MovieId) -> bool {
        self.read().entries.iter().any(|entry| entry.id() == id)
    }

    fn add(&self, item: CatalogItem) {
        let mut state = self.write();
        if state.entries.iter().any(|entry| entry.id() == item.id) {
            return;
        }
        debug!(movie_id = %item.id, "wishlist add");
        state.entries.insert(0, WishlistEntry::new(item, Utc::now()));
        self.persist(&mut state);
    }

    fn remove(&self, id: MovieId) {
        let mut state = self.write();
        let before = state.entries.len();
        state.entries.retain(|entry| entry.id() != id);
        if state.entries.len() == before {
            return;
        }
        debug!(movie_id = %id, "wishlist remove");
        self.persist(&mut state);
    }

    fn toggle(&self, item: CatalogItem) -> bool {
        let mut state = self.write();
        let added = match state.entries.iter().position(|entry| entry.id() == item.id) {
            Some(index) => {
                state.entries.remove(index);
                false
            }
            None => {
                state.entries.insert(0, WishlistEntry::new(item, Utc::now()));
                true
            }
        };
        debug!(added, "wishlist toggle");
        self.persist(&mut state);
        added
    }

    fn clear(&self) {
        let mut state = self.write();
        state.entries.clear();
        // a clear is authoritative, nothing persisted needs merging back in
        state.synced = true;
        debug!("wishlist cleared");
        self.persist(&mut state);
    }

    fn len(&self) -> usize {
        self.read().entries.len()
    }
}
