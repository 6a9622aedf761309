use crate::domain_model::*;

/// Saved movies, newest first, at most one entry per movie id.
///
/// Every mutation is written through to storage before returning. Storage
/// failures never reach the caller: they are logged and posted as notices.
pub trait WishlistService: Send + Sync {
    /// Re-read storage, replacing the in-memory list.
    fn load(&self) -> Vec<WishlistEntry>;

    fn entries(&self) -> Vec<WishlistEntry>;

    fn is_saved(&self, id: MovieId) -> bool;

    /// No-op when already saved; the original `added_at` is kept.
    fn add(&self, item: CatalogItem);

    /// No-op when not saved.
    fn remove(&self, id: MovieId);

    /// Returns `true` if the item was added, `false` if it was removed.
    fn toggle(&self, item: CatalogItem) -> bool;

    fn clear(&self);

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
