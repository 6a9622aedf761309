use crate::domain_model::{CatalogItem, MovieId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved catalog item and the moment it was saved.
///
/// Persisted flat: the catalog item's own fields plus `added_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub added_at: DateTime<Utc>,
}

impl WishlistEntry {
    pub fn new(item: CatalogItem, added_at: DateTime<Utc>) -> Self {
        WishlistEntry { item, added_at }
    }

    pub fn id(&self) -> MovieId {
        self.item.id
    }
}
