use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MovieId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(MovieId)
    }
}

/// A movie as returned by the catalog.
///
/// Only the fields the app reads are typed; everything else the catalog
/// sends (overview, poster_path, release_date, ...) rides along in `extra`
/// and is written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogItem {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        CatalogItem {
            id,
            title: title.into(),
            vote_average: None,
            extra: Map::new(),
        }
    }

    pub fn with_vote_average(mut self, vote_average: f64) -> Self {
        self.vote_average = Some(vote_average);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.extra.get("poster_path").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// One page of a paginated catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub page: u32,
    pub results: Vec<CatalogItem>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

impl CatalogPage {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}
