use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("catalog rejected the API key")]
    InvalidCredentials,
    #[error("not found")]
    NotFound,
    #[error("catalog returned HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("parse error: {0}")]
    Parse(String),
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn now_playing(&self, page: u32) -> Result<CatalogPage, CatalogError>;
    async fn popular(&self, page: u32) -> Result<CatalogPage, CatalogError>;
    async fn top_rated(&self, page: u32) -> Result<CatalogPage, CatalogError>;
    async fn by_genre(&self, genre_id: u32, page: u32) -> Result<CatalogPage, CatalogError>;
    async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError>;
    async fn details(&self, id: MovieId) -> Result<CatalogItem, CatalogError>;
    async fn genres(&self) -> Result<Vec<Genre>, CatalogError>;
}
