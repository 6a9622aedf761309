use crate::application_port::*;
use crate::domain_model::*;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Genre ids the catalog uses, for `by_genre`.
pub mod genre {
    pub const ACTION: u32 = 28;
    pub const ADVENTURE: u32 = 12;
    pub const ANIMATION: u32 = 16;
    pub const COMEDY: u32 = 35;
    pub const CRIME: u32 = 80;
    pub const DOCUMENTARY: u32 = 99;
    pub const DRAMA: u32 = 18;
    pub const FAMILY: u32 = 10751;
    pub const FANTASY: u32 = 14;
    pub const HISTORY: u32 = 36;
    pub const HORROR: u32 = 27;
    pub const MUSIC: u32 = 10402;
    pub const MYSTERY: u32 = 9648;
    pub const ROMANCE: u32 = 10749;
    pub const SCIENCE_FICTION: u32 = 878;
    pub const TV_MOVIE: u32 = 10770;
    pub const THRILLER: u32 = 53;
    pub const WAR: u32 = 10752;
    pub const WESTERN: u32 = 37;
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        TmdbConfig {
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            language: "ko-KR".to_string(),
        }
    }
}

/// Poster/backdrop URL for `path` at `size` (e.g. `w500`, `original`).
pub fn image_url(image_base_url: &str, path: Option<&str>, size: &str) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!(
        "{}/{}{}",
        image_base_url.trim_end_matches('/'),
        size,
        path
    ))
}

#[derive(Deserialize)]
struct GenreList {
    genres: Vec<Genre>,
}

/// [`CatalogService`] backed by the TMDb REST API.
///
/// Every request carries the logged-in user's secret as `api_key`; the
/// catalog is where that secret is first actually checked.
pub struct TmdbCatalogService {
    client: Client,
    config: TmdbConfig,
    credentials: Arc<dyn CredentialService>,
}

impl TmdbCatalogService {
    pub fn new(config: TmdbConfig, credentials: Arc<dyn CredentialService>) -> Self {
        TmdbCatalogService {
            client: Client::new(),
            config,
            credentials,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let api_key = self
            .credentials
            .active_credential()
            .ok_or(CatalogError::NotLoggedIn)?;

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!(%url, "catalog request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", api_key.expose()),
                ("language", self.config.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(%url, "catalog rejected the API key");
            return Err(CatalogError::InvalidCredentials);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }
        if !status.is_success() {
            warn!(%url, %status, "catalog request failed");
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    async fn list(
        &self,
        path: &str,
        page: u32,
        extra: &[(&str, String)],
    ) -> Result<CatalogPage, CatalogError> {
        let mut params = vec![("page", page.max(1).to_string())];
        params.extend(extra.iter().cloned());
        self.get_json(path, &params).await
    }
}

#[async_trait::async_trait]
impl CatalogService for TmdbCatalogService {
    async fn now_playing(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.list("/movie/now_playing", page, &[]).await
    }

    async fn popular(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.list("/movie/popular", page, &[]).await
    }

    async fn top_rated(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.list("/movie/top_rated", page, &[]).await
    }

    async fn by_genre(&self, genre_id: u32, page: u32) -> Result<CatalogPage, CatalogError> {
        self.list(
            "/discover/movie",
            page,
            &[("with_genres", genre_id.to_string())],
        )
        .await
    }

    async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError> {
        self.list("/search/movie", page, &[("query", query.to_string())])
            .await
    }

    async fn details(&self, id: MovieId) -> Result<CatalogItem, CatalogError> {
        self.get_json(&format!("/movie/{}", id), &[]).await
    }

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let list: GenreList = self.get_json("/genre/movie/list", &[]).await?;
        Ok(list.genres)
    }
}
