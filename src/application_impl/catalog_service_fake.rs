use crate::application_port::*;
use crate::domain_model::*;
use serde_json::json;

const PAGE_SIZE: usize = 20;

/// Offline catalog with a handful of fixed movies.
#[derive(Debug)]
pub struct FakeCatalogService {
    movies: Vec<CatalogItem>,
    genres: Vec<Genre>,
}

impl FakeCatalogService {
    pub fn new() -> Self {
        let movie = |id: u64, title: &str, vote: f64, released: &str, genres: &[u32]| {
            CatalogItem::new(MovieId(id), title)
                .with_vote_average(vote)
                .with_extra("release_date", released)
                .with_extra("genre_ids", json!(genres))
                .with_extra("poster_path", format!("/{}.jpg", id))
        };
        let genre = |id: u32, name: &str| Genre {
            id,
            name: name.to_string(),
        };

        FakeCatalogService {
            movies: vec![
                movie(438631, "Dune", 7.8, "2021-09-15", &[878, 12]),
                movie(693134, "Dune: Part Two", 8.2, "2024-02-27", &[878, 12]),
                movie(27205, "Inception", 8.4, "2010-07-15", &[28, 878, 12]),
                movie(155, "The Dark Knight", 8.5, "2008-07-16", &[18, 28, 80, 53]),
                movie(496243, "Parasite", 8.5, "2019-05-30", &[35, 53, 18]),
                movie(129, "Spirited Away", 8.5, "2001-07-20", &[16, 10751, 14]),
            ],
            genres: vec![
                genre(28, "Action"),
                genre(12, "Adventure"),
                genre(16, "Animation"),
                genre(35, "Comedy"),
                genre(80, "Crime"),
                genre(18, "Drama"),
                genre(10751, "Family"),
                genre(14, "Fantasy"),
                genre(878, "Science Fiction"),
                genre(53, "Thriller"),
            ],
        }
    }

    fn page_of(&self, movies: Vec<CatalogItem>, page: u32) -> CatalogPage {
        let page = page.max(1);
        let total_results = movies.len();
        let total_pages = total_results.div_ceil(PAGE_SIZE).max(1);
        let results = movies
            .into_iter()
            .skip((page as usize - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect();
        CatalogPage {
            page,
            results,
            total_pages: total_pages as u32,
            total_results: total_results as u64,
        }
    }

    fn release_date(item: &CatalogItem) -> &str {
        item.extra
            .get("release_date")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}

impl Default for FakeCatalogService {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal fake for offline use; it never checks credentials.
#[async_trait::async_trait]
impl CatalogService for FakeCatalogService {
    async fn now_playing(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        let mut movies = self.movies.clone();
        movies.sort_by(|a, b| Self::release_date(b).cmp(Self::release_date(a)));
        Ok(self.page_of(movies, page))
    }

    async fn popular(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        Ok(self.page_of(self.movies.clone(), page))
    }

    async fn top_rated(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        let mut movies = self.movies.clone();
        movies.sort_by(|a, b| {
            b.vote_average
                .unwrap_or_default()
                .total_cmp(&a.vote_average.unwrap_or_default())
        });
        Ok(self.page_of(movies, page))
    }

    async fn by_genre(&self, genre_id: u32, page: u32) -> Result<CatalogPage, CatalogError> {
        let movies = self
            .movies
            .iter()
            .filter(|m| {
                m.extra
                    .get("genre_ids")
                    .and_then(|v| v.as_array())
                    .is_some_and(|ids| ids.iter().any(|id| id.as_u64() == Some(genre_id.into())))
            })
            .cloned()
            .collect();
        Ok(self.page_of(movies, page))
    }

    async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError> {
        let needle = query.to_lowercase();
        let movies = self
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(self.page_of(movies, page))
    }

    async fn details(&self, id: MovieId) -> Result<CatalogItem, CatalogError> {
        self.movies
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        Ok(self.genres.clone())
    }
}
