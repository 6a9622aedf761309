use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_kv::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::notice::NoticeBoard;
use crate::settings::{self, Settings};
use std::sync::Arc;

/// The stores and the catalog, wired to the backends named in the settings.
pub struct App {
    pub credentials: Arc<dyn CredentialService>,
    pub wishlist: Arc<dyn WishlistService>,
    pub catalog: Arc<dyn CatalogService>,
    pub notices: Arc<NoticeBoard>,
}

impl App {
    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let kv: Arc<dyn KvStore> = match settings.storage.backend.as_str() {
            "memory" => Arc::new(MemoryKvStore::new()),
            "file" => Arc::new(FileKvStore::new(&settings.storage.path)),
            "redis" => {
                let dsn = settings
                    .storage
                    .redis_dsn
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("storage.redis_dsn is required for redis"))?;
                Arc::new(RedisKvStore::connect(dsn, settings.storage.prefix.clone())?)
            }
            other => return Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        };
        debug!(backend = %settings.storage.backend, "storage ready");

        Self::with_store(kv, &settings.catalog)
    }

    /// Builds everything on top of an existing store. Opening twice on the
    /// same store behaves like restarting the application.
    pub fn with_store(kv: Arc<dyn KvStore>, catalog: &settings::Catalog) -> anyhow::Result<Self> {
        let notices = Arc::new(NoticeBoard::new());

        let credentials: Arc<dyn CredentialService> =
            Arc::new(LocalCredentialStore::new(kv.clone(), notices.clone()));
        let wishlist: Arc<dyn WishlistService> =
            Arc::new(LocalWishlistStore::new(kv, notices.clone()));

        let catalog: Arc<dyn CatalogService> = match catalog.backend.as_str() {
            "fake" => Arc::new(FakeCatalogService::new()),
            "tmdb" => Arc::new(TmdbCatalogService::new(
                TmdbConfig {
                    base_url: catalog.base_url.clone(),
                    image_base_url: catalog.image_base_url.clone(),
                    language: catalog.language.clone(),
                },
                credentials.clone(),
            )),
            other => return Err(anyhow::anyhow!("Unknown catalog backend: {}", other)),
        };

        Ok(App {
            credentials,
            wishlist,
            catalog,
            notices,
        })
    }
}
