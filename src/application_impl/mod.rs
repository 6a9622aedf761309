mod catalog_service_fake;
mod catalog_service_tmdb;
mod credential_store;
mod storage_keys;
mod wishlist_store;

pub use catalog_service_fake::*;
pub use catalog_service_tmdb::*;
pub use credential_store::*;
pub use storage_keys::*;
pub use wishlist_store::*;
