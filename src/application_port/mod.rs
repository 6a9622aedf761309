mod catalog_service;
mod credential_service;
mod wishlist_service;

pub use catalog_service::*;
pub use credential_service::*;
pub use wishlist_service::*;
