// Keys shared by every store writing to the same KvStore.

/// Serialized `Vec<UserRecord>`.
pub const USERS_KEY: &str = "users";
/// Secret of the logged-in user, forwarded to the catalog as `api_key`.
pub const ACTIVE_CREDENTIAL_KEY: &str = "TMDb-Key";
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const LOGGED_IN_KEY: &str = "isLoggedIn";
pub const LOGGED_IN_SENTINEL: &str = "true";
pub const SAVED_EMAIL_KEY: &str = "savedEmail";
/// Serialized `Vec<WishlistEntry>`, newest first. Not scoped per user.
pub const WISHLIST_KEY: &str = "wishlist";
