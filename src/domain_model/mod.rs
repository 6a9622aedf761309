mod catalog;
mod session;
mod sign_in_form;
mod user;
mod wishlist;

pub use catalog::*;
pub use session::*;
pub use sign_in_form::*;
pub use user::*;
pub use wishlist::*;
