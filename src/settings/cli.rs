use super::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cineshelf", about = "Browse the movie catalog and keep a wishlist")]
pub struct Cli {
    #[arg(long, global = true)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a local account. The password doubles as your TMDb API key.
    Register {
        email: String,
        password: String,
        /// Defaults to the password itself.
        #[arg(long)]
        confirm: Option<String>,
        #[arg(long)]
        agree_terms: bool,
    },
    Login {
        email: String,
        password: String,
        /// Remember the email for next time.
        #[arg(long)]
        remember: bool,
    },
    Logout,
    /// Show who is logged in.
    Status,
    #[command(subcommand)]
    Catalog(CatalogCommand),
    #[command(subcommand)]
    Wishlist(WishlistCommand),
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    NowPlaying {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    TopRated {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Genre {
        id: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Details {
        id: u64,
    },
    Genres,
}

#[derive(Subcommand, Debug)]
pub enum WishlistCommand {
    List,
    /// Save the movie if it is not saved, otherwise remove it.
    Toggle {
        id: u64,
    },
    Add {
        id: u64,
    },
    Remove {
        id: u64,
    },
    Check {
        id: u64,
    },
    Clear,
}
