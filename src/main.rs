use cineshelf::app::App;
use cineshelf::application_impl::image_url;
use cineshelf::application_port::*;
use cineshelf::domain_model::*;
use cineshelf::logger::*;
use cineshelf::notice::Notice;
use cineshelf::settings::*;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let app = App::try_new(&project_settings)?;

    let outcome = run(&app, &project_settings, cli.command).await;

    for notice in app.notices.drain() {
        eprintln!("{}", notice);
    }

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(notice) => {
            eprintln!("{}", notice);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(app: &App, settings: &Settings, command: Command) -> Result<(), Notice> {
    match command {
        Command::Register {
            email,
            password,
            confirm,
            agree_terms,
        } => {
            let form = SignupForm {
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                email,
                password,
                agree_terms,
            };
            reject_invalid(form.validate())?;

            let record = app
                .credentials
                .register(&Identifier::new(form.email), &Secret::new(form.password))
                .map_err(|e| Notice::from(&e))?;
            println!("Registered {}. You can now log in.", record.identifier);
        }

        Command::Login {
            email,
            password,
            remember,
        } => {
            let form = LoginForm {
                email,
                password,
                remember,
            };
            reject_invalid(form.validate())?;

            let identifier = Identifier::new(form.email);
            app.credentials
                .login(&identifier, &Secret::new(form.password))
                .map_err(|e| Notice::from(&e))?;
            app.credentials
                .remember_identifier(form.remember.then_some(&identifier));
            println!("Logged in as {}.", identifier);
        }

        Command::Logout => {
            app.credentials.logout();
            println!("Logged out.");
        }

        Command::Status => match app.credentials.session() {
            SessionState::LoggedIn { identifier } => {
                println!("Logged in as {}.", identifier);
                println!("{} saved movie(s).", app.wishlist.len());
            }
            SessionState::LoggedOut => {
                println!("Not logged in.");
                if let Some(saved) = app.credentials.remembered_identifier() {
                    println!("Remembered email: {}", saved);
                }
            }
        },

        Command::Catalog(command) => {
            require_login(app)?;
            run_catalog(app, settings, command).await?;
        }

        Command::Wishlist(command) => {
            require_login(app)?;
            run_wishlist(app, command).await?;
        }
    }
    Ok(())
}

async fn run_catalog(
    app: &App,
    settings: &Settings,
    command: CatalogCommand,
) -> Result<(), Notice> {
    let catalog = &app.catalog;
    let page = match command {
        CatalogCommand::NowPlaying { page } => catalog.now_playing(page).await,
        CatalogCommand::Popular { page } => catalog.popular(page).await,
        CatalogCommand::TopRated { page } => catalog.top_rated(page).await,
        CatalogCommand::Genre { id, page } => catalog.by_genre(id, page).await,
        CatalogCommand::Search { query, page } => catalog.search(&query, page).await,
        CatalogCommand::Details { id } => {
            let item = catalog
                .details(MovieId(id))
                .await
                .map_err(|e| Notice::from(&e))?;
            print_item(app, &item);
            let poster = image_url(&settings.catalog.image_base_url, item.poster_path(), "w500");
            if let Some(poster) = poster {
                println!("    poster: {}", poster);
            }
            return Ok(());
        }
        CatalogCommand::Genres => {
            let genres = catalog.genres().await.map_err(|e| Notice::from(&e))?;
            for genre in genres {
                println!("{:>6}  {}", genre.id, genre.name);
            }
            return Ok(());
        }
    }
    .map_err(|e| Notice::from(&e))?;

    for item in &page.results {
        print_item(app, item);
    }
    println!(
        "page {} of {} ({} results)",
        page.page, page.total_pages, page.total_results
    );
    Ok(())
}

async fn run_wishlist(app: &App, command: WishlistCommand) -> Result<(), Notice> {
    match command {
        WishlistCommand::List => {
            let entries = app.wishlist.entries();
            if entries.is_empty() {
                println!("Your wishlist is empty.");
            }
            for entry in entries {
                println!(
                    "{:>8}  {}  (saved {})",
                    entry.id(),
                    entry.item.title,
                    entry.added_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        WishlistCommand::Toggle { id } => {
            let item = fetch(app, id).await?;
            let title = item.title.clone();
            if app.wishlist.toggle(item) {
                println!("Added \"{}\" to your wishlist.", title);
            } else {
                println!("Removed \"{}\" from your wishlist.", title);
            }
        }
        WishlistCommand::Add { id } => {
            if app.wishlist.is_saved(MovieId(id)) {
                println!("Already saved.");
            } else {
                let item = fetch(app, id).await?;
                app.wishlist.add(item);
                println!("Saved.");
            }
        }
        WishlistCommand::Remove { id } => {
            app.wishlist.remove(MovieId(id));
            println!("Removed.");
        }
        WishlistCommand::Check { id } => {
            let saved = app.wishlist.is_saved(MovieId(id));
            println!("{}", if saved { "saved" } else { "not saved" });
        }
        WishlistCommand::Clear => {
            app.wishlist.clear();
            println!("Wishlist cleared.");
        }
    }
    Ok(())
}

async fn fetch(app: &App, id: u64) -> Result<CatalogItem, Notice> {
    app.catalog
        .details(MovieId(id))
        .await
        .map_err(|e| Notice::from(&e))
}

fn print_item(app: &App, item: &CatalogItem) {
    let heart = if app.wishlist.is_saved(item.id) { "♥" } else { " " };
    let rating = item
        .vote_average
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string());
    println!("{} {:>8}  {:>4}  {}", heart, item.id, rating, item.title);
}

fn require_login(app: &App) -> Result<(), Notice> {
    if app.credentials.is_logged_in() {
        Ok(())
    } else {
        Err(Notice::from(&CatalogError::NotLoggedIn))
    }
}

fn reject_invalid(errors: Vec<FieldError>) -> Result<(), Notice> {
    match errors.first() {
        None => Ok(()),
        Some(first) => {
            for error in &errors {
                warn!(field = ?error.field, "{}", error.kind);
            }
            Err(Notice::error(format!("{:?}: {}", first.field, first.kind)))
        }
    }
}
