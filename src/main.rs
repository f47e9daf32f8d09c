//! reel-search - movie search in your terminal
//!
//! Search OMDb by title, filter and sort the results, page through them and
//! keep a list of favorites.

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use reel_search::core::omdb::OmdbClient;
use reel_search::core::session::Session;
use reel_search::error::ReelError;
use reel_search::storage::config;
use reel_search::storage::favorites::{Favorites, FavoritesChanged};
use reel_search::storage::kv::FileStore;
use reel_search::types::{AppState, BrowseAction, MenuItem, MovieType, SortKey, ViewMode};
use reel_search::ui::render;
use reel_search::ui::selector::{Selector, create_selector};
use reel_search::utils::paths::{ensure_app_dirs, get_store_path};

type AppSession = Session<FileStore>;

/// Search the OMDb movie database from your terminal.
#[derive(Parser, Debug)]
#[command(name = "reel-search")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Title to search for
    query: Vec<String>,

    /// Start in the favorites view
    #[arg(short, long)]
    favorites: bool,

    /// Keep titles whose year contains this text
    #[arg(short, long)]
    year: Option<String>,

    /// Keep titles of this type
    #[arg(short = 't', long = "type", value_enum)]
    kind: Option<MovieType>,

    /// Result ordering (defaults to the configured sort)
    #[arg(short, long, value_enum)]
    sort: Option<SortKey>,

    /// Page to show first
    #[arg(short, long, default_value = "1")]
    page: usize,

    /// Show the details of one IMDb id and exit
    #[arg(short, long, value_name = "IMDB_ID")]
    details: Option<String>,

    /// Print the page and exit instead of opening menus
    #[arg(long)]
    no_interactive: bool,

    /// Edit the configuration file
    #[arg(short, long)]
    edit: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn report(err: &ReelError) {
    eprintln!("{} {}", "Error:".red(), err);
}

/// Run `fut` behind a spinner
async fn with_spinner<F: Future>(message: &'static str, fut: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let output = fut.await;
    spinner.finish_and_clear();
    output
}

/// Search and apply the outcome. Returns false when nothing was requested.
async fn run_search(session: &mut AppSession, client: Option<&OmdbClient>, query: &str) -> bool {
    let Some(client) = client else {
        report(&ReelError::MissingApiKey);
        return false;
    };

    match with_spinner("Searching...", session.search(client, query)).await {
        Ok(()) => true,
        Err(ReelError::EmptyQuery) => {
            println!("{}", "Enter a title to search.".yellow());
            false
        }
        Err(e) => {
            report(&e);
            false
        }
    }
}

/// Latest favorites count announced on the change channel
fn drain_changes(rx: &mut broadcast::Receiver<FavoritesChanged>, count: &mut usize) {
    loop {
        match rx.try_recv() {
            Ok(change) => *count = change.count,
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

/// Print the current page, or why it is empty
fn print_page(session: &AppSession) {
    if let Some(error) = session.error() {
        eprintln!("{} {}", "Error:".red(), error);
    }

    let page = session.visible_page();
    if page.movies.is_empty() {
        if session.error().is_none() {
            let has_base = match session.view_mode() {
                ViewMode::Search => !session.search_results().is_empty(),
                ViewMode::Favorites => !session.favorites().is_empty(),
            };
            println!(
                "{}",
                render::empty_message(session.view_mode(), session.query(), has_base).yellow()
            );
        }
        return;
    }

    println!(
        "{}",
        render::result_header(session.view_mode(), session.query(), session.result_count()).bold()
    );
    println!("{}", render::status_line(&page, session.filter(), session.sort()).dimmed());
    for movie in &page.movies {
        println!("{}", render::format_movie_label(movie, session.is_favorite(&movie.id)));
    }
}

fn browse_menu(session: &AppSession) -> Vec<MenuItem<BrowseAction>> {
    let page = session.visible_page();
    let mut items: Vec<MenuItem<BrowseAction>> = page
        .movies
        .iter()
        .map(|m| {
            MenuItem::new(
                render::format_movie_label(m, session.is_favorite(&m.id)),
                BrowseAction::Open(m.id.clone()),
            )
        })
        .collect();

    if page.has_next() {
        items.push(MenuItem::new("→ Next page", BrowseAction::NextPage));
    }
    if page.has_previous() {
        items.push(MenuItem::new("← Previous page", BrowseAction::PreviousPage));
    }
    items.push(MenuItem::new("⚙ Sort by", BrowseAction::Sort));
    items.push(MenuItem::new("⚙ Filter by type", BrowseAction::FilterType));
    items.push(MenuItem::new("⚙ Filter by year", BrowseAction::FilterYear));
    if !session.filter().is_empty() {
        items.push(MenuItem::new("✕ Clear filters", BrowseAction::ClearFilters));
    }
    let switch = match session.view_mode() {
        ViewMode::Search => format!("❤ View favorites ({})", session.favorites().len()),
        ViewMode::Favorites => "🔍 Back to search".to_string(),
    };
    items.push(MenuItem::new(switch, BrowseAction::SwitchView));
    items.push(MenuItem::new("🔍 New search", BrowseAction::NewSearch));
    items.push(MenuItem::new("Exit", BrowseAction::Exit));
    items
}

fn choose_sort(selector: &Selector, session: &mut AppSession) {
    let items: Vec<MenuItem<SortKey>> = SortKey::ALL
        .iter()
        .map(|k| MenuItem::new(k.label(), *k))
        .collect();
    if let Some(sort) = selector.select(&items, "Sort By", None) {
        session.set_sort(sort);
    }
}

fn choose_type(selector: &Selector, session: &mut AppSession) {
    let mut items = vec![MenuItem::new("All Types", None)];
    items.extend(MovieType::ALL.iter().map(|t| MenuItem::new(t.label(), Some(*t))));
    if let Some(kind) = selector.select(&items, "Type", None) {
        session.set_type_filter(kind);
    }
}

fn choose_year(selector: &Selector, session: &mut AppSession) {
    let mut items = vec![MenuItem::new("All Years", String::new())];
    items.extend(
        render::year_choices(render::current_year())
            .into_iter()
            .map(|y| MenuItem::new(y.clone(), y)),
    );
    if let Some(year) = selector.select(&items, "Year", None) {
        session.set_year_filter(year);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    ensure_app_dirs().await?;

    if cli.edit {
        let cfg = config::load_config().await?;
        config::edit_config(&cfg.editor).await?;
        return Ok(());
    }

    let cfg = config::load_config().await?;
    let client = match OmdbClient::new(cfg.api_key.clone()) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "searching disabled");
            None
        }
    };

    let favorites = Favorites::open(FileStore::new(get_store_path())).await;
    let mut changes = favorites.subscribe();
    let mut favorites_count = favorites.len();
    let mut session = Session::new(favorites);

    session.set_sort(cli.sort.unwrap_or(cfg.default_sort));
    session.set_type_filter(cli.kind);
    if let Some(year) = &cli.year {
        session.set_year_filter(year.trim());
    }

    if let Some(id) = &cli.details {
        let Some(client) = &client else {
            report(&ReelError::MissingApiKey);
            return Ok(());
        };
        with_spinner("Loading...", session.show_details(client, id)).await;
        match session.selected() {
            Some(detail) => println!("{}", render::render_details(detail, session.is_favorite(id))),
            None => {
                if let Some(error) = session.error() {
                    eprintln!("{} {}", "Error:".red(), error);
                }
            }
        }
        return Ok(());
    }

    let query = cli.query.join(" ");
    let mut state = if cli.favorites {
        session.set_view_mode(ViewMode::Favorites);
        AppState::Browse
    } else if !query.is_empty() {
        if run_search(&mut session, client.as_ref(), &query).await {
            AppState::Browse
        } else {
            AppState::Exit
        }
    } else if cli.no_interactive {
        AppState::Exit
    } else {
        AppState::Init
    };
    session.set_page(cli.page);

    if cli.no_interactive {
        if state == AppState::Browse {
            print_page(&session);
        }
        return Ok(());
    }

    let selector = create_selector(cfg.selector);

    while state != AppState::Exit {
        drain_changes(&mut changes, &mut favorites_count);

        match state {
            AppState::Init => {
                let menu_items = vec![
                    MenuItem::new("🔍 Search movies", AppState::Search),
                    MenuItem::new(
                        format!("❤ View favorites ({})", favorites_count),
                        AppState::Browse,
                    ),
                    MenuItem::new("Exit", AppState::Exit),
                ];

                state = selector
                    .select(&menu_items, "Select Action", None)
                    .unwrap_or(AppState::Exit);
                if state == AppState::Browse {
                    session.set_view_mode(ViewMode::Favorites);
                    session.reload_favorites().await;
                }
            }

            AppState::Search => {
                let Some(input) = selector.input("Search movies", "") else {
                    state = AppState::Exit;
                    continue;
                };

                state = if run_search(&mut session, client.as_ref(), &input).await {
                    AppState::Browse
                } else {
                    AppState::Init
                };
            }

            AppState::Browse => {
                println!();
                print_page(&session);

                let header = render::status_line(
                    &session.visible_page(),
                    session.filter(),
                    session.sort(),
                );
                let action = selector
                    .select(&browse_menu(&session), "Select Movie", Some(header.as_str()))
                    .unwrap_or(BrowseAction::Exit);

                match action {
                    BrowseAction::Open(id) => {
                        let Some(client) = &client else {
                            report(&ReelError::MissingApiKey);
                            continue;
                        };
                        with_spinner("Loading...", session.show_details(client, &id)).await;
                        if session.selected().is_some() {
                            state = AppState::Details;
                        }
                    }
                    BrowseAction::NextPage => session.next_page(),
                    BrowseAction::PreviousPage => session.previous_page(),
                    BrowseAction::Sort => choose_sort(&selector, &mut session),
                    BrowseAction::FilterType => choose_type(&selector, &mut session),
                    BrowseAction::FilterYear => choose_year(&selector, &mut session),
                    BrowseAction::ClearFilters => session.set_filter(Default::default()),
                    BrowseAction::SwitchView => {
                        session.toggle_view_mode();
                        if session.view_mode() == ViewMode::Favorites {
                            session.reload_favorites().await;
                        }
                    }
                    BrowseAction::NewSearch => state = AppState::Search,
                    BrowseAction::Exit => state = AppState::Exit,
                }
            }

            AppState::Details => {
                let Some(detail) = session.selected().cloned() else {
                    state = AppState::Browse;
                    continue;
                };
                let favorite = session.is_favorite(&detail.summary.id);

                println!();
                println!("{}", render::render_details(&detail, favorite));
                println!();

                let toggle_label = if favorite {
                    "💔 Remove from favorites"
                } else {
                    "❤ Add to favorites"
                };
                let menu_items = vec![
                    MenuItem::new(toggle_label, true),
                    MenuItem::new("← Back", false),
                ];

                match selector.select(&menu_items, &detail.summary.title, None) {
                    Some(true) => match session.toggle_favorite(&detail.summary).await {
                        Ok(true) => println!("{}", "Added to favorites.".green()),
                        Ok(false) => println!("{}", "Removed from favorites.".green()),
                        Err(e) => report(&e),
                    },
                    _ => {
                        session.close_details();
                        state = AppState::Browse;
                    }
                }
            }

            AppState::Exit => break,
        }
    }

    Ok(())
}
