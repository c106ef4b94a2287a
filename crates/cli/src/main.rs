use anyhow::{anyhow, Context, Result};
use api_client::{ApiConfig, LibraryApiClient, DEFAULT_BASE_URL};
use catalog::{Book, CatalogSource, InMemoryCatalog, SearchScope};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use coordinator::{
    LiveSearchCoordinator, Notification, NotificationLevel, SearchConfig, SearchHandle,
    SearchView,
};
use pipeline::extract_categories;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// book-search - live search over the library catalog
#[derive(Parser)]
#[command(name = "book-search")]
#[command(about = "Debounced live search over the library book catalog", long_about = None)]
struct Cli {
    /// Base URL of the library backend
    #[arg(long, env = "LIBRARY_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Serve searches from a JSON catalog snapshot instead of the backend
    #[arg(long)]
    catalog_file: Option<PathBuf>,

    /// Quiet interval after the last keystroke, in milliseconds
    #[arg(long, default_value = "300")]
    debounce_ms: u64,

    /// Fields a search term is matched against
    #[arg(long, value_enum, default_value = "all")]
    scope: ScopeArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the settled results
    Search {
        /// Search term; blank shows the whole catalog
        #[arg(long, default_value = "")]
        term: String,

        /// Only show books in this category
        #[arg(long)]
        category: Option<String>,

        /// Only show books with this status
        #[arg(long)]
        status: Option<String>,
    },

    /// List the categories present in the catalog
    Categories,

    /// Show a single book
    Show {
        /// Book ID
        #[arg(long)]
        id: String,
    },

    /// Interactive live search: each stdin line is the new search box value
    Watch,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    All,
    Title,
    Author,
    Category,
}

impl From<ScopeArg> for SearchScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::All => SearchScope::All,
            ScopeArg::Title => SearchScope::Title,
            ScopeArg::Author => SearchScope::Author,
            ScopeArg::Category => SearchScope::Category,
        }
    }
}

/// Where books come from for this run
enum Backend {
    Remote(Arc<LibraryApiClient>),
    Offline(Arc<InMemoryCatalog>),
}

impl Backend {
    fn from_cli(cli: &Cli) -> Result<Self> {
        match &cli.catalog_file {
            Some(path) => {
                let catalog = InMemoryCatalog::load_from_file(path)
                    .with_context(|| format!("Failed to load catalog file {}", path.display()))?;
                Ok(Backend::Offline(Arc::new(catalog)))
            }
            None => {
                let client = LibraryApiClient::new(ApiConfig::new(cli.api_url.clone()))
                    .context("Failed to configure library API client")?;
                Ok(Backend::Remote(Arc::new(client)))
            }
        }
    }

    fn source(&self) -> Arc<dyn CatalogSource> {
        match self {
            Backend::Remote(client) => client.clone() as Arc<dyn CatalogSource>,
            Backend::Offline(catalog) => catalog.clone() as Arc<dyn CatalogSource>,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let backend = Backend::from_cli(&cli)?;
    let config = SearchConfig::new()
        .with_debounce(Duration::from_millis(cli.debounce_ms))
        .with_scope(cli.scope.into());
    info!("Using {}", backend.source().name());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Search {
            term,
            category,
            status,
        } => handle_search(&backend, config, term, category, status).await?,
        Commands::Categories => handle_categories(&backend).await?,
        Commands::Show { id } => handle_show(&backend, &id).await?,
        Commands::Watch => handle_watch(&backend, config).await?,
    }

    Ok(())
}

/// Handle the 'search' command
async fn handle_search(
    backend: &Backend,
    config: SearchConfig,
    term: String,
    category: Option<String>,
    status: Option<String>,
) -> Result<()> {
    let start = Instant::now();
    let (handle, mut notifications) = LiveSearchCoordinator::spawn(backend.source(), config);

    handle.on_category_selected(category)?;
    handle.on_status_selected(status)?;
    handle.on_search_term_changed(term.clone())?;

    let view = handle
        .wait_for(|v| v.is_settled_on(&term) && !v.is_seeding)
        .await?;
    handle.shutdown().await;

    while let Some(notification) = notifications.recv().await {
        print_notification(&notification);
    }
    print_results(&view);
    println!("{} Settled in {:?}", "✓".green(), start.elapsed());
    Ok(())
}

/// Handle the 'categories' command
async fn handle_categories(backend: &Backend) -> Result<()> {
    let categories = load_categories(backend).await?;

    println!(
        "{}",
        format!("{} categories:", categories.len()).bold().blue()
    );
    for category in &categories {
        println!("  {} {}", "•".green(), category);
    }
    Ok(())
}

/// Category list for the selector: the backend's own endpoint in remote
/// mode, extracted from the snapshot offline.
async fn load_categories(backend: &Backend) -> Result<BTreeSet<String>> {
    match backend {
        Backend::Remote(client) => {
            let categories = client
                .categories()
                .await
                .context("Failed to load categories")?;
            Ok(categories
                .into_iter()
                .filter(|c| !c.is_empty())
                .collect())
        }
        Backend::Offline(catalog) => Ok(extract_categories(catalog.books())),
    }
}

/// Handle the 'show' command
async fn handle_show(backend: &Backend, id: &str) -> Result<()> {
    let book = match backend {
        Backend::Remote(client) => client
            .get_book(id)
            .await
            .with_context(|| format!("Failed to fetch book {}", id))?,
        Backend::Offline(catalog) => catalog
            .get_book(id)
            .cloned()
            .ok_or_else(|| anyhow!("Book {} not found", id))?,
    };

    println!("{}", book.title.bold().blue());
    println!("{}Id: {}", "• ".green(), book.id);
    println!("{}Author: {}", "• ".green(), book.author);
    println!("{}Category: {}", "• ".green(), book.category().unwrap_or("-"));
    println!("{}Status: {}", "• ".green(), book.status().unwrap_or("-"));
    println!(
        "{}Copies: {}/{} ({})",
        "• ".cyan(),
        book.available_copies,
        book.total_copies,
        book.availability()
    );
    if let Some(description) = &book.description {
        println!("  {}", description);
    }
    Ok(())
}

/// Handle the 'watch' command
async fn handle_watch(backend: &Backend, config: SearchConfig) -> Result<()> {
    let (handle, mut notifications) = LiveSearchCoordinator::spawn(backend.source(), config);
    let mut view = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "{}",
        "Type to search. Commands: :category X, :status X, :clear, :refresh, :quit".dimmed()
    );

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if !apply_input(&handle, &line)? {
                    break;
                }
            }
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = view.borrow_and_update().clone();
                if !snapshot.is_loading && !snapshot.is_seeding {
                    print_results(&snapshot);
                }
            }
            Some(notification) = notifications.recv() => print_notification(&notification),
        }
    }

    handle.shutdown().await;
    Ok(())
}

/// Map one input line onto a coordinator event. Returns false on `:quit`.
fn apply_input(handle: &SearchHandle, line: &str) -> Result<bool> {
    let (command, argument) = match line.strip_prefix(':') {
        Some(rest) => {
            let mut parts = rest.splitn(2, ' ');
            let command = parts.next().unwrap_or_default();
            let argument = parts.next().map(str::trim).filter(|a| !a.is_empty());
            (Some(command), argument)
        }
        None => (None, None),
    };
    debug!("Input {:?} -> command {:?}", line, command);

    match command {
        None => handle.on_search_term_changed(line)?,
        Some("category") => handle.on_category_selected(argument.map(str::to_string))?,
        Some("status") => handle.on_status_selected(argument.map(str::to_string))?,
        Some("clear") => handle.clear_filters()?,
        Some("refresh") => handle.refresh()?,
        Some("quit") => return Ok(false),
        Some(other) => println!("{} Unknown command :{}", "?".yellow(), other),
    }
    Ok(true)
}

/// Helper function to format and print a result set
fn print_results(view: &SearchView) {
    let term = view.committed_term.as_deref().unwrap_or("");
    let header = if term.trim().is_empty() {
        format!("All books ({})", view.results.len())
    } else {
        format!("Results for '{}' ({})", term.trim(), view.results.len())
    };
    println!("{}", header.bold().blue());

    let mut filters = Vec::new();
    if let Some(category) = &view.criteria.category {
        filters.push(format!("category={}", category));
    }
    if let Some(status) = &view.criteria.status {
        filters.push(format!("status={}", status));
    }
    if !filters.is_empty() {
        println!("  {}", format!("filtered by {}", filters.join(", ")).dimmed());
    }

    for (rank, book) in view.results.iter().enumerate() {
        print_book(rank + 1, book);
    }
}

fn print_book(rank: usize, book: &Book) {
    println!(
        "{}. {} - {} [{}] {} ({})",
        rank.to_string().green(),
        book.title,
        book.author,
        book.category().unwrap_or("-"),
        book.status().unwrap_or("-"),
        book.availability()
    );
}

fn print_notification(notification: &Notification) {
    match notification.level {
        NotificationLevel::Info => println!("{} {}", "ℹ".cyan(), notification.message),
        NotificationLevel::Error => eprintln!("{} {}", "✗".red(), notification.message),
    }
}
