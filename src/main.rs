//! Countryfinder - Look up countries by name, capital, or region
//!
//! Runs a single search against the REST Countries API, caches it as the last
//! search of its kind, and prints the result as a table. Cached searches can
//! be shown again without touching the network.

use std::error::Error;
use std::fmt;
use std::io::{self, Write};

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use countryfinder::cache::{KeyValueStore, MemoryStore, SearchCacheManager};
use countryfinder::cli::{parse_region_arg, Cli, Command};
use countryfinder::config::Config;
use countryfinder::data::{CountriesClient, CountryLookup, QueryKind};
use countryfinder::ui::{render_countries_table, render_slot};

/// Sets up logging to stderr so stdout only carries results.
///
/// Defaults to warnings; override with `RUST_LOG`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "countryfinder=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// A failure returned from `main`
///
/// The runtime prints what `main` returns with `{:?}`; this shows the
/// readable message and its causes there instead of the derived `Debug`.
struct Failure(Box<dyn Error>);

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(cause) = source {
            write!(f, "\n  caused by: {}", cause)?;
            source = cause.source();
        }
        Ok(())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for Failure {}

/// Executes one subcommand against the manager, returning the text to print
async fn run<L: CountryLookup, S: KeyValueStore>(
    manager: &SearchCacheManager<L, S>,
    command: Command,
) -> Result<String, Box<dyn Error>> {
    let output = match command {
        Command::Capital { term } => {
            render_countries_table(&manager.search_by_capital(&term).await)
        }
        Command::Country { term } => {
            render_countries_table(&manager.search_by_country(&term).await)
        }
        Command::Region { region } => {
            let region = parse_region_arg(&region)?;
            render_countries_table(&manager.search_by_region(region.as_str()).await)
        }
        Command::Alpha { code } => match manager.lookup_by_alpha_code(&code).await {
            Some(country) => render_countries_table(std::slice::from_ref(&country)),
            None => format!("No country found for code '{}'\n", code),
        },
        Command::Show { kind } => {
            let store = manager.store();
            let kinds: Vec<QueryKind> = match kind {
                Some(kind) => vec![kind.into()],
                None => QueryKind::ALL.to_vec(),
            };
            kinds
                .into_iter()
                .map(|kind| render_slot(store.slot(kind), manager.saved_at()))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Command::Refresh => {
            let refreshed = manager.refresh().await;
            if refreshed.is_empty() {
                "Nothing cached to refresh\n".to_string()
            } else {
                refreshed
                    .into_iter()
                    .map(|(kind, count)| {
                        format!("Refreshed {} search: {} countries\n", kind.label(), count)
                    })
                    .collect()
            }
        }
    };
    Ok(output)
}

async fn run_with_storage<S: KeyValueStore>(
    config: &Config,
    storage: S,
    command: Command,
) -> Result<String, Box<dyn Error>> {
    let client = CountriesClient::with_base_url(&config.api_base_url);
    let manager = SearchCacheManager::load(client, storage, config.manager_options())?;
    run(&manager, command).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.apply_to(Config::from_env());

    let output = match config.file_store() {
        Some(store) => run_with_storage(&config, store, cli.command).await,
        None => {
            warn!("no cache directory available, searches will not be kept");
            run_with_storage(&config, MemoryStore::new(), cli.command).await
        }
    }
    .map_err(Failure)?;

    io::stdout().lock().write_all(output.as_bytes())?;
    Ok(())
}
