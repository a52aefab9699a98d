use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use headlines::app::{App, AppEvent};
use headlines::bindings::Bindings;
use headlines::config::{Config, API_KEY_ENV};
use headlines::filters::{parse_category, parse_country, FilterState};
use headlines::news::{build_http_client, NewsClient};
use headlines::pipeline::{Outcome, Pipeline};
use headlines::render::PlainText;
use headlines::storage::{CacheStore, Database, DatabaseError};
use headlines::theme::ThemeVariant;
use headlines::ui;

/// Get the config directory path (~/.config/headlines/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("headlines");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "headlines", about = "Terminal reader for NewsAPI top headlines")]
struct Args {
    /// Two-letter country code (overrides config)
    #[arg(long, value_name = "CODE")]
    country: Option<String>,

    /// Category to start with (overrides config)
    #[arg(long)]
    category: Option<String>,

    /// Initial search text
    #[arg(long, short = 'q')]
    query: Option<String>,

    /// Config file to use instead of ~/.config/headlines/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Delete every cached response before starting
    #[arg(long)]
    clear_cache: bool,

    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,

    /// Print the first page to stdout and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never land on the TUI screen
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let filters = initial_filters(&args, &config)?;

    let Some(api_key) = config.resolve_api_key() else {
        eprintln!("Error: No NewsAPI key configured.");
        eprintln!();
        eprintln!("Get a key at https://newsapi.org and either export it:");
        eprintln!("  export {}=<your key>", API_KEY_ENV);
        eprintln!();
        eprintln!("or add it to {}:", config_path.display());
        eprintln!("  api_key = \"<your key>\"");
        std::process::exit(1);
    };

    let db_path = config_dir.join("headlines.db");

    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of headlines appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    if args.clear_cache {
        let removed = db.clear().await.context("Failed to clear cache")?;
        tracing::info!(removed, "Cache cleared");
        println!("Cleared {} cached responses.", removed);
    }

    let http = build_http_client().context("Failed to build HTTP client")?;
    let client = NewsClient::new(http, config.base_url.as_deref(), api_key)
        .context("Invalid news API base URL")?
        .with_timeout(Duration::from_secs(config.request_timeout_secs));
    let pipeline = Arc::new(Pipeline::new(client, db.clone()));

    if args.once {
        let mut out = PlainText::new(std::io::stdout());
        let outcome = pipeline.fetch_and_display(&filters, &mut out).await;
        if outcome == Outcome::Failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    let theme = startup_theme(&db, &config).await;

    let mut app = App::new(
        db,
        pipeline,
        Bindings::new(config.scroll_threshold),
        filters.clone(),
        theme,
    );

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    app.spawn_fetch(filters, &event_tx);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}

/// Filters from CLI flags, falling back to the config file.
fn initial_filters(args: &Args, config: &Config) -> Result<FilterState> {
    let category_raw = args.category.as_deref().unwrap_or(&config.category);
    let category = parse_category(category_raw)
        .ok_or_else(|| anyhow::anyhow!("Unknown category: {}", category_raw))?;

    let country_raw = args.country.as_deref().unwrap_or(&config.country);
    let country = parse_country(country_raw)
        .ok_or_else(|| anyhow::anyhow!("Invalid country code: {}", country_raw))?;

    Ok(FilterState::new(
        category,
        args.query.as_deref().unwrap_or_default(),
        country,
    ))
}

/// Stored theme if any, else the configured one.
async fn startup_theme(db: &Database, config: &Config) -> ThemeVariant {
    match db.stored_theme().await {
        Ok(Some(theme)) => return theme,
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read stored theme"),
    }

    ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme in config, using dark");
        ThemeVariant::default()
    })
}
