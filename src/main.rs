use clap::Parser;
use facesearch_bot::cli::Cli;
use facesearch_bot::config::{LoggingSettings, Settings};
use facesearch_bot::routes::AppState;
use facesearch_bot::services::{SearchClient, TelegramClient};
use facesearch_bot::Bot;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, config::ConfigError> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    settings.apply_overrides(cli.token.clone(), cli.max_results);
    settings.validate()?;
    Ok(settings)
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => {
            init_logging(&settings.logging, cli.verbose);
            settings
        }
        Err(e) => {
            init_logging(&LoggingSettings::default(), cli.verbose);
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting facesearch bot...");
    info!(
        "Search endpoint: {}, max results: {}, downloads: {}",
        settings.search.endpoint,
        settings.results.max_items,
        settings.storage.download_dir.display()
    );

    // Long polling holds the request open for poll_timeout_secs
    let telegram_timeout = Duration::from_secs(
        settings
            .telegram
            .request_timeout_secs
            .max(settings.telegram.poll_timeout_secs + 10),
    );

    let telegram = Arc::new(TelegramClient::new(
        settings.telegram.api_url.clone(),
        settings.telegram.token.clone(),
        telegram_timeout,
    ));

    let search = Arc::new(SearchClient::new(
        settings.search.endpoint.clone(),
        settings.search.form_field.clone(),
        Duration::from_secs(settings.search.timeout_secs),
    ));

    let state = AppState {
        telegram,
        search,
        max_items: settings.results.max_items,
        download_dir: settings.storage.download_dir.clone(),
        keep_downloads: settings.storage.keep_downloads,
    };

    info!("Polling for updates (timeout {}s)", settings.telegram.poll_timeout_secs);

    Bot::new(state, settings.telegram.poll_timeout_secs).run().await;

    info!("Facesearch bot stopped");
}
