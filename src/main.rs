use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use photomania::infrastructure::{
    AppConfig, CliArgs, FiveHundredPxClient, HttpImageFetcher, MemoryImageCache, ConfigStore,
};
use photomania::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let store = ConfigStore::new()?;
    let mut config = store.load(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_app() -> Result<(App, Arc<MemoryImageCache>)> {
    let config = load_config()?;

    init_logging(&config)?;

    info!(
        version = photomania::VERSION,
        base_url = %config.api.base_url,
        "Starting {}",
        photomania::NAME
    );
    if config.api.consumer_key.is_empty() {
        warn!("No consumer key configured, feed requests may be rejected");
    }

    let feed_client = FiveHundredPxClient::new(config.feed_client_config())?;
    let fetcher = HttpImageFetcher::with_client(feed_client.http_client());
    let cache = Arc::new(MemoryImageCache::with_limits(
        config.cache.max_images,
        config.cache.max_bytes,
    ));

    let app = App::new(
        Arc::new(feed_client),
        cache.clone(),
        Arc::new(fetcher),
        config.feed.prefetch_threshold,
    );

    Ok((app, cache))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let (app, cache) = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    info!(stats = %cache.stats(), "Image cache at exit");

    result
}
