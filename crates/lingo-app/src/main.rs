use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lingo_config::provider::ProviderConfig;
use lingo_core::LoopbackBackend;
use lingo_translator::{HttpTranslator, Translator};
use tracing_subscriber::EnvFilter;

mod controller;
mod events;
mod io;
mod offline;
mod settings;
mod state;
mod ui;


use self::controller::AppController;
use self::offline::OfflineTranslator;
use self::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "lingo", about = "Translate UI strings from stdin")]
struct Args {
    /// JSON config file, defaults to ./lingo.json when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language to switch to on startup
    #[arg(short, long)]
    target: Option<String>,

    /// Override the live input debounce delay (300-400 ms)
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Write a default config to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(atty::is(atty::Stream::Stdout))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Some(path) = &args.write_config {
        return settings::write_default_config(path);
    }

    let mut config = settings::load_config(args.config.as_deref())?;
    if let Some(ms) = args.debounce_ms {
        config.engine.debounce_ms = ms;
    }

    let client = build_translator(&config.provider)?;
    let (backend, confirmations) = LoopbackBackend::new();
    let state = Arc::new(AppState::new(config, client, Arc::new(backend)));

    if let Some(target) = args.target {
        state.coordinator.set_language(target);
    }

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(confirmations);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task exited: {e}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    // Stdin reads can't be interrupted, don't wait on them forever
    if tokio::time::timeout(Duration::from_secs(2), async {
        while tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        tracing::warn!("Tasks still running after shutdown, aborting");
        tasks.abort_all();
    }

    Ok(())
}

fn build_translator(provider: &ProviderConfig) -> anyhow::Result<Arc<dyn Translator>> {
    if !provider.is_usable() {
        tracing::warn!("No API key configured (LINGO_API_KEY), only built-in overrides will translate");
        return Ok(Arc::new(OfflineTranslator));
    }

    let client = HttpTranslator::new(
        provider.api_key.clone(),
        provider.api_url.clone(),
        Duration::from_secs(provider.timeout_seconds),
    )?;
    tracing::info!("Using {} provider at {}", provider.provider, provider.api_url);
    Ok(Arc::new(client))
}
