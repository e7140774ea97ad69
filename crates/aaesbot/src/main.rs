use std::sync::Arc;

use aaescore::core::{config, init_cli_logger, init_logger, log_drive_configuration};
use aaescore::drive::configured_roots;
use aaescore::{AppResult, DriveClient, FlatIndexStore, RemoteTreeProvider, SearchEngine};
use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;

use aaesbot::cli::{Cli, Commands};
use aaesbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the matching subcommand; with no
/// subcommand the bot runs.
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before any config value is read
    let _ = dotenv();

    let cli = Cli::parse_args();

    match cli.command {
        Some(Commands::SyncIndex) => {
            init_logger(&config::LOG_FILE_PATH)?;
            Ok(run_sync_index().await?)
        }
        Some(Commands::Search {
            term,
            mode,
            level,
            json,
        }) => {
            init_cli_logger(&config::LOG_FILE_PATH)?;
            Ok(run_cli_search(&term, &mode, level.as_deref(), json).await?)
        }
        Some(Commands::Run) | None => {
            init_logger(&config::LOG_FILE_PATH)?;
            run_bot().await
        }
    }
}

fn drive_provider() -> AppResult<Arc<dyn RemoteTreeProvider>> {
    let client = DriveClient::from_env()?;
    Ok(Arc::new(client))
}

fn search_engine(provider: Arc<dyn RemoteTreeProvider>, store: FlatIndexStore) -> SearchEngine {
    SearchEngine::new(provider, store, config::DRIVE_SEARCH_SCOPE.clone())
}

/// Rebuild the flat index from the configured roots
async fn run_sync_index() -> AppResult<()> {
    log_drive_configuration();
    let provider = drive_provider()?;
    let store = FlatIndexStore::from_config();
    let report = store.sync_roots(provider.as_ref(), &configured_roots()).await?;

    println!("Indexed {} files into {}", report.total, store.path().display());
    for (kind, count) in &report.per_type {
        println!("  {:<8} {}", kind, count);
    }
    for root in &report.skipped_roots {
        println!("  skipped root {}", root);
    }
    Ok(())
}

/// Run one search from the command line
async fn run_cli_search(term: &str, mode: &str, level: Option<&str>, json: bool) -> AppResult<()> {
    let provider = drive_provider()?;
    let engine = search_engine(provider, FlatIndexStore::from_config());
    let records = engine.search(term, mode, level).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No matching folder or files found.");
        return Ok(());
    }
    println!("Found {} file(s):", records.len());
    for record in &records {
        println!("  {} ({:.1} MB)  {}", record.name, record.size_mb(), record.link);
    }
    Ok(())
}

/// Start the bot with long polling
async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");
    log_drive_configuration();

    let provider = drive_provider()?;
    let store = FlatIndexStore::from_config();
    let indexed = store.load().await.len();
    log::info!("Flat index holds {} files", indexed);

    let engine = Arc::new(search_engine(Arc::clone(&provider), store.clone()));
    log::info!("Search strategies: {}", engine.strategy_names().join(" -> "));

    let bot = create_bot()?;
    match bot.get_me().await {
        Ok(me) => log::info!("Bot username: {:?}, Bot ID: {}", me.username, me.id),
        Err(e) => log::warn!("get_me failed, continuing: {}", e),
    }
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }
    if config::ADMIN_IDS.is_empty() {
        log::warn!("ADMIN_IDS is empty, /syncindex is disabled");
    }

    let deps = HandlerDeps::new(engine, provider, store, config::ADMIN_IDS.clone());
    let handler = schema(deps);

    log::info!("📡 Ready to receive updates (long polling)");
    Dispatcher::builder(bot, handler)
        .dependencies(DependencyMap::new())
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
