//! Bot initialization and the command set
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command registration in the Telegram UI

use aaescore::core::config;
use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "I can do the following:")]
pub enum Command {
    #[command(description = "show the main menu")]
    Start,
    #[command(description = "search slides and past questions: /search <course or code>")]
    Search(String),
    #[command(description = "calculate your GPA")]
    Gpa,
    #[command(description = "cancel the current step")]
    Cancel,
    #[command(description = "show your Telegram id")]
    Myid,
    #[command(description = "check that the bot is alive")]
    Ping,
    #[command(description = "show this help")]
    Help,
    #[command(description = "rebuild the materials index (admins only)")]
    Syncindex,
}

/// Creates a Bot instance from `BOT_TOKEN` (or `TELOXIDE_TOKEN`)
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - No token configured or the HTTP client failed to build
pub fn create_bot() -> anyhow::Result<Bot> {
    if config::BOT_TOKEN.is_empty() {
        return Err(anyhow::anyhow!("BOT_TOKEN environment variable not set"));
    }
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(config::BOT_TOKEN.as_str(), client);

    if let Ok(bot_api_url) = std::env::var("BOT_API_URL") {
        log::info!("Using custom Bot API URL: {}", bot_api_url);
        let url = url::Url::parse(&bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
        return Ok(bot.set_api_url(url));
    }
    Ok(bot)
}

/// Commands shown in the Telegram command list. `/syncindex` stays hidden.
pub fn public_commands() -> Vec<BotCommand> {
    Command::bot_commands()
        .into_iter()
        .filter(|c| c.command != "/syncindex" && c.command != "syncindex")
        .collect()
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(public_commands()).await?;
    Ok(())
}
