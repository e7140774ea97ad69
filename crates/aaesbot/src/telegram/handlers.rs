//! Dispatcher schema, handler dependencies and the update handlers.

use std::sync::Arc;

use aaescore::drive::Level;
use aaescore::{FlatIndexStore, Query, QueryError, RemoteTreeProvider, SearchEngine, SearchMode};
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{Message, UserId};
use teloxide::utils::command::BotCommands;

use super::admin;
use super::bot::Command;
use super::gpa;
use super::materials::{file_name_from_keyboard, parse_file_callback, send_file, send_results};
use super::menu::{
    level_keyboard, main_menu_keyboard, materials_keyboard, MenuAction, MAIN_MENU_TEXT, MATERIALS_MENU_TEXT,
};
use super::state::{ChatState, StateMap};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

const WELCOME_TEXT: &str = "👋 Welcome to the AAES study bot.\nPick an option or use /search <course>.";
const IDLE_TEXT: &str = "Use the menu below or /search <course or code>.";

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub engine: Arc<SearchEngine>,
    pub provider: Arc<dyn RemoteTreeProvider>,
    pub store: FlatIndexStore,
    pub states: Arc<StateMap>,
    pub admin_ids: Arc<Vec<u64>>,
}

impl HandlerDeps {
    pub fn new(
        engine: Arc<SearchEngine>,
        provider: Arc<dyn RemoteTreeProvider>,
        store: FlatIndexStore,
        admin_ids: Vec<u64>,
    ) -> Self {
        Self {
            engine,
            provider,
            store,
            states: Arc::new(StateMap::new()),
            admin_ids: Arc::new(admin_ids),
        }
    }

    /// Stores `state` for the user and returns its prompt.
    fn enter(&self, user_id: UserId, state: ChatState) -> String {
        let prompt = state.prompt();
        self.states.insert(user_id, state);
        prompt
    }

    fn take_state(&self, user_id: UserId) -> Option<ChatState> {
        self.states.remove(&user_id).map(|(_, state)| state)
    }
}

/// Creates the dispatcher schema for the bot.
///
/// Commands first, then plain text (answers to the last menu prompt), then
/// inline keyboard callbacks.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(command_handler(deps.clone()))
        .branch(message_handler(deps.clone()))
        .branch(callback_handler(deps))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Received command {:?} from chat {}", cmd, msg.chat.id);
                handle_command(&bot, &msg, cmd, &deps).await?;
                Ok(())
            }
        },
    ))
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some_and(|text| !text.starts_with('/')))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                handle_text(&bot, &msg, &deps).await?;
                Ok(())
            }
        })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            handle_callback(&bot, &q, &deps).await?;
            Ok(())
        }
    })
}

async fn handle_command(bot: &Bot, msg: &Message, cmd: Command, deps: &HandlerDeps) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let user_id = msg.from.as_ref().map(|user| user.id);

    match cmd {
        Command::Start => {
            if let Some(user_id) = user_id {
                deps.take_state(user_id);
            }
            bot.send_message(chat_id, WELCOME_TEXT)
                .reply_markup(main_menu_keyboard())
                .await?;
        }
        Command::Help => {
            bot.send_message(chat_id, Command::descriptions().to_string()).await?;
        }
        Command::Search(term) => {
            if term.trim().is_empty() {
                bot.send_message(chat_id, "Usage: /search <course name or code>").await?;
            } else {
                run_search(bot, chat_id, deps, &term, SearchMode::All, None).await?;
            }
        }
        Command::Gpa => {
            let Some(user_id) = user_id else { return Ok(()) };
            let prompt = deps.enter(user_id, ChatState::AwaitingGpa);
            bot.send_message(chat_id, prompt).await?;
        }
        Command::Cancel => {
            if let Some(user_id) = user_id {
                deps.take_state(user_id);
            }
            bot.send_message(chat_id, "Cancelled")
                .reply_markup(main_menu_keyboard())
                .await?;
        }
        Command::Myid => {
            let text = match user_id {
                Some(id) => format!("Your Telegram id: {}", id),
                None => "I can't see a sender on this message.".to_string(),
            };
            bot.send_message(chat_id, text).await?;
        }
        Command::Ping => {
            bot.send_message(chat_id, "🏓 still alive").await?;
        }
        Command::Syncindex => {
            let allowed = user_id.is_some_and(|id| admin::is_admin(&deps.admin_ids, id.0));
            if !allowed {
                log::warn!("Rejected /syncindex from {:?}", user_id);
                bot.send_message(chat_id, "⛔ Admins only.").await?;
                return Ok(());
            }
            bot.send_message(chat_id, "⏳ Rebuilding the materials index…").await?;
            let reply = admin::rebuild_index(deps).await;
            bot.send_message(chat_id, reply).await?;
        }
    }
    Ok(())
}

/// Runs one search and replies with the result buttons.
pub async fn run_search(
    bot: &Bot,
    chat_id: ChatId,
    deps: &HandlerDeps,
    term: &str,
    mode: SearchMode,
    level: Option<Level>,
) -> ResponseResult<()> {
    let query = match Query::new(term) {
        Ok(query) => query.with_mode(mode).with_level(level),
        Err(e) => {
            log::debug!("Rejected search input ({} chars): {}", term.chars().count(), e);
            bot.send_message(chat_id, rejected_query_text(&e)).await?;
            return Ok(());
        }
    };
    let records = deps.engine.run(&query).await;
    send_results(bot, chat_id, &records).await
}

fn rejected_query_text(err: &QueryError) -> String {
    match err {
        QueryError::EmptyTerm => "Send a course name or code to search for.".to_string(),
        QueryError::TermTooLong { max } => {
            format!("That search is too long. Send a course name or code under {} characters.", max)
        }
    }
}

async fn handle_text(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> ResponseResult<()> {
    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    match deps.take_state(user.id) {
        Some(ChatState::AwaitingQuery { mode, level }) => {
            run_search(bot, chat_id, deps, text, mode, level).await?;
        }
        Some(ChatState::AwaitingGpa) => {
            let (reply, accepted) = gpa::reply_for(text);
            if !accepted {
                deps.states.insert(user.id, ChatState::AwaitingGpa);
            }
            bot.send_message(chat_id, reply).await?;
        }
        Some(ChatState::AwaitingLevel) => {
            let prompt = deps.enter(user.id, ChatState::AwaitingLevel);
            bot.send_message(chat_id, prompt).reply_markup(level_keyboard()).await?;
        }
        None => {
            bot.send_message(chat_id, IDLE_TEXT)
                .reply_markup(main_menu_keyboard())
                .await?;
        }
    }
    Ok(())
}

async fn handle_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> ResponseResult<()> {
    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        let _ = bot.answer_callback_query(q.id.clone()).await;
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();

    if let Some(file_id) = parse_file_callback(data) {
        let _ = bot.answer_callback_query(q.id.clone()).text("Sending file …").await;
        let name = q
            .regular_message()
            .and_then(|m| m.reply_markup())
            .and_then(|markup| file_name_from_keyboard(markup, data))
            .unwrap_or_else(|| file_id.to_string());
        log::info!("User {} requested file {} ({})", q.from.id, file_id, name);
        return send_file(bot, chat_id, deps.provider.as_ref(), file_id, &name).await;
    }

    let _ = bot.answer_callback_query(q.id.clone()).await;
    let Some(action) = MenuAction::parse(data) else {
        log::warn!("Ignoring unknown callback data {:?}", data);
        return Ok(());
    };
    let user_id = q.from.id;

    match action {
        MenuAction::Main => {
            deps.take_state(user_id);
            bot.edit_message_text(chat_id, message_id, MAIN_MENU_TEXT)
                .reply_markup(main_menu_keyboard())
                .await?;
        }
        MenuAction::Materials => {
            deps.take_state(user_id);
            bot.edit_message_text(chat_id, message_id, MATERIALS_MENU_TEXT)
                .reply_markup(materials_keyboard())
                .await?;
        }
        MenuAction::Slides => {
            let prompt = deps.enter(user_id, ChatState::AwaitingLevel);
            bot.edit_message_text(chat_id, message_id, prompt)
                .reply_markup(level_keyboard())
                .await?;
        }
        MenuAction::PastQuestions | MenuAction::SearchAll | MenuAction::Gpa | MenuAction::Level(_) => {
            let state = match action {
                MenuAction::PastQuestions => ChatState::AwaitingQuery {
                    mode: SearchMode::Pastq,
                    level: None,
                },
                MenuAction::Level(level) => ChatState::AwaitingQuery {
                    mode: SearchMode::Slides,
                    level: Some(level),
                },
                MenuAction::Gpa => ChatState::AwaitingGpa,
                _ => ChatState::AwaitingQuery {
                    mode: SearchMode::All,
                    level: None,
                },
            };
            let prompt = deps.enter(user_id, state);
            bot.edit_message_text(chat_id, message_id, prompt).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aaescore::testing::FakeTree;
    use pretty_assertions::assert_eq;

    fn deps() -> HandlerDeps {
        let dir = tempfile::TempDir::new().unwrap();
        let provider: Arc<dyn RemoteTreeProvider> = Arc::new(FakeTree::new());
        let store = FlatIndexStore::new(dir.path().join("drive_index.json"));
        let engine = Arc::new(SearchEngine::new(provider.clone(), store.clone(), None));
        HandlerDeps::new(engine, provider, store, vec![42])
    }

    #[test]
    fn test_enter_replaces_state_and_returns_prompt() {
        let deps = deps();
        let user = UserId(9);
        deps.enter(user, ChatState::AwaitingLevel);
        let prompt = deps.enter(user, ChatState::AwaitingGpa);

        assert_eq!(prompt, ChatState::AwaitingGpa.prompt());
        assert_eq!(deps.take_state(user), Some(ChatState::AwaitingGpa));
        assert_eq!(deps.take_state(user), None);
    }

    #[test]
    fn test_rejected_query_text() {
        assert_eq!(
            rejected_query_text(&QueryError::EmptyTerm),
            "Send a course name or code to search for."
        );
        assert!(rejected_query_text(&QueryError::TermTooLong { max: 200 }).contains("under 200 characters"));
    }

    #[test]
    fn test_states_are_shared_between_clones() {
        let deps = deps();
        let clone = deps.clone();
        deps.enter(UserId(1), ChatState::AwaitingGpa);
        assert!(clone.states.contains_key(&UserId(1)));
        assert_eq!(clone.admin_ids.as_slice(), &[42]);
    }
}
