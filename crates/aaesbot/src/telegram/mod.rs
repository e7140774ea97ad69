//! Telegram bot integration and handlers

pub mod admin;
pub mod bot;
pub mod gpa;
pub mod handlers;
pub mod materials;
pub mod menu;
pub mod state;

use teloxide::types::InlineKeyboardButton;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use state::ChatState;

/// Shorthand for a callback button.
pub(crate) fn cb(text: impl Into<String>, data: impl Into<String>) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, data)
}
