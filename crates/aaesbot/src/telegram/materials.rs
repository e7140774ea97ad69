//! Search result rendering and file delivery.

use aaescore::core::config;
use aaescore::drive::viewer_link;
use aaescore::{FileRecord, RemoteTreeProvider};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardButtonKind, InlineKeyboardMarkup, InputFile};

use super::cb;

pub const NO_RESULTS_TEXT: &str = "No matching folder or files found.";

const FILE_PREFIX: &str = "file:";
const BUTTON_ICON: &str = "📄 ";

pub fn results_header(total: usize) -> String {
    format!("Found {} file(s):", total)
}

/// Button text: `📄 {name} ({size} MB)`.
pub fn button_label(record: &FileRecord) -> String {
    format!("{}{} ({:.1} MB)", BUTTON_ICON, record.name, record.size_mb())
}

/// Result buttons for the first [`config::search::MAX_RENDERED`] records.
///
/// Records with a drive id get a `file:{id}` callback; index entries without
/// one open their link instead.
pub fn results_keyboard(records: &[FileRecord]) -> InlineKeyboardMarkup {
    let rows = records
        .iter()
        .take(config::search::MAX_RENDERED)
        .filter_map(|record| {
            let label = button_label(record);
            if !record.id.is_empty() {
                return Some(vec![cb(label, format!("{}{}", FILE_PREFIX, record.id))]);
            }
            match url::Url::parse(&record.link) {
                Ok(url) => Some(vec![InlineKeyboardButton::url(label, url)]),
                Err(e) => {
                    log::warn!("Skipping result {:?} with unusable link: {}", record.name, e);
                    None
                }
            }
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

/// Replies with the result list, or the "nothing found" message.
pub async fn send_results(bot: &Bot, chat_id: ChatId, records: &[FileRecord]) -> ResponseResult<()> {
    if records.is_empty() {
        bot.send_message(chat_id, NO_RESULTS_TEXT).await?;
        return Ok(());
    }
    bot.send_message(chat_id, results_header(records.len()))
        .reply_markup(results_keyboard(records))
        .await?;
    Ok(())
}

/// Drive file id from a `file:{id}` callback payload.
pub fn parse_file_callback(data: &str) -> Option<&str> {
    data.strip_prefix(FILE_PREFIX).filter(|id| !id.is_empty())
}

/// Recovers the file name from the result button that carried `data`.
pub fn file_name_from_keyboard(markup: &InlineKeyboardMarkup, data: &str) -> Option<String> {
    markup
        .inline_keyboard
        .iter()
        .flatten()
        .find(|button| matches!(&button.kind, InlineKeyboardButtonKind::CallbackData(d) if d == data))
        .map(|button| {
            let text = button.text.strip_prefix(BUTTON_ICON).unwrap_or(&button.text);
            match text.rfind(" (") {
                Some(pos) => text[..pos].to_string(),
                None => text.to_string(),
            }
        })
}

/// How a requested file reaches the chat.
#[derive(Debug, PartialEq)]
pub enum Delivery {
    Document(Vec<u8>),
    Link(String),
}

/// Downloads the file; anything over the upload limit or any failure becomes a link.
pub async fn prepare_delivery(provider: &dyn RemoteTreeProvider, file_id: &str) -> Delivery {
    match provider.download(file_id).await {
        Ok(bytes) if (bytes.len() as u64) <= config::drive::TELEGRAM_UPLOAD_LIMIT => Delivery::Document(bytes.to_vec()),
        Ok(bytes) => {
            log::info!("File {} is {} bytes, sending a link", file_id, bytes.len());
            Delivery::Link(viewer_link(file_id))
        }
        Err(e) => {
            log::warn!("Download of {} failed, sending a link: {}", file_id, e);
            Delivery::Link(viewer_link(file_id))
        }
    }
}

pub async fn send_file(
    bot: &Bot,
    chat_id: ChatId,
    provider: &dyn RemoteTreeProvider,
    file_id: &str,
    file_name: &str,
) -> ResponseResult<()> {
    match prepare_delivery(provider, file_id).await {
        Delivery::Document(bytes) => {
            bot.send_document(chat_id, InputFile::memory(bytes).file_name(file_name.to_string()))
                .await?;
        }
        Delivery::Link(link) => {
            bot.send_message(chat_id, format!("📎 {}\n{}", file_name, link)).await?;
        }
    }
    Ok(())
}
