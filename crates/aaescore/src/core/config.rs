use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Base URL of the Drive v3 REST API
/// Read from DRIVE_API_URL environment variable (tests point it at a mock server)
pub static DRIVE_API_URL: Lazy<String> = Lazy::new(|| {
    env::var("DRIVE_API_URL").unwrap_or_else(|_| "https://www.googleapis.com/drive/v3".to_string())
});

/// API key sent as `key=` on every Drive request
/// Read from DRIVE_API_KEY environment variable
pub static DRIVE_API_KEY: Lazy<Option<String>> = Lazy::new(|| non_empty_var("DRIVE_API_KEY"));

/// OAuth bearer token for Drive requests
/// Read from DRIVE_ACCESS_TOKEN environment variable
pub static DRIVE_ACCESS_TOKEN: Lazy<Option<String>> = Lazy::new(|| non_empty_var("DRIVE_ACCESS_TOKEN"));

/// Folder id that restricts folder resolution to its direct subfolders
/// Read from DRIVE_SEARCH_SCOPE environment variable
/// Unset: every folder visible to the credentials is a candidate
pub static DRIVE_SEARCH_SCOPE: Lazy<Option<String>> = Lazy::new(|| non_empty_var("DRIVE_SEARCH_SCOPE"));

/// Flat index file path
/// Read from INDEX_PATH environment variable
/// Default: data/drive_index.json
pub static INDEX_PATH: Lazy<String> =
    Lazy::new(|| env::var("INDEX_PATH").unwrap_or_else(|_| "data/drive_index.json".to_string()));

/// Root folder ids walked by the index rebuild job, one per material type
pub mod index_roots {
    use super::{non_empty_var, Lazy};

    pub static SLIDES: Lazy<Option<String>> = Lazy::new(|| non_empty_var("INDEX_ROOT_SLIDES"));
    pub static PASTQ: Lazy<Option<String>> = Lazy::new(|| non_empty_var("INDEX_ROOT_PASTQ"));
    pub static SKILL: Lazy<Option<String>> = Lazy::new(|| non_empty_var("INDEX_ROOT_SKILL"));
    pub static OTHER: Lazy<Option<String>> = Lazy::new(|| non_empty_var("INDEX_ROOT_OTHER"));
}

/// Telegram user ids allowed to run admin commands
/// Read from ADMIN_IDS environment variable (comma separated)
pub static ADMIN_IDS: Lazy<Vec<u64>> = Lazy::new(|| {
    env::var("ADMIN_IDS")
        .map(|raw| parse_id_list(&raw))
        .unwrap_or_default()
});

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parses a comma separated id list, silently skipping malformed entries
pub fn parse_id_list(raw: &str) -> Vec<u64> {
    raw.split(',').filter_map(|part| part.trim().parse().ok()).collect()
}

/// Search tuning
pub mod search {
    /// Minimum weighted-ratio score accepted by fuzzy matching
    pub const FUZZY_SCORE_MIN: u8 = 60;

    /// Result cap for the indexed scan (the folder shortcut is uncapped)
    pub const MAX_RESULTS: usize = 10;

    /// Score of a full-term substring hit
    pub const EXACT_SCORE: u8 = 100;

    /// Score of a partial (term part) substring hit
    pub const PARTIAL_SCORE: u8 = 60;

    /// Maximum number of result buttons rendered in a chat message
    pub const MAX_RENDERED: usize = 15;

    /// Longest accepted search term, in characters
    pub const MAX_TERM_CHARS: usize = 200;
}

/// Drive access configuration
pub mod drive {
    use super::Duration;

    /// Timeout for a single Drive request (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Timeout for downloading file content (in seconds)
    pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

    /// Page size for folder-children listings
    pub const PAGE_SIZE: u32 = 1000;

    /// Page size for the folder-resolution listing
    pub const FOLDER_PAGE_SIZE: u32 = 200;

    /// Maximum folder nesting the flattener will descend before aborting
    pub const MAX_DEPTH: usize = 32;

    /// Files above this size are sent as a link instead of a document
    pub const TELEGRAM_UPLOAD_LIMIT: u64 = 49 * 1024 * 1024;

    /// Mime type Drive uses for folders
    pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    /// Download timeout duration
    pub fn download_timeout() -> Duration {
        Duration::from_secs(DOWNLOAD_TIMEOUT_SECS)
    }
}

/// Telegram Bot API client settings
pub mod network {
    use super::Duration;

    /// HTTP timeout for Bot API calls; must outlast the long-polling wait
    pub const TIMEOUT_SECS: u64 = 60;

    pub fn timeout() -> Duration {
        Duration::from_secs(TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list_skips_garbage() {
        assert_eq!(parse_id_list("12, 34,abc,,56 "), vec![12, 34, 56]);
        assert!(parse_id_list("").is_empty());
    }

    #[test]
    fn test_drive_timeouts() {
        assert_eq!(drive::timeout(), Duration::from_secs(10));
        assert!(drive::download_timeout() > drive::timeout());
    }
}
