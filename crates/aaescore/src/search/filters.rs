//! Mode and level filters over flat index records.
//!
//! Mode matching is substring based on the lower-cased type tag so drifted
//! tags (`past_questions_2023`, `Slides-old`) still land in the right mode.

use super::SearchMode;
use crate::drive::{FileRecord, Level};

/// Whether a record's type tag passes the mode filter.
pub fn mode_matches(kind: Option<&str>, mode: SearchMode) -> bool {
    let tag = kind.unwrap_or("").to_lowercase();
    match mode {
        SearchMode::All => true,
        SearchMode::Slides => tag.contains("slide"),
        SearchMode::Pastq => tag.contains("past") || tag.contains("question"),
        SearchMode::Skill => tag.contains("skill"),
        SearchMode::Other => !matches!(tag.as_str(), "slides" | "pastq" | "skill"),
        SearchMode::Unrecognized => false,
    }
}

pub fn filter_by_mode(items: Vec<FileRecord>, mode: SearchMode) -> Vec<FileRecord> {
    if mode == SearchMode::All {
        return items;
    }
    items
        .into_iter()
        .filter(|item| mode_matches(item.kind.as_deref(), mode))
        .collect()
}

/// Keeps records whose stored level equals `level`; `None` keeps everything.
pub fn filter_by_level(items: Vec<FileRecord>, level: Option<Level>) -> Vec<FileRecord> {
    let Some(level) = level else {
        return items;
    };
    let label = level.to_string();
    items
        .into_iter()
        .filter(|item| item.level.as_deref().unwrap_or("").eq_ignore_ascii_case(&label))
        .collect()
}
