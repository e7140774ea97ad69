//! Query resolution: turns a free-text term plus optional mode/level filters
//! into a ranked, de-duplicated list of files.
//!
//! Resolution is a fixed chain of [`SearchStrategy`]s: the folder shortcut
//! first, then the scan over the flat index. The first strategy that
//! produces an outcome wins.

pub mod engine;
pub mod filters;
pub mod scoring;
pub mod strategy;

use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::core::config;
use crate::drive::Level;

pub use engine::SearchEngine;
pub use strategy::{FolderShortcut, HitSource, IndexedScan, SearchOutcome, SearchStrategy};

/// Rejected search input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("search term is empty")]
    EmptyTerm,

    #[error("search term is longer than {max} characters")]
    TermTooLong { max: usize },
}

/// Coarse category filter applied before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SearchMode {
    #[default]
    #[strum(to_string = "all")]
    All,
    #[strum(to_string = "slides", serialize = "slide")]
    Slides,
    #[strum(to_string = "pastq", serialize = "past", serialize = "past questions", serialize = "pastquestions")]
    Pastq,
    #[strum(to_string = "skill", serialize = "skills")]
    Skill,
    #[strum(to_string = "other", serialize = "others")]
    Other,
    /// A category name nobody recognized; matches no index record.
    #[strum(to_string = "unrecognized")]
    Unrecognized,
}

impl SearchMode {
    /// Parses user-facing mode input.
    ///
    /// Blank input means `All`. An unknown category becomes `Unrecognized`,
    /// so the index scan keeps nothing rather than widening to every category.
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return SearchMode::All;
        }
        raw.parse().unwrap_or_else(|_| {
            log::warn!("Unknown search mode {:?}, no index records will match", raw);
            SearchMode::Unrecognized
        })
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    term: String,
    mode: SearchMode,
    level: Option<Level>,
}

impl Query {
    /// A query over all materials with no level filter.
    pub fn new(term: &str) -> Result<Self, QueryError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(QueryError::EmptyTerm);
        }
        if term.chars().count() > config::search::MAX_TERM_CHARS {
            return Err(QueryError::TermTooLong {
                max: config::search::MAX_TERM_CHARS,
            });
        }
        Ok(Self {
            term: term.to_string(),
            mode: SearchMode::All,
            level: None,
        })
    }

    /// Builds a query from raw chat/CLI input.
    ///
    /// A level string without any of 100..400 in it disables level filtering.
    pub fn from_raw(term: &str, mode: Option<&str>, level: Option<&str>) -> Result<Self, QueryError> {
        Ok(Self::new(term)?
            .with_mode(mode.map(SearchMode::parse_lenient).unwrap_or_default())
            .with_level(level.and_then(Level::normalize)))
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_level(mut self, level: Option<Level>) -> Self {
        self.level = level;
        self
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn level(&self) -> Option<Level> {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_terms_are_rejected() {
        assert_eq!(Query::new("").unwrap_err(), QueryError::EmptyTerm);
        assert_eq!(Query::new("   \t").unwrap_err(), QueryError::EmptyTerm);
    }

    #[test]
    fn test_overlong_terms_are_rejected() {
        let limit = config::search::MAX_TERM_CHARS;
        assert!(Query::new(&"é".repeat(limit)).is_ok());
        assert_eq!(
            Query::new(&"abcdefghij ".repeat(370)).unwrap_err(),
            QueryError::TermTooLong { max: limit }
        );
        // Surrounding whitespace does not count.
        assert!(Query::new(&format!("   {}   ", "a".repeat(limit))).is_ok());
    }

    #[test]
    fn test_term_is_trimmed() {
        assert_eq!(Query::new("  Fluid Mechanics ").unwrap().term(), "Fluid Mechanics");
    }

    #[test]
    fn test_mode_aliases() {
        assert_eq!(SearchMode::parse_lenient("Past Questions"), SearchMode::Pastq);
        assert_eq!(SearchMode::parse_lenient("past"), SearchMode::Pastq);
        assert_eq!(SearchMode::parse_lenient("SLIDES"), SearchMode::Slides);
        assert_eq!(SearchMode::parse_lenient("skills"), SearchMode::Skill);
        assert_eq!(SearchMode::parse_lenient(""), SearchMode::All);
        assert_eq!(SearchMode::parse_lenient("videos"), SearchMode::Unrecognized);
        assert_eq!(SearchMode::Pastq.to_string(), "pastq");
    }

    #[test]
    fn test_from_raw_normalizes_level() {
        for raw in ["Level 200", "L200", "200"] {
            let query = Query::from_raw("x", Some("all"), Some(raw)).unwrap();
            assert_eq!(query.level(), Some(Level::L200));
        }
        let query = Query::from_raw("x", None, Some("final year")).unwrap();
        assert_eq!(query.level(), None);
        assert_eq!(query.mode(), SearchMode::All);
    }
}
