//! aaescore - core library for the AAES study bot
//!
//! Everything here is independent of Telegram, so the bot, the operator CLI
//! and the tests share one implementation.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors and logging
//! - `drive`: remote tree provider, recursive flattener, folder resolver, flat index
//! - `fuzzy`: weighted-ratio string similarity
//! - `search`: query resolution (folder shortcut, then indexed scan)
//! - `gpa`: GPA calculator
//! - `testing`: in-memory drive tree for tests

pub mod core;
pub mod drive;
pub mod fuzzy;
pub mod gpa;
pub mod search;
pub mod testing;

// Re-export commonly used types for convenience
pub use crate::core::{AppError, AppResult};
pub use drive::{DriveClient, FileRecord, FlatIndexStore, RemoteTreeProvider};
pub use search::{Query, QueryError, SearchEngine, SearchMode};
