//! Shared drive access: the remote tree seam, its HTTP client, the recursive
//! flattener, folder resolution and the flat index.

pub mod client;
pub mod error;
pub mod flatten;
pub mod index;
pub mod provider;
pub mod resolver;
pub mod types;

pub use client::DriveClient;
pub use error::{DriveError, FlattenError, IndexError};
pub use flatten::Flattener;
pub use index::{configured_roots, FlatIndexStore, RebuildReport};
pub use provider::{list_all_children, list_all_folders, FolderPage, RemoteTreeProvider};
pub use resolver::{pick_folder, FolderResolver};
pub use types::{viewer_link, ChildPage, DriveEntry, FileRecord, FolderRecord, Level, MaterialType};
