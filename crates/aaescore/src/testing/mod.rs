//! In-memory drive tree for tests.
//!
//! `FakeTree` implements [`RemoteTreeProvider`] over a hand-built hierarchy,
//! with optional pagination, injected transport failures and call counters.
//! It is public so integration tests and the bot crate's tests can use it.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::core::config;
use crate::drive::{ChildPage, DriveEntry, DriveError, FolderPage, FolderRecord, RemoteTreeProvider};

#[derive(Default)]
struct TreeState {
    children: HashMap<String, Vec<DriveEntry>>,
    folders: Vec<(String, FolderRecord)>,
    failing: HashSet<String>,
    fail_folder_listing: bool,
    contents: HashMap<String, Bytes>,
}

/// Hand-built remote tree.
pub struct FakeTree {
    state: Mutex<TreeState>,
    page_size: usize,
    children_calls: AtomicUsize,
    folder_calls: AtomicUsize,
}

impl Default for FakeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTree {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TreeState::default()),
            page_size: 1000,
            children_calls: AtomicUsize::new(0),
            folder_calls: AtomicUsize::new(0),
        }
    }

    /// Splits every listing into pages of `page_size` entries.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn state(&self) -> MutexGuard<'_, TreeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds a folder under `parent` (any string works as the top-level parent).
    pub fn add_folder(&self, parent: &str, id: &str, name: &str) {
        let mut state = self.state();
        state.children.entry(parent.to_string()).or_default().push(DriveEntry {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: config::drive::FOLDER_MIME.to_string(),
            size: None,
            link: None,
        });
        state.children.entry(id.to_string()).or_default();
        state.folders.push((
            parent.to_string(),
            FolderRecord {
                id: id.to_string(),
                name: name.to_string(),
            },
        ));
    }

    /// Adds a PDF file under `parent` without a web link.
    pub fn add_file(&self, parent: &str, id: &str, name: &str, size: Option<u64>) {
        self.add_file_with_link(parent, id, name, size, None);
    }

    pub fn add_file_with_link(&self, parent: &str, id: &str, name: &str, size: Option<u64>, link: Option<&str>) {
        self.state().children.entry(parent.to_string()).or_default().push(DriveEntry {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: "application/pdf".to_string(),
            size,
            link: link.map(str::to_string),
        });
    }

    /// Makes an existing folder appear again under `parent` (used to build cycles).
    pub fn link_folder(&self, parent: &str, folder_id: &str, name: &str) {
        self.state().children.entry(parent.to_string()).or_default().push(DriveEntry {
            id: folder_id.to_string(),
            name: name.to_string(),
            mime_type: config::drive::FOLDER_MIME.to_string(),
            size: None,
            link: None,
        });
    }

    pub fn set_content(&self, file_id: &str, content: impl Into<Bytes>) {
        self.state().contents.insert(file_id.to_string(), content.into());
    }

    /// Every listing of `folder_id` fails with a timeout.
    pub fn fail_folder(&self, folder_id: &str) {
        self.state().failing.insert(folder_id.to_string());
    }

    /// The folder-resolution listing fails with a timeout.
    pub fn fail_folder_listing(&self) {
        self.state().fail_folder_listing = true;
    }

    pub fn children_calls(&self) -> usize {
        self.children_calls.load(Ordering::SeqCst)
    }

    pub fn folder_calls(&self) -> usize {
        self.folder_calls.load(Ordering::SeqCst)
    }

    fn page<T: Clone>(&self, items: &[T], page_token: Option<&str>) -> (Vec<T>, Option<String>) {
        let offset: usize = page_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (offset + self.page_size).min(items.len());
        let slice = items.get(offset..end).map(<[T]>::to_vec).unwrap_or_default();
        let next = (end < items.len()).then(|| end.to_string());
        (slice, next)
    }
}

#[async_trait]
impl RemoteTreeProvider for FakeTree {
    async fn list_children(&self, folder_id: &str, page_token: Option<&str>) -> Result<ChildPage, DriveError> {
        self.children_calls.fetch_add(1, Ordering::SeqCst);
        let entries = {
            let state = self.state();
            if state.failing.contains(folder_id) {
                return Err(DriveError::Timeout);
            }
            state.children.get(folder_id).cloned().unwrap_or_default()
        };
        let (entries, next_page_token) = self.page(&entries, page_token);
        Ok(ChildPage {
            entries,
            next_page_token,
        })
    }

    async fn list_folders(&self, scope: Option<&str>, page_token: Option<&str>) -> Result<FolderPage, DriveError> {
        self.folder_calls.fetch_add(1, Ordering::SeqCst);
        let folders: Vec<FolderRecord> = {
            let state = self.state();
            if state.fail_folder_listing {
                return Err(DriveError::Timeout);
            }
            state
                .folders
                .iter()
                .filter(|(parent, _)| scope.map_or(true, |s| parent.as_str() == s))
                .map(|(_, folder)| folder.clone())
                .collect()
        };
        let (folders, next_page_token) = self.page(&folders, page_token);
        Ok(FolderPage {
            folders,
            next_page_token,
        })
    }

    async fn download(&self, file_id: &str) -> Result<Bytes, DriveError> {
        self.state()
            .contents
            .get(file_id)
            .cloned()
            .ok_or_else(|| DriveError::Status {
                status: 404,
                body: format!("File not found: {}", file_id),
            })
    }
}
