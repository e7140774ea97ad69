//! Recursive flattener: every file below a folder, depth first.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use super::error::{DriveError, FlattenError};
use super::provider::{list_all_children, RemoteTreeProvider};
use super::types::FileRecord;
use crate::core::config;

type WalkFuture<'a> = Pin<Box<dyn Future<Output = Result<(), FlattenError>> + Send + 'a>>;

/// Walks a remote folder tree and collects its files.
///
/// A folder whose listing fails is logged and treated as empty; the walk
/// continues with its siblings. Revisiting an ancestor or nesting deeper
/// than `max_depth` aborts the whole walk.
pub struct Flattener<'a> {
    provider: &'a dyn RemoteTreeProvider,
    max_depth: usize,
}

#[derive(Default)]
struct WalkState {
    files: Vec<FileRecord>,
    ancestors: Vec<String>,
    finished: HashSet<String>,
}

impl<'a> Flattener<'a> {
    pub fn new(provider: &'a dyn RemoteTreeProvider) -> Self {
        Self {
            provider,
            max_depth: config::drive::MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns every non-folder descendant of `folder_id` in traversal order.
    pub async fn flatten(&self, folder_id: &str) -> Result<Vec<FileRecord>, FlattenError> {
        let mut state = WalkState::default();
        self.walk(folder_id.to_string(), 0, &mut state).await?;
        log::debug!("Flattened folder {}: {} files", folder_id, state.files.len());
        Ok(state.files)
    }

    fn walk<'s>(&'s self, folder_id: String, depth: usize, state: &'s mut WalkState) -> WalkFuture<'s> {
        Box::pin(async move {
            if state.ancestors.contains(&folder_id) {
                return Err(FlattenError::CycleDetected { folder_id });
            }
            if depth > self.max_depth {
                return Err(FlattenError::DepthExceeded {
                    folder_id,
                    limit: self.max_depth,
                });
            }
            // Drive folders may have several parents; a subtree already walked is not repeated.
            if state.finished.contains(&folder_id) {
                log::debug!("Skipping folder {} (already flattened via another parent)", folder_id);
                return Ok(());
            }

            let entries = match list_all_children(self.provider, &folder_id).await {
                Ok(entries) => entries,
                Err(e) => {
                    log_transport_failure(&folder_id, &e);
                    Vec::new()
                }
            };

            state.ancestors.push(folder_id.clone());
            for entry in entries {
                if entry.is_folder() {
                    self.walk(entry.id, depth + 1, state).await?;
                } else {
                    state.files.push(entry.into_file_record());
                }
            }
            state.ancestors.pop();
            state.finished.insert(folder_id);
            Ok(())
        })
    }
}

fn log_transport_failure(folder_id: &str, err: &DriveError) {
    log::warn!("Listing folder {} failed, treating it as empty: {}", folder_id, err);
}
