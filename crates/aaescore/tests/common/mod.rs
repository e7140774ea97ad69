//! Common test utilities
//!
//! Shared by the integration tests: an in-memory drive tree plus a flat
//! index in a temporary directory, wired into a `SearchEngine`.

#![allow(dead_code)]

use std::sync::Arc;

use aaescore::testing::FakeTree;
use aaescore::{FileRecord, FlatIndexStore, RemoteTreeProvider, SearchEngine};
use tempfile::TempDir;

pub struct TestEnvironment {
    pub tree: Arc<FakeTree>,
    pub store: FlatIndexStore,
    _dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let store = FlatIndexStore::new(dir.path().join("data/drive_index.json"));
        Self {
            tree: Arc::new(FakeTree::new()),
            store,
            _dir: dir,
        }
    }

    pub async fn with_index(records: Vec<FileRecord>) -> Self {
        let env = Self::new();
        env.store.save(&records).await.expect("save index");
        env
    }

    pub fn engine(&self) -> SearchEngine {
        let provider: Arc<dyn RemoteTreeProvider> = self.tree.clone();
        SearchEngine::new(provider, self.store.clone(), None)
    }
}

/// A flat index record as the rebuild job writes it.
pub fn indexed(name: &str, kind: &str, level: &str, link: &str) -> FileRecord {
    FileRecord {
        id: String::new(),
        name: name.to_string(),
        link: link.to_string(),
        size: 0,
        kind: Some(kind.to_string()),
        level: Some(level.to_string()),
    }
}

pub fn names(records: &[FileRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}
