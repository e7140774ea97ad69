//! The two resolution strategies and their shared contract.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use super::filters::{filter_by_level, filter_by_mode};
use super::scoring::{fuzzy_scores, substring_scores};
use super::Query;
use crate::core::config;
use crate::drive::{FileRecord, FlatIndexStore, Flattener, FolderResolver, RemoteTreeProvider};

/// Which stage produced a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitSource {
    /// Everything under a folder matched by name.
    Folder { id: String, name: String },
    /// Full-term or term-part substring hits in the flat index.
    Exact,
    /// Weighted-ratio hits in the flat index.
    Fuzzy,
}

/// Records produced by a strategy, tagged with the stage that found them.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub source: HitSource,
    pub records: Vec<FileRecord>,
}

/// One stage of the resolution chain.
///
/// `None` hands the query to the next strategy; `Some` ends resolution, even
/// when the record list is empty.
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, query: &Query) -> Option<SearchOutcome>;
}

/// Resolves the term to a folder and returns everything beneath it.
///
/// Ignores mode, level and the result cap.
pub struct FolderShortcut {
    provider: Arc<dyn RemoteTreeProvider>,
    scope: Option<String>,
}

impl FolderShortcut {
    pub fn new(provider: Arc<dyn RemoteTreeProvider>, scope: Option<String>) -> Self {
        Self { provider, scope }
    }
}

#[async_trait]
impl SearchStrategy for FolderShortcut {
    fn name(&self) -> &'static str {
        "folder-shortcut"
    }

    async fn run(&self, query: &Query) -> Option<SearchOutcome> {
        let resolver = FolderResolver::new(self.provider.as_ref(), self.scope.as_deref());
        let folder = match resolver.resolve(query.term()).await {
            Ok(Some(folder)) => folder,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Folder lookup for {:?} failed, falling back to index: {}", query.term(), e);
                return None;
            }
        };

        let records = match Flattener::new(self.provider.as_ref()).flatten(&folder.id).await {
            Ok(files) => {
                let mut seen = HashSet::new();
                files
                    .into_iter()
                    .filter(|f| seen.insert(f.dedup_key().to_string()))
                    .collect()
            }
            Err(e) => {
                log::error!("Flattening folder {:?} ({}) aborted: {}", folder.name, folder.id, e);
                Vec::new()
            }
        };

        Some(SearchOutcome {
            source: HitSource::Folder {
                id: folder.id,
                name: folder.name,
            },
            records,
        })
    }
}

/// Filters and scores the flat index: substring hits first, fuzzy as fallback.
pub struct IndexedScan {
    store: FlatIndexStore,
    max_results: usize,
    min_fuzzy_score: f64,
}

impl IndexedScan {
    pub fn new(store: FlatIndexStore) -> Self {
        Self {
            store,
            max_results: config::search::MAX_RESULTS,
            min_fuzzy_score: f64::from(config::search::FUZZY_SCORE_MIN),
        }
    }
}

#[async_trait]
impl SearchStrategy for IndexedScan {
    fn name(&self) -> &'static str {
        "indexed-scan"
    }

    async fn run(&self, query: &Query) -> Option<SearchOutcome> {
        let index = self.store.load().await;
        if index.is_empty() {
            log::debug!("Flat index is empty");
            return None;
        }

        let items = filter_by_level(filter_by_mode(index, query.mode()), query.level());
        log::debug!(
            "Index scan for {:?}: {} candidates after mode={} level={:?}",
            query.term(),
            items.len(),
            query.mode(),
            query.level()
        );

        let term = query.term().to_string();
        let max_results = self.max_results;
        let min_fuzzy_score = self.min_fuzzy_score;
        match tokio::task::spawn_blocking(move || score_index(&term, &items, max_results, min_fuzzy_score)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Index scoring task for {:?} failed: {}", query.term(), e);
                None
            }
        }
    }
}

/// Substring pass, then fuzzy pass, over already filtered records.
///
/// CPU bound; callers on the runtime move it to the blocking pool.
pub fn score_index(term: &str, items: &[FileRecord], max_results: usize, min_fuzzy_score: f64) -> Option<SearchOutcome> {
    let exact = substring_scores(term, items);
    if !exact.is_empty() {
        return Some(SearchOutcome {
            source: HitSource::Exact,
            records: exact.into_iter().take(max_results).map(|s| s.record).collect(),
        });
    }

    let fuzzy = fuzzy_scores(term, items, min_fuzzy_score);
    if !fuzzy.is_empty() {
        return Some(SearchOutcome {
            source: HitSource::Fuzzy,
            records: fuzzy.into_iter().take(max_results).map(|s| s.record).collect(),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rec(name: &str) -> FileRecord {
        FileRecord {
            id: String::new(),
            name: name.to_string(),
            link: format!("https://drive.test/{}", name.replace(' ', "_")),
            size: 0,
            kind: Some("slides".to_string()),
            level: None,
        }
    }

    #[test]
    fn test_score_index_prefers_substring_pass() {
        let items = vec![rec("Thermodynamics"), rec("Thermo Notes")];
        let outcome = score_index("thermo", &items, 10, 60.0).unwrap();
        assert_eq!(outcome.source, HitSource::Exact);
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    fn test_score_index_falls_back_to_fuzzy_and_caps() {
        let items: Vec<_> = (0..12).map(|i| rec(&format!("Thermodynamics {}", i))).collect();
        let outcome = score_index("thermodinamics", &items, 10, 60.0).unwrap();
        assert_eq!(outcome.source, HitSource::Fuzzy);
        assert_eq!(outcome.records.len(), 10);
    }

    #[test]
    fn test_score_index_none_when_nothing_scores() {
        assert_eq!(score_index("zzz-nomatch", &[rec("Marine Engines")], 10, 60.0), None);
    }
}
