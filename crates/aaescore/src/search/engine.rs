//! The resolution chain behind every `/search` and materials query.

use std::sync::Arc;

use super::strategy::{FolderShortcut, IndexedScan, SearchOutcome, SearchStrategy};
use super::{Query, QueryError};
use crate::drive::{FileRecord, FlatIndexStore, RemoteTreeProvider};

/// Runs strategies in order until one produces an outcome.
pub struct SearchEngine {
    strategies: Vec<Box<dyn SearchStrategy>>,
}

impl SearchEngine {
    /// Folder shortcut first, then the flat index scan.
    pub fn new(provider: Arc<dyn RemoteTreeProvider>, store: FlatIndexStore, scope: Option<String>) -> Self {
        Self::with_strategies(vec![
            Box::new(FolderShortcut::new(provider, scope)),
            Box::new(IndexedScan::new(store)),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn SearchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies in precedence order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Full outcome including which stage answered; `None` when nothing matched.
    pub async fn resolve(&self, query: &Query) -> Option<SearchOutcome> {
        for strategy in &self.strategies {
            if let Some(outcome) = strategy.run(query).await {
                log::info!(
                    "Search {:?} answered by {} with {} records",
                    query.term(),
                    strategy.name(),
                    outcome.records.len()
                );
                return Some(outcome);
            }
        }
        log::info!("Search {:?} found nothing", query.term());
        None
    }

    /// Runs a validated query and returns just the records.
    pub async fn run(&self, query: &Query) -> Vec<FileRecord> {
        self.resolve(query).await.map(|o| o.records).unwrap_or_default()
    }

    /// Raw-input entry point used by the chat and CLI layers.
    ///
    /// Only an empty term is an error; every other failure yields an empty list.
    pub async fn search(&self, term: &str, mode: &str, level: Option<&str>) -> Result<Vec<FileRecord>, QueryError> {
        let query = Query::from_raw(term, Some(mode), level)?;
        Ok(self.run(&query).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::HitSource;
    use crate::testing::FakeTree;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(Option<SearchOutcome>, Arc<AtomicUsize>);

    #[async_trait]
    impl SearchStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn run(&self, _query: &Query) -> Option<SearchOutcome> {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_first_outcome_wins_even_when_empty() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let engine = SearchEngine::with_strategies(vec![
            Box::new(Fixed(
                Some(SearchOutcome {
                    source: HitSource::Exact,
                    records: vec![],
                }),
                first_calls.clone(),
            )),
            Box::new(Fixed(None, second_calls.clone())),
        ]);

        let query = Query::new("x").unwrap();
        assert_eq!(engine.resolve(&query).await.map(|o| o.source), Some(HitSource::Exact));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_outcome_is_empty_list() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = SearchEngine::with_strategies(vec![Box::new(Fixed(None, calls))]);
        assert!(engine.search("x", "all", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_term_rejected_before_any_strategy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = SearchEngine::with_strategies(vec![Box::new(Fixed(None, calls.clone()))]);
        assert_eq!(engine.search("  ", "all", None).await.unwrap_err(), QueryError::EmptyTerm);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_default_chain_order() {
        let tree: Arc<dyn RemoteTreeProvider> = Arc::new(FakeTree::new());
        let engine = SearchEngine::new(tree, FlatIndexStore::new("/nonexistent/index.json"), None);
        assert_eq!(engine.strategy_names(), vec!["folder-shortcut", "indexed-scan"]);
    }
}
