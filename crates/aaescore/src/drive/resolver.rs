//! Maps a free-text query to the best matching folder.

use std::cmp::Ordering;

use super::error::DriveError;
use super::provider::{list_all_folders, RemoteTreeProvider};
use super::types::FolderRecord;
use crate::core::config;
use crate::fuzzy;

/// Resolves queries against the folders visible in `scope`.
pub struct FolderResolver<'a> {
    provider: &'a dyn RemoteTreeProvider,
    scope: Option<&'a str>,
    min_score: f64,
}

impl<'a> FolderResolver<'a> {
    pub fn new(provider: &'a dyn RemoteTreeProvider, scope: Option<&'a str>) -> Self {
        Self {
            provider,
            scope,
            min_score: f64::from(config::search::FUZZY_SCORE_MIN),
        }
    }

    /// Lists the folders and picks one; `Ok(None)` when nothing matches well enough.
    ///
    /// Scoring runs on the blocking pool so a large folder list does not hold
    /// up other chats.
    pub async fn resolve(&self, query: &str) -> Result<Option<FolderRecord>, DriveError> {
        let folders = list_all_folders(self.provider, self.scope).await?;
        let candidates = folders.len();
        let owned_query = query.to_string();
        let min_score = self.min_score;
        let picked = match tokio::task::spawn_blocking(move || {
            pick_folder(&owned_query, &folders, min_score).cloned()
        })
        .await
        {
            Ok(picked) => picked,
            Err(e) => {
                log::error!("Folder scoring task for {:?} failed: {}", query, e);
                None
            }
        };
        match &picked {
            Some(folder) => log::debug!("Query {:?} resolved to folder {:?} ({})", query, folder.name, folder.id),
            None => log::debug!("Query {:?} matched none of {} folders", query, candidates),
        }
        Ok(picked)
    }
}

/// Exact (case-insensitive) name match first, then the best fuzzy match.
///
/// Fuzzy ties go to the alphabetically first name (case-insensitive), then
/// to listing order.
pub fn pick_folder<'f>(query: &str, folders: &'f [FolderRecord], min_score: f64) -> Option<&'f FolderRecord> {
    if folders.is_empty() {
        return None;
    }

    let query = query.trim();
    let query_lower = query.to_lowercase();
    if let Some(exact) = folders.iter().find(|f| f.name.to_lowercase() == query_lower) {
        return Some(exact);
    }

    let names: Vec<&str> = folders.iter().map(|f| f.name.as_str()).collect();
    let hits = fuzzy::extract(query, &names, min_score);
    let top_score = hits.first()?.score;

    hits.iter()
        .take_while(|m| m.score.total_cmp(&top_score) == Ordering::Equal)
        .min_by(|a, b| {
            folders[a.index]
                .name
                .to_lowercase()
                .cmp(&folders[b.index].name.to_lowercase())
                .then(a.index.cmp(&b.index))
        })
        .map(|m| &folders[m.index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTree;
    use pretty_assertions::assert_eq;

    fn folder(id: &str, name: &str) -> FolderRecord {
        FolderRecord {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let folders = vec![folder("1", "Fluid Mechanics II"), folder("2", "Fluid Mechanics")];
        assert_eq!(pick_folder("fluid mechanics", &folders, 60.0).map(|f| f.id.as_str()), Some("2"));
    }

    #[test]
    fn test_exact_match_returns_first_duplicate() {
        let folders = vec![folder("1", "Thermo"), folder("2", "THERMO")];
        assert_eq!(pick_folder("Thermo", &folders, 60.0).map(|f| f.id.as_str()), Some("1"));
    }

    #[test]
    fn test_fuzzy_match_above_threshold() {
        let folders = vec![folder("1", "Aerodynamics"), folder("2", "Marine Engines")];
        assert_eq!(pick_folder("aerodynamic", &folders, 60.0).map(|f| f.id.as_str()), Some("1"));
    }

    #[test]
    fn test_fuzzy_below_threshold_is_none() {
        let folders = vec![folder("1", "Aerodynamics")];
        assert!(pick_folder("zzz-nomatch", &folders, 60.0).is_none());
        assert!(pick_folder("anything", &[], 60.0).is_none());
    }

    #[test]
    fn test_fuzzy_tie_breaks_alphabetically() {
        // Both names contain the query as a whole word and score identically.
        let folders = vec![folder("1", "Zeta Propulsion"), folder("2", "Alpha Propulsion")];
        assert_eq!(pick_folder("propulsion", &folders, 60.0).map(|f| f.id.as_str()), Some("2"));
    }

    #[tokio::test]
    async fn test_resolve_uses_scope() {
        let tree = FakeTree::new();
        tree.add_folder("scope", "a", "Fluid Mechanics");
        tree.add_folder("elsewhere", "b", "Fluid Mechanics Archive");

        let resolver = FolderResolver::new(&tree, Some("scope"));
        let resolved = resolver.resolve("Fluid Mechanics").await.unwrap();
        assert_eq!(resolved, Some(folder("a", "Fluid Mechanics")));
        assert_eq!(tree.folder_calls(), 1);
        assert_eq!(tree.children_calls(), 0);
    }

    #[tokio::test]
    async fn test_resolve_drains_paged_folder_listing() {
        let tree = FakeTree::new().with_page_size(2);
        for i in 0..5 {
            tree.add_folder("root", &format!("f{i}"), &format!("Course {i}"));
        }
        tree.add_folder("root", "t", "Thermodynamics");

        let resolved = FolderResolver::new(&tree, None).resolve("thermodynamics").await.unwrap();
        assert_eq!(resolved.map(|f| f.id), Some("t".to_string()));
        assert_eq!(tree.folder_calls(), 3);
    }

    #[tokio::test]
    async fn test_resolve_surfaces_transport_error() {
        let tree = FakeTree::new();
        tree.fail_folder_listing();
        let resolver = FolderResolver::new(&tree, None);
        assert!(resolver.resolve("anything").await.is_err());
    }
}
