//! Remote tree provider seam.
//!
//! Everything that walks or searches the shared drive goes through
//! [`RemoteTreeProvider`], so tests substitute an in-memory tree for the
//! HTTP client.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::DriveError;
use super::types::{ChildPage, DriveEntry, FolderRecord};

/// One page of the folder-resolution listing.
#[derive(Debug, Clone, Default)]
pub struct FolderPage {
    pub folders: Vec<FolderRecord>,
    pub next_page_token: Option<String>,
}

/// Lists a remote folder tree.
///
/// An `Ok` empty page means the folder is genuinely empty; transport failures
/// are always `Err`.
#[async_trait]
pub trait RemoteTreeProvider: Send + Sync {
    /// Immediate children of `folder_id`, one page at a time.
    async fn list_children(&self, folder_id: &str, page_token: Option<&str>) -> Result<ChildPage, DriveError>;

    /// Every folder in the search scope (all visible folders when `scope` is `None`).
    async fn list_folders(&self, scope: Option<&str>, page_token: Option<&str>) -> Result<FolderPage, DriveError>;

    /// Raw content of a file.
    async fn download(&self, file_id: &str) -> Result<Bytes, DriveError>;
}

/// Drains every page of `folder_id`'s children.
pub async fn list_all_children(
    provider: &dyn RemoteTreeProvider,
    folder_id: &str,
) -> Result<Vec<DriveEntry>, DriveError> {
    let mut entries = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = provider.list_children(folder_id, page_token.as_deref()).await?;
        entries.extend(page.entries);
        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }
    Ok(entries)
}

/// Drains every page of the folder listing.
pub async fn list_all_folders(
    provider: &dyn RemoteTreeProvider,
    scope: Option<&str>,
) -> Result<Vec<FolderRecord>, DriveError> {
    let mut folders = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = provider.list_folders(scope, page_token.as_deref()).await?;
        folders.extend(page.folders);
        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }
    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTree;

    #[tokio::test]
    async fn test_list_all_children_drains_pages() {
        let tree = FakeTree::new().with_page_size(2);
        tree.add_folder("root", "r", "Root");
        for i in 0..5 {
            tree.add_file("r", &format!("f{i}"), &format!("File {i}"), None);
        }

        let entries = list_all_children(&tree, "r").await.unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(tree.children_calls(), 3);
    }

    #[tokio::test]
    async fn test_list_all_children_propagates_transport_error() {
        let tree = FakeTree::new();
        tree.add_folder("root", "r", "Root");
        tree.fail_folder("r");

        assert!(list_all_children(&tree, "r").await.is_err());
    }

    #[tokio::test]
    async fn test_list_all_folders_respects_scope() {
        let tree = FakeTree::new();
        tree.add_folder("root", "a", "Aero");
        tree.add_folder("a", "b", "Fluid Mechanics");
        tree.add_folder("root", "c", "Marine");

        let all = list_all_folders(&tree, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let scoped = list_all_folders(&tree, Some("a")).await.unwrap();
        assert_eq!(scoped, vec![FolderRecord { id: "b".into(), name: "Fluid Mechanics".into() }]);
    }
}
