//! Flat index store: a JSON array of file records on disk.
//!
//! The query path only ever reads it. A missing file is created holding `[]`;
//! an unreadable or corrupt file loads as an empty index. The offline
//! rebuild walks the tagged root folders and replaces the file wholesale.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::error::IndexError;
use super::flatten::Flattener;
use super::provider::RemoteTreeProvider;
use super::types::{FileRecord, Level, MaterialType};
use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Outcome of a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildReport {
    pub total: usize,
    pub per_type: BTreeMap<String, usize>,
    /// Roots whose walk aborted and contributed nothing.
    pub skipped_roots: Vec<String>,
    pub built_at: DateTime<Utc>,
}

/// Handle to the index file.
#[derive(Debug, Clone)]
pub struct FlatIndexStore {
    path: PathBuf,
}

impl FlatIndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `INDEX_PATH`.
    pub fn from_config() -> Self {
        Self::new(config::INDEX_PATH.as_str())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_exists(&self) -> Result<(), IndexError> {
        if fs_err::tokio::metadata(&self.path).await.is_ok() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::tokio::create_dir_all(parent).await?;
        }
        fs_err::tokio::write(&self.path, b"[]").await?;
        log::info!("Created empty flat index at {}", self.path.display());
        Ok(())
    }

    /// Reads and parses the index, surfacing file-level failures.
    ///
    /// Records are decoded one by one: a record that does not decode, or has
    /// a blank name, is logged and dropped while the rest still load.
    pub async fn try_load(&self) -> Result<Vec<FileRecord>, IndexError> {
        self.ensure_exists().await?;
        let raw = fs_err::tokio::read_to_string(&self.path).await?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        let total = values.len();

        let records: Vec<FileRecord> = values
            .into_iter()
            .enumerate()
            .filter_map(|(pos, value)| match serde_json::from_value::<FileRecord>(value) {
                Ok(record) if !record.name.trim().is_empty() => Some(record),
                Ok(_) => None,
                Err(e) => {
                    log::warn!("Skipping index record #{} in {}: {}", pos, self.path.display(), e);
                    None
                }
            })
            .collect();
        if records.len() != total {
            log::warn!(
                "Dropped {} unusable records from {}",
                total - records.len(),
                self.path.display()
            );
        }
        Ok(records)
    }

    /// Reads the index; any failure is logged and yields an empty index.
    pub async fn load(&self) -> Vec<FileRecord> {
        match self.try_load().await {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Flat index {} unusable, treating as empty: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Replaces the index atomically (temp sibling + rename).
    pub async fn save(&self, records: &[FileRecord]) -> Result<(), IndexError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::tokio::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs_err::tokio::write(&tmp, json).await?;
        fs_err::tokio::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Walks every `(type, root folder)` pair and rewrites the index.
    ///
    /// A root whose walk aborts is logged and skipped; the others still land.
    pub async fn rebuild(
        &self,
        provider: &dyn RemoteTreeProvider,
        roots: &[(MaterialType, String)],
    ) -> Result<RebuildReport, IndexError> {
        let flattener = Flattener::new(provider);
        let mut index = Vec::new();
        let mut per_type = BTreeMap::new();
        let mut skipped_roots = Vec::new();

        for (kind, root_id) in roots {
            let files = match flattener.flatten(root_id).await {
                Ok(files) => files,
                Err(e) => {
                    log::error!("Skipping {} root {}: {}", kind, root_id, e);
                    skipped_roots.push(root_id.clone());
                    continue;
                }
            };

            let tagged: Vec<FileRecord> = files
                .into_iter()
                .filter(|f| !f.name.trim().is_empty())
                .map(|f| tag_record(f, *kind))
                .collect();
            log::info!("Indexed {} {} files from root {}", tagged.len(), kind, root_id);
            *per_type.entry(kind.to_string()).or_insert(0) += tagged.len();
            index.extend(tagged);
        }

        self.save(&index).await?;
        let report = RebuildReport {
            total: index.len(),
            per_type,
            skipped_roots,
            built_at: Utc::now(),
        };
        log::info!("✅ Flat index rebuilt: {} files at {}", report.total, self.path.display());
        Ok(report)
    }
}

impl FlatIndexStore {
    /// Rebuild entry point for the operator CLI and `/syncindex`.
    ///
    /// Refuses to run with no roots, which would otherwise wipe the index.
    pub async fn sync_roots(
        &self,
        provider: &dyn RemoteTreeProvider,
        roots: &[(MaterialType, String)],
    ) -> AppResult<RebuildReport> {
        if roots.is_empty() {
            return Err(AppError::Validation(
                "no index roots configured, set at least one of INDEX_ROOT_SLIDES, INDEX_ROOT_PASTQ, \
                 INDEX_ROOT_SKILL, INDEX_ROOT_OTHER"
                    .to_string(),
            ));
        }
        Ok(self.rebuild(provider, roots).await?)
    }
}

/// Attaches the root's type tag and a level guessed from the file name.
pub fn tag_record(mut record: FileRecord, kind: MaterialType) -> FileRecord {
    record.kind = Some(kind.to_string());
    record.level = Some(
        Level::guess_from_name(&record.name)
            .map(|l| l.to_string())
            .unwrap_or_default(),
    );
    record
}

/// Roots configured through `INDEX_ROOT_*`, in a fixed order.
pub fn configured_roots() -> Vec<(MaterialType, String)> {
    [
        (MaterialType::Slides, config::index_roots::SLIDES.clone()),
        (MaterialType::Pastq, config::index_roots::PASTQ.clone()),
        (MaterialType::Skill, config::index_roots::SKILL.clone()),
        (MaterialType::Other, config::index_roots::OTHER.clone()),
    ]
    .into_iter()
    .filter_map(|(kind, id)| id.map(|id| (kind, id)))
    .collect()
}
