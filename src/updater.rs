//! The update pipeline: release check, sync, copy, persist
//!
//! Entries are processed strictly in config order. Release lookups may fail
//! softly; anything else aborts the run before the config is saved.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{RepoConfig, RepositoryEntry};
use crate::docs::{self, CopyStats};
use crate::git::{self, SyncAction};
use crate::release::ReleaseSource;

/// Outcome for a single repository entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub url: String,
    pub repo_name: String,
    /// Version before the run, when it changed
    pub previous_version: Option<String>,
    pub version: String,
    pub sync: SyncAction,
    pub copied: CopyStats,
    pub docs_dir: PathBuf,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub entries: Vec<EntryReport>,
    pub config_saved: bool,
}

impl UpdateReport {
    pub fn updated_versions(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.previous_version.is_some())
            .count()
    }

    pub fn files_copied(&self) -> usize {
        self.entries.iter().map(|e| e.copied.files).sum()
    }
}

/// Result of a read-only release check for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseStatus {
    pub url: String,
    pub stored_version: String,
    pub latest_version: Option<String>,
}

impl ReleaseStatus {
    pub fn has_update(&self) -> bool {
        newer_version(&self.stored_version, self.latest_version.as_deref()).is_some()
    }
}

/// The version to record, if the lookup produced one that differs from what we have
fn newer_version<'a>(stored: &str, latest: Option<&'a str>) -> Option<&'a str> {
    latest.filter(|v| !v.is_empty() && *v != stored)
}

/// Run the full pipeline over every entry and save `config_path` once if any version changed
pub async fn update_docs<R: ReleaseSource>(
    config: &mut RepoConfig,
    config_path: &Path,
    releases: &R,
) -> Result<UpdateReport> {
    let temp_storage = config.temp_storage_dir();
    let docs_storage = config.docs_storage_dir();
    for dir in [&temp_storage, &docs_storage] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let mut report = UpdateReport::default();
    let mut config_updated = false;

    for repo in config.repositories.iter_mut() {
        let entry = update_entry(repo, &temp_storage, &docs_storage, releases).await?;
        config_updated |= entry.previous_version.is_some();
        report.entries.push(entry);
    }

    if config_updated {
        config.save_to_file(config_path).inspect_err(|e| {
            tracing::error!("Failed to save config file: {:#}", e);
        })?;
        tracing::info!("Config file updated with new versions");
        report.config_saved = true;
    }

    tracing::info!(
        "All docs have been updated and stored in {}",
        docs_storage.display()
    );
    Ok(report)
}

async fn update_entry<R: ReleaseSource>(
    repo: &mut RepositoryEntry,
    temp_storage: &Path,
    docs_storage: &Path,
    releases: &R,
) -> Result<EntryReport> {
    tracing::info!("Processing repository: {}", repo.url);

    let latest = releases.latest_release(&repo.url).await;
    let previous_version = match newer_version(&repo.version, latest.as_deref()) {
        Some(version) => {
            tracing::info!("New version found for {}: {}", repo.url, version);
            Some(std::mem::replace(&mut repo.version, version.to_string()))
        }
        None => {
            tracing::info!("No new version found for {}", repo.url);
            None
        }
    };

    let repo_name = repo.repo_name()?;
    let work_dir = temp_storage.join(&repo_name);
    let sync = git::sync_repository(&repo.url, &repo.branch, &work_dir)?;

    let docs_dir = docs_storage.join(&repo_name).join(&repo.version);
    let copied = docs::copy_docs(&work_dir, &docs_dir, repo.docs_folder())?;

    tracing::info!("Docs updated for {} version {}", repo_name, repo.version);

    Ok(EntryReport {
        url: repo.url.clone(),
        repo_name,
        previous_version,
        version: repo.version.clone(),
        sync,
        copied,
        docs_dir,
    })
}

/// Look up the latest release of every entry without touching anything on disk
pub async fn check_releases<R: ReleaseSource>(
    config: &RepoConfig,
    releases: &R,
) -> Vec<ReleaseStatus> {
    let mut statuses = Vec::with_capacity(config.repositories.len());
    for repo in &config.repositories {
        statuses.push(ReleaseStatus {
            url: repo.url.clone(),
            stored_version: repo.version.clone(),
            latest_version: releases.latest_release(&repo.url).await,
        });
    }
    statuses
}
