//! Configuration management for docs-updater
//!
//! This module handles loading, saving and validating the tracked-repositories
//! file. Application settings (log directory, release API, token) live in
//! [`settings`].

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub mod settings;

pub use settings::Settings;

/// The tracked-repositories file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Where working copies are cloned
    pub temp_storage_path: String,

    /// Root of the versioned documentation archive
    pub docs_storage_path: String,

    /// Tracked repositories, processed in this order
    pub repositories: Vec<RepositoryEntry>,

    /// Keys we don't know about, written back untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single tracked repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryEntry {
    /// Clone URL, e.g. `https://github.com/owner/repo.git`
    pub url: String,

    /// Branch to clone
    pub branch: String,

    /// Last recorded release version, without the leading `v`
    pub version: String,

    /// Documentation subfolder; empty means the whole working copy
    #[serde(default)]
    pub docs_folder: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RepositoryEntry {
    /// Directory name used for both the working copy and the archive
    pub fn repo_name(&self) -> Result<String> {
        repo_name_from_url(&self.url)
    }

    /// The docs subfolder, used verbatim, or `None` when the whole tree is archived
    pub fn docs_folder(&self) -> Option<&str> {
        (!self.docs_folder.is_empty()).then_some(self.docs_folder.as_str())
    }
}

/// Derive the repository name from the final URL segment, minus any `.git` suffix
pub fn repo_name_from_url(url: &str) -> Result<String> {
    let last = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let name = last.strip_suffix(".git").unwrap_or(last);

    if name.is_empty() {
        bail!("Cannot derive a repository name from URL '{}'", url);
    }

    Ok(name.to_string())
}

impl RepoConfig {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: RepoConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(
            "Loaded {} repositories from {}",
            config.repositories.len(),
            path.display()
        );

        Ok(config)
    }

    /// Save configuration to file, overwriting it in place
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let mut content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;
        content.push('\n');

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Config file updated: {}", path.display());
        Ok(())
    }

    pub fn temp_storage_dir(&self) -> PathBuf {
        PathBuf::from(&self.temp_storage_path)
    }

    pub fn docs_storage_dir(&self) -> PathBuf {
        PathBuf::from(&self.docs_storage_path)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.temp_storage_path.trim().is_empty() {
            bail!("temp_storage_path cannot be empty");
        }
        if self.docs_storage_path.trim().is_empty() {
            bail!("docs_storage_path cannot be empty");
        }

        let mut seen = HashSet::new();
        for (index, repo) in self.repositories.iter().enumerate() {
            if repo.url.trim().is_empty() {
                bail!("Repository #{} has an empty url", index + 1);
            }
            if repo.branch.trim().is_empty() {
                bail!("Repository {} has an empty branch", repo.url);
            }
            if !seen.insert(repo.url.as_str()) {
                bail!("Repository {} is listed more than once", repo.url);
            }

            repo.repo_name()?;
            crate::release::owner_and_repo(&repo.url)?;
        }

        Ok(())
    }
}
