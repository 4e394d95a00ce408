//! Working copy management using git2
//!
//! A working copy is cloned on first use and fast-forwarded from `origin` on
//! every later run.

use anyhow::{Context, Result, bail};
use git2::{Repository, build::CheckoutBuilder, build::RepoBuilder};
use std::fmt;
use std::path::Path;

/// What [`sync_repository`] did to the working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Fresh clone of the configured branch
    Cloned,
    /// Existing working copy fast-forwarded to a new commit
    Pulled { branch: String },
    /// Existing working copy already at the remote head
    UpToDate { branch: String },
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Cloned => write!(f, "cloned"),
            SyncAction::Pulled { branch } => write!(f, "pulled {branch}"),
            SyncAction::UpToDate { branch } => write!(f, "{branch} up to date"),
        }
    }
}

/// Clone `url` at `branch` into `dest`, or pull if `dest` already exists
pub fn sync_repository(url: &str, branch: &str, dest: &Path) -> Result<SyncAction> {
    let result = if dest.exists() {
        tracing::info!("Pulling latest changes for {}", url);
        pull(dest, branch)
    } else {
        tracing::info!("Cloning repository {}", url);
        clone(url, branch, dest).map(|_| SyncAction::Cloned)
    };

    result.inspect_err(|e| {
        tracing::error!("Failed to clone or pull repository {}: {:#}", url, e);
    })
}

fn clone(url: &str, branch: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    RepoBuilder::new()
        .branch(branch)
        .clone(url, dest)
        .with_context(|| format!("Failed to clone {} ({}) into {}", url, branch, dest.display()))?;

    Ok(())
}

/// Fetch the checked-out branch from `origin` and fast-forward to it.
///
/// The configured branch is only compared, never switched to: a working copy
/// sitting on another branch keeps pulling that branch.
fn pull(path: &Path, configured_branch: &str) -> Result<SyncAction> {
    let repo = Repository::open(path)
        .with_context(|| format!("Failed to open working copy: {}", path.display()))?;

    let head = repo.head().context("Failed to get HEAD reference")?;
    let branch = head
        .shorthand()
        .context("Failed to get branch name")?
        .to_string();
    drop(head);

    if branch != configured_branch {
        tracing::warn!(
            "Working copy {} is on branch '{}' but '{}' is configured; pulling '{}'",
            path.display(),
            branch,
            configured_branch,
            branch
        );
    }

    let mut remote = repo
        .find_remote("origin")
        .context("Working copy has no 'origin' remote")?;
    remote
        .fetch(&[branch.as_str()], None, None)
        .with_context(|| format!("Failed to fetch '{branch}' from origin"))?;

    let fetch_head = repo
        .find_reference("FETCH_HEAD")
        .context("Fetch did not produce FETCH_HEAD")?;
    let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
    let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

    if analysis.is_up_to_date() {
        tracing::debug!("{} already up to date", path.display());
        return Ok(SyncAction::UpToDate { branch });
    }

    if !analysis.is_fast_forward() {
        bail!(
            "Cannot fast-forward '{}' in {}: local history has diverged from origin",
            branch,
            path.display()
        );
    }

    let refname = format!("refs/heads/{branch}");
    let mut reference = repo.find_reference(&refname)?;
    reference.set_target(fetch_commit.id(), "docs-updater: fast-forward")?;
    repo.set_head(&refname)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))
        .with_context(|| format!("Failed to check out {} in {}", branch, path.display()))?;

    Ok(SyncAction::Pulled { branch })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use git2::{IndexAddOption, Repository, RepositoryInitOptions, Signature};
    use std::path::Path;

    /// Create a repository on `main` with the given files committed
    pub fn init_origin(path: &Path, files: &[(&str, &str)]) -> Repository {
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(path, &opts).unwrap();
        commit_files(&repo, files, "initial commit");
        repo
    }

    /// Write files into the work tree and commit them on the current branch
    pub fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str) {
        let workdir = repo.workdir().unwrap().to_path_buf();
        for (name, content) in files {
            let file = workdir.join(name);
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(file, content).unwrap();
        }

        let mut index = repo.index().unwrap();
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("Docs Updater", "docs@example.com").unwrap();

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }
}
