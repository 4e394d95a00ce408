//! Copying documentation out of a working copy into the archive

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Totals for one [`copy_docs`] call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub directories: usize,
}

/// Merge `src[/docs_folder]` into `dest`, overwriting files that already exist there
pub fn copy_docs(src: &Path, dest: &Path, docs_folder: Option<&str>) -> Result<CopyStats> {
    let source = match docs_folder {
        Some(folder) => src.join(folder),
        None => src.to_path_buf(),
    };

    copy_tree(&source, dest)
        .inspect(|_| {
            tracing::info!("Docs copied from {} to {}", source.display(), dest.display());
        })
        .inspect_err(|e| {
            tracing::error!(
                "Failed to copy docs from {} to {}: {:#}",
                source.display(),
                dest.display(),
                e
            );
        })
}

fn copy_tree(source: &Path, dest: &Path) -> Result<CopyStats> {
    if !source.is_dir() {
        bail!("Docs source is not a directory: {}", source.display());
    }

    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

    let mut stats = CopyStats::default();

    for entry in WalkDir::new(source).min_depth(1).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .context("Walked outside of the docs source")?;
        let target: PathBuf = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
            stats.directories += 1;
        } else {
            copy_file(entry.path(), &target)?;
            stats.files += 1;
        }
    }

    Ok(stats)
}

/// Copy contents and permissions, then carry over the modification time
fn copy_file(from: &Path, to: &Path) -> Result<()> {
    // A read-only file left by an earlier run cannot be opened for writing
    if fs::symlink_metadata(to).is_ok_and(|meta| meta.permissions().readonly()) {
        fs::remove_file(to)
            .with_context(|| format!("Failed to replace read-only file: {}", to.display()))?;
    }

    fs::copy(from, to)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;

    let modified = fs::metadata(from)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("Failed to read metadata: {}", from.display()))?;
    // The copy may be read-only; setting times only needs ownership
    fs::File::open(to)
        .and_then(|file| file.set_modified(modified))
        .with_context(|| format!("Failed to set modification time: {}", to.display()))?;

    Ok(())
}
