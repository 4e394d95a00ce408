//! Run the documentation update pipeline
//!
//! Loads the tracked-repositories file, processes every entry and prints a
//! summary. Everything is also written to this run's log file.

use crate::cli::Output;
use crate::config::{RepoConfig, Settings};
use crate::logging;
use crate::release::GithubReleases;
use crate::updater::{self, UpdateReport};
use anyhow::Result;

/// Execute the update command
pub async fn execute(settings: &Settings, output: &Output) -> Result<()> {
    let log_path = logging::init(&settings.log_dir, output.is_verbose())?;
    output.verbose(&format!("Logging to {}", log_path.display()));

    tracing::info!("Update run started");
    output.header("📚 Updating Documentation");

    match run(settings, output).await {
        Ok(report) => {
            tracing::info!("Update run completed successfully");
            print_summary(&report, output);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Update run failed: {:#}", e);
            output.critical("Update aborted; no versions were saved");
            output.indent(&format!("See {} for details", log_path.display()));
            Err(e)
        }
    }
}

async fn run(settings: &Settings, output: &Output) -> Result<UpdateReport> {
    let config_path = &settings.config_file;
    let mut config = RepoConfig::load_from_file(config_path)
        .and_then(|config| config.validate().map(|_| config))
        .inspect_err(|e| tracing::error!("Failed to load config file: {:#}", e))?;

    output.verbose(&format!(
        "Loaded {} repositories from {}",
        config.repositories.len(),
        config_path.display()
    ));

    let releases = GithubReleases::new(&settings.api_base_url, settings.github_token.clone())?;
    updater::update_docs(&mut config, config_path, &releases).await
}

fn print_summary(report: &UpdateReport, output: &Output) {
    for entry in &report.entries {
        let version = match &entry.previous_version {
            Some(previous) => format!("{previous} → {}", entry.version),
            None => entry.version.clone(),
        };
        output.action_result(
            &entry.repo_name,
            &format!("{version} ({}, {} files)", entry.sync, entry.copied.files),
            true,
        );
        output.verbose(&format!("  {}", entry.docs_dir.display()));
    }

    output.blank_line();
    output.summary_stats("Repositories processed:", report.entries.len());
    output.summary_stats("New versions:", report.updated_versions());
    output.summary_stats("Files copied:", report.files_copied());

    if report.config_saved {
        output.success("Config file updated with new versions");
    } else {
        output.success("All documentation is up to date");
    }
}
