//! Report available releases without syncing anything

use crate::cli::Output;
use crate::config::{RepoConfig, Settings};
use crate::logging;
use crate::release::GithubReleases;
use crate::updater;
use anyhow::Result;

/// Execute the check command
pub async fn execute(settings: &Settings, output: &Output) -> Result<()> {
    logging::init(&settings.log_dir, output.is_verbose())?;
    output.header("🔎 Checking Releases");

    let config = RepoConfig::load_from_file(&settings.config_file)?;
    let releases = GithubReleases::new(&settings.api_base_url, settings.github_token.clone())?;
    let statuses = updater::check_releases(&config, &releases).await;

    let mut available = 0;
    for status in &statuses {
        match &status.latest_version {
            Some(latest) if status.has_update() => {
                available += 1;
                output.status_indicator(
                    "UPDATE",
                    &format!("{} {} → {}", status.url, status.stored_version, latest),
                    true,
                );
            }
            Some(_) => {
                output.status_indicator(
                    "CURRENT",
                    &format!("{} {}", status.url, status.stored_version),
                    true,
                );
            }
            None => {
                output.status_indicator(
                    "UNKNOWN",
                    &format!("{} (release lookup failed)", status.url),
                    false,
                );
            }
        }
    }

    output.blank_line();
    output.summary_stats("Updates available:", available);
    Ok(())
}
