//! Validate the tracked-repositories file

use crate::cli::Output;
use crate::config::{RepoConfig, Settings};
use anyhow::Result;

/// Execute the validate command
pub async fn execute(settings: &Settings, output: &Output) -> Result<()> {
    output.header("✅ Validating Configuration");

    let config = RepoConfig::load_from_file(&settings.config_file)?;
    config.validate()?;

    output.success("Configuration is valid");
    output.blank_line();
    output.step("Configuration Summary");
    output.table_row("Config file", &settings.config_file.display().to_string());
    output.table_row("Working copies", &config.temp_storage_path);
    output.table_row("Docs archive", &config.docs_storage_path);
    output.table_row("Repositories", &config.repositories.len().to_string());

    for repo in &config.repositories {
        let folder = repo.docs_folder().unwrap_or(".");
        output.list_item(&format!(
            "{} [{}] v{} ({})",
            repo.url, repo.branch, repo.version, folder
        ));
    }

    Ok(())
}
