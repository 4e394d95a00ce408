use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings, layered: defaults -> settings files -> environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the tracked-repositories file
    pub config_file: PathBuf,

    /// Directory that receives one log file per run
    pub log_dir: PathBuf,

    /// Base URL of the release API
    pub api_base_url: String,

    /// Bearer token for the release API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from("repo_config.json"),
            log_dir: PathBuf::from("logs"),
            api_base_url: "https://api.github.com".to_string(),
            github_token: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    /// Standard priority: defaults -> docs-updater.{toml,json} -> env vars
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("docs-updater.toml"))
            .merge(Json::file("docs-updater.json"))
            .merge(Env::prefixed("DOCS_UPDATER_"))
            .merge(Env::raw().only(&["GITHUB_TOKEN"]))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut settings: Settings = figment
            .extract()
            .context("Failed to load docs-updater settings")?;

        // An exported-but-empty token means "no token"
        if settings.github_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            settings.github_token = None;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_figment(Figment::from(Serialized::defaults(
            Settings::default(),
        )))
        .expect("Should load default settings");

        assert_eq!(settings.config_file, PathBuf::from("repo_config.json"));
        assert_eq!(settings.log_dir, PathBuf::from("logs"));
        assert_eq!(settings.api_base_url, "https://api.github.com");
        assert!(settings.github_token.is_none());
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(
            Toml::string(
                r#"
log_dir = "/var/log/docs"
api_base_url = "https://api.example.com"
"#,
            ),
        );

        let settings = Settings::from_figment(figment).unwrap();
        assert_eq!(settings.log_dir, PathBuf::from("/var/log/docs"));
        assert_eq!(settings.api_base_url, "https://api.example.com");
        assert_eq!(settings.config_file, PathBuf::from("repo_config.json"));
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::string(r#"github_token = "  ""#));

        let settings = Settings::from_figment(figment).unwrap();
        assert!(settings.github_token.is_none());
    }
}
