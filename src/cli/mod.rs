//! Command-line interface for docs-updater
//!
//! This module provides the main CLI structure and command dispatch. It uses
//! clap for argument parsing; running without a subcommand performs `update`.

use anyhow::Result;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

use crate::config::Settings;

/// docs-updater - archive versioned documentation from tracked git repositories
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Tracked-repositories file
    #[arg(short, long, value_name = "FILE", global = true, env = "DOCS_UPDATER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for the per-run log file
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Enable verbose output (also mirrors the log to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Check releases, sync working copies and archive their docs (default)
    Update,
    /// Report which tracked repositories have a newer release, changing nothing
    Check,
    /// Validate the tracked-repositories file
    Validate,
    /// Show version information
    Version,
}

impl Cli {
    /// Merge command-line overrides into the layered settings
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load()?;
        if let Some(config) = &self.config {
            settings.config_file = config.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            settings.log_dir = log_dir.clone();
        }
        Ok(settings)
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let output = Output::new(self.verbose, self.quiet);
        let command = self.command.unwrap_or(Commands::Update);

        match command {
            Commands::Update => commands::update::execute(&self.settings()?, &output).await,
            Commands::Check => commands::check::execute(&self.settings()?, &output).await,
            Commands::Validate => commands::validate::execute(&self.settings()?, &output).await,
            Commands::Version => commands::version::execute(&output).await,
        }
    }
}
