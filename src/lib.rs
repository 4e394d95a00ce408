//! # docs-updater - versioned documentation archives from git repositories
//!
//! Reads a list of tracked repositories, asks the hosting API for each one's
//! latest release, clones or fast-forwards a local working copy and copies its
//! documentation folder into `<docs_storage_path>/<repo>/<version>/`. Newly
//! seen versions are written back to the config file at the end of the run.
//!
//! ## Quick Start
//!
//! ```bash
//! # Check what would change
//! docs-updater check
//!
//! # Archive docs for every tracked repository
//! docs-updater --config repo_config.json update
//! ```

pub mod cli;
pub mod config;
pub mod docs;
pub mod git;
pub mod logging;
pub mod release;
pub mod updater;

pub use cli::{Cli, Output};
pub use config::{RepoConfig, RepositoryEntry, Settings};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
