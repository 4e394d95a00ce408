//! Command implementations for the docs-updater CLI
//!
//! Each command is organized into its own module.

pub mod check;
pub mod update;
pub mod validate;
pub mod version;
