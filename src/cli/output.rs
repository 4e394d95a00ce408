//! Console output for docs-updater
//!
//! Styled, consistent messages for the terminal. Diagnostics go to the log
//! file through `tracing`; this is only what the user sees.

use console::{StyledObject, style};
use std::fmt::Display;

/// Terminal printer honouring `--quiet` and `--verbose`
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Whether `-v` was given
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Print one stdout line unless running quiet
    fn line(&self, text: impl Display) {
        if !self.quiet {
            println!("{text}");
        }
    }

    fn mark(ok: bool) -> StyledObject<&'static str> {
        if ok {
            style("✓").green().bold()
        } else {
            style("✗").red().bold()
        }
    }

    pub fn success(&self, message: &str) {
        self.line(format_args!("{} {message}", style("✔").green()));
    }

    /// Dimmed detail, shown only with `-v`
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn header(&self, title: &str) {
        self.line(format_args!("\n{}", style(title).bold().underlined()));
    }

    pub fn step(&self, step: &str) {
        self.line(format_args!("{} {step}", style("❯").cyan()));
    }

    /// Aligned `key value` row of a summary table
    pub fn table_row(&self, key: &str, value: &str) {
        self.line(format_args!("  {:<20} {value}", style(key).dim()));
    }

    pub fn list_item(&self, item: &str) {
        self.line(format_args!("  • {item}"));
    }

    /// Indented follow-up to an error, always on stderr
    pub fn indent(&self, message: &str) {
        eprintln!("    {message}");
    }

    pub fn blank_line(&self) {
        self.line("");
    }

    /// Error banner on stderr; not silenced by `--quiet`
    pub fn critical(&self, message: &str) {
        eprintln!("{} {}", style("✖").red().bold(), style(message).red().bold());
    }

    pub fn summary_stats(&self, label: &str, value: usize) {
        self.line(format_args!("  {} {}", style(label).dim(), style(value).bold()));
    }

    pub fn key_value(&self, key: &str, value: &str) {
        self.line(format_args!("  {} {value}", style(key).dim()));
    }

    /// `✓ STATUS message` in green, or `✗ STATUS message` in red
    pub fn status_indicator(&self, status: &str, message: &str, ok: bool) {
        let status = if ok {
            style(status).green().bold()
        } else {
            style(status).red().bold()
        };
        self.line(format_args!("{} {status} {message}", Self::mark(ok)));
    }

    pub fn category(&self, category: &str) {
        self.line(format_args!("\n{}", style(category).bold().cyan()));
    }

    /// Outcome of one unit of work, e.g. a repository sync
    pub fn action_result(&self, action: &str, result: &str, ok: bool) {
        self.line(format_args!(
            "{} {} {}",
            Self::mark(ok),
            style(action).bold(),
            style(result).dim()
        ));
    }
}
