//! Per-run log file setup
//!
//! Every run writes `<log_dir>/docs_updater_<YYYYmmdd_HHMMSS>.log` with lines of
//! the form `2025-01-31 09:15:02,118 - INFO - message`.

use anyhow::{Context, Result};
use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{FmtContext, FormatEvent, FormatFields, format::Writer},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// `timestamp - LEVEL - message`, no targets, no spans
pub struct PlainLineFormat;

impl<S, N> FormatEvent<S, N> for PlainLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// File name for a run started now
pub fn log_file_name() -> String {
    format!("docs_updater_{}.log", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Install the global subscriber and return the path of this run's log file.
///
/// `RUST_LOG` overrides the default `info` level. With `mirror_to_stderr` the
/// same events are also written to stderr.
pub fn init(log_dir: &Path, mirror_to_stderr: bool) -> Result<PathBuf> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let log_path = log_dir.join(log_file_name());
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(PlainLineFormat)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file));

    let stderr_layer = mirror_to_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(PlainLineFormat)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name_shape() {
        let name = log_file_name();
        assert!(name.starts_with("docs_updater_"));
        assert!(name.ends_with(".log"));

        let stamp = &name["docs_updater_".len()..name.len() - ".log".len()];
        assert_eq!(stamp.len(), "20250131_091502".len());
        assert_eq!(stamp.as_bytes()[8], b'_');
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }
}
