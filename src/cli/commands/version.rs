//! Version command implementation

use crate::cli::Output;
use anyhow::Result;

/// Execute the version command
pub async fn execute(output: &Output) -> Result<()> {
    let version = crate::VERSION;
    let name = crate::PKG_NAME;
    let description = env!("CARGO_PKG_DESCRIPTION");

    output.header("📚 docs-updater Version Information");

    output.status_indicator("VERSION", &format!("{} v{}", name, version), true);
    output.blank_line();

    output.category("About");
    output.key_value("Description:", description);
    output.blank_line();

    output.category("Build Information");
    output.key_value("libgit2:", &libgit2_version());
    output.key_value("Target:", std::env::consts::ARCH);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
    );

    output.blank_line();
    output.success("💡 Run 'docs-updater --help' for usage information");

    Ok(())
}

fn libgit2_version() -> String {
    let (major, minor, patch) = git2::Version::get().libgit2_version();
    format!("{major}.{minor}.{patch}")
}
