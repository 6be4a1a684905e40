//! Version information collected at build time

use std::fmt::Write;

#[doc(hidden)]
#[allow(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::restriction
)]
pub mod build {
    include!(concat!(env!("OUT_DIR"), "/shadow.rs"));
}

/// The text printed by `tigc --version`
///
/// The first line names the compiler and the commit it was built from. A build
/// from a dirty tree lists the modified files at the end.
pub fn version() -> String {
    let mut text = format!(
        "{} {} ({}{}, {} build for {})\n{} ({})\n{}",
        build::PROJECT_NAME,
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        if build::GIT_CLEAN { "" } else { ", dirty" },
        build::BUILD_RUST_CHANNEL,
        build::BUILD_TARGET,
        build::RUST_VERSION,
        build::BUILD_TIME_3339,
        build::CARGO_VERSION,
    );

    if !build::GIT_CLEAN {
        text.push_str("\nmodified files:");
        for line in build::GIT_STATUS_FILE.lines() {
            let file = line
                .strip_suffix(" (dirty)")
                .or_else(|| line.strip_suffix(" (staged)"))
                .unwrap_or(line);
            write!(text, "\n    {file}").expect("writing to a string should succeed");
        }
    }

    text
}
