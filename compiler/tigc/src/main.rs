//! The tigc command line driver
//!
//! Reads a Tiger source file, parses and checks it, and reports every problem
//! found. The exit status is non-zero if there were any.
//!
//! Set `TIGC_LOG` (for example `TIGC_LOG=tigc_semant=trace`) to see what the
//! checker is doing.

#![warn(
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    clippy::missing_docs_in_private_items,
    missing_docs,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::wildcard_enum_match_arm,
    missing_debug_implementations,
    unused_qualifications
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

mod build_info;
mod cli;
mod compile;
mod ice;
mod io;

use std::io::Write as _;

use anyhow::bail;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Send `tracing` output to stderr, filtered by `TIGC_LOG`. Nothing is logged
/// when it is unset.
fn init_logging() {
    if let Ok(filter) = EnvFilter::try_from_env("TIGC_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }
}

fn main() -> anyhow::Result<()> {
    ice::setup_panic_hook();
    init_logging();

    let cli = Cli::parse();

    if cli.version {
        println!("{}", build_info::version());
        return Ok(());
    }

    let Some(path) = cli.path else {
        bail!("no input file provided");
    };
    let (name, content) = io::read_input(&path)?;
    tracing::debug!(input = %name, emit = %cli.emit, "compiling");

    match compile::compile(cli.emit, &content) {
        Ok(output) => {
            if !output.is_empty() {
                let mut out = io::open_output(&cli.out_file)?;
                writeln!(out, "{output}")?;
            }
            Ok(())
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                eprintln!("{}\n", diagnostic.print(&content));
            }
            bail!(
                "could not check `{name}` due to {} previous error{}",
                diagnostics.len(),
                if diagnostics.len() == 1 { "" } else { "s" }
            );
        }
    }
}
