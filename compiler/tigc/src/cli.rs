//! Defines the tigc command line interface

use std::path::PathBuf;

use clap::Parser;
use derive_more::Display;

/// Check a Tiger program for semantic errors
#[derive(Debug, Parser)]
#[command(version = None)]
pub struct Cli {
    /// Print version information and exit
    #[arg(short, long)]
    pub version: bool,

    /// The file to check, or `-` to read from stdin
    pub path: Option<PathBuf>,

    /// Where to write the output. Defaults to stdout.
    #[arg(short, long, default_value = "-")]
    pub out_file: PathBuf,

    /// What to emit once the program has been checked
    #[arg(long, default_value_t = OutputFormat::Diagnostics)]
    pub emit: OutputFormat,
}

/// The outputs `tigc` can produce
#[derive(Debug, Clone, Copy, clap::ValueEnum, PartialEq, Eq, Display)]
pub enum OutputFormat {
    /// Only report problems. Nothing is written on success.
    #[display("diagnostics")]
    Diagnostics,
    /// The AST, printed back out as source
    ///
    /// Binary operations are fully parenthesized.
    #[display("ast")]
    Ast,
    /// The AST, in Rust-like format
    #[display("ast-debug")]
    AstDebug,
    /// The AST, in Rust-like format with indentation
    #[display("ast-debug-pretty")]
    AstDebugPretty,
    /// The type of every expression, one per line, in source order
    #[display("types")]
    Types,
}
