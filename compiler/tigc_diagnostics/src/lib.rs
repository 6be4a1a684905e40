//! Diagnostics for the tigc compiler
//!
//! Every error the compiler can report, from an unknown character in the lexer
//! to an illegal type cycle in the checker, is a [`Diagnostic`]: a
//! [`Severity`] plus a [`DiagnosticKind`] attached to the [`Span`] of source
//! it concerns. Each kind belongs to exactly one [`DiagnosticCategory`].
//!
//! Phases do not return diagnostics directly. They report them through an
//! [`ErrorReporter`], usually a [`DiagnosticCollector`], and keep going.
//!
//! [`Span`]: tigc_utils::span::Span

#![warn(
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    clippy::missing_docs_in_private_items,
    missing_docs
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

mod diagnostic;
mod diagnostic_kind;
mod ext;
mod fmt;
mod reporter;

pub use diagnostic::{Diagnostic, Severity};
pub use diagnostic_kind::{DiagnosticCategory, DiagnosticKind};
pub use ext::{SpanExt, SpannedExt};
pub use reporter::{DiagnosticCollector, ErrorReporter};
