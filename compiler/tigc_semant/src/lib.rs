//! Semantic analysis for the tigc compiler
//!
//! This crate checks a parsed program: it resolves every name against its
//! lexical scope, computes the type of every expression, and reports what does
//! not fit through an [`ErrorReporter`](tigc_diagnostics::ErrorReporter)
//! instead of stopping at the first problem.
//!
//! Types are nominal. Every record or array type declaration creates a new,
//! distinct type, and type names are introduced lazily so that types and
//! functions declared next to each other may be mutually recursive.
//!
//! The usual entry point is [`check_program`].

#![warn(
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    clippy::missing_docs_in_private_items,
    missing_docs
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

pub mod env;
pub mod semant;
pub mod types;

pub use semant::{check_program, Annotations, CheckedProgram, ExpTy, Semant, Translation};
