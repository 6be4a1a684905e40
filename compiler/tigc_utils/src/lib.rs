//! Shared utilities for the tigc compiler
//!
//! This crate holds the small pieces every other compiler crate needs: source
//! [spans](span), a [line/column lookup](line_finder) and some helpers for
//! formatting code in outputs.

#![warn(
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    clippy::missing_docs_in_private_items,
    missing_docs
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

pub mod code_fmt;
pub mod line_finder;
pub mod span;
