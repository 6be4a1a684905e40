//! Lexer, parser and AST for the tigc compiler
//!
//! The source language is a small expression-oriented language: a program is a
//! single expression, and declarations only appear inside `let ... in ... end`
//! blocks. Use [`parser::parse_program`] to turn source text into an
//! [`ast::expr::Expr`].

#![warn(
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    clippy::missing_docs_in_private_items,
    missing_docs
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

pub mod ast;
pub mod lexer;
pub mod parser;
