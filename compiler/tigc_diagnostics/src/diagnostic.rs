//! Defines the [`Diagnostic`] type and its [`Severity`].

use std::error::Error;

use ansi_term::{Color, Style};
use derive_more::Display;
use tigc_utils::{
    line_finder::LineLookup,
    span::{Span, Spanned},
};

use crate::{fmt::display_source_window, DiagnosticCategory, DiagnosticKind};

/// The severity of a [`Diagnostic`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum Severity {
    /// Error. The program is rejected.
    #[display("error")]
    Error,
}
impl Severity {
    /// The [`Style`] used to paint this severity and its underline
    pub(crate) fn style(self) -> Style {
        match self {
            Self::Error => Color::Red.bold(),
        }
    }
}

/// A diagnostic message produced by tigc
#[derive(Debug, PartialEq, Eq, Clone, Display)]
#[display("{_0}: {_1}")]
pub struct Diagnostic(pub Severity, pub Spanned<DiagnosticKind>);

impl Diagnostic {
    /// The [`DiagnosticKind`] of this diagnostic
    #[must_use]
    pub const fn kind(&self) -> &DiagnosticKind {
        self.1.value()
    }

    /// The [`Span`] this diagnostic points at
    #[must_use]
    pub const fn span(&self) -> Span {
        self.1.span()
    }

    /// The [`DiagnosticCategory`] of this diagnostic's kind
    #[must_use]
    pub const fn category(&self) -> DiagnosticCategory {
        self.kind().category()
    }

    /// Render this diagnostic against its source with colors, for a terminal
    #[must_use]
    pub fn print(&self, source: &str) -> String {
        self.render(source, true)
    }

    /// Render this diagnostic against its source without any ANSI escapes
    #[must_use]
    pub fn print_plain(&self, source: &str) -> String {
        self.render(source, false)
    }

    /// Shared implementation of [`Diagnostic::print`] and
    /// [`Diagnostic::print_plain`]
    fn render(&self, source: &str, colored: bool) -> String {
        let location = LineLookup::new(source).lookup_from_index(self.span().start());
        let message = self.kind().to_string();
        let window = display_source_window(self.0, self.span(), source, colored);

        if colored {
            format!(
                "{}: {}\n{} {location}\n{window}",
                self.0.style().paint(self.0.to_string()),
                Color::White.bold().paint(message),
                Color::Blue.bold().paint("-->"),
            )
        } else {
            format!("{}: {message}\n--> {location}\n{window}", self.0)
        }
    }
}

impl Error for Diagnostic {}
