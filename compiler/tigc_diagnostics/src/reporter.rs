//! Sinks that compiler phases report [`Diagnostic`]s into.

use std::cell::RefCell;

use crate::Diagnostic;

/// Something that accepts diagnostics as they are found
///
/// Phases hold a shared reference to a reporter and keep working after
/// reporting, so reporting takes `&self`.
pub trait ErrorReporter {
    /// Record a diagnostic
    fn report(&self, diagnostic: Diagnostic);

    /// Whether any diagnostic has been recorded so far
    fn has_errors(&self) -> bool;
}

/// A collector for diagnostics that allows error recovery.
///
/// This structure uses interior mutability to allow collecting diagnostics
/// while maintaining immutable references to it from the checker.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    /// The collected diagnostics, in report order
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    /// Create a new empty diagnostic collector
    #[must_use]
    pub const fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Add a diagnostic to the collection
    pub fn push(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Get all collected diagnostics, consuming the collector
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }

    /// Get the number of diagnostics collected
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Check if the collector is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }
}

impl ErrorReporter for DiagnosticCollector {
    fn report(&self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }

    fn has_errors(&self) -> bool {
        !self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tigc_utils::span::Span;

    use super::*;
    use crate::DiagnosticKind;

    #[test]
    fn collector_starts_empty() {
        let collector = DiagnosticCollector::new();
        assert!(collector.is_empty());
        assert_eq!(collector.len(), 0);
        assert!(!collector.has_errors());
    }

    #[test]
    fn collector_keeps_report_order() {
        let collector = DiagnosticCollector::new();
        let reporter: &dyn ErrorReporter = &collector;

        reporter.report(DiagnosticKind::TooManyArguments.error_in(Span::from_positions(10, 15)));
        reporter.report(DiagnosticKind::BreakOutsideLoop.error_in(Span::from_positions(0, 5)));

        assert!(reporter.has_errors());
        assert_eq!(collector.len(), 2);

        let kinds = collector
            .into_diagnostics()
            .into_iter()
            .map(|diagnostic| diagnostic.kind().clone())
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::TooManyArguments,
                DiagnosticKind::BreakOutsideLoop
            ]
        );
    }
}
