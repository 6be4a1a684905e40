//! Defines all possible tigc compile time diagnostics.

use derive_more::Display;
use thiserror::Error;
use tigc_utils::span::{Span, Spannable};

use crate::{Diagnostic, Severity};

/// The broad class a [`DiagnosticKind`] belongs to
///
/// Every kind maps to exactly one category through [`DiagnosticKind::category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DiagnosticCategory {
    /// The source could not be lexed or parsed
    #[display("syntax error")]
    Syntax,
    /// A name does not resolve, or resolves to the wrong kind of entry
    #[display("undeclared identifier")]
    UndeclaredIdentifier,
    /// A type does not fit where it was used
    #[display("type mismatch")]
    TypeMismatch,
    /// Too many or too few arguments or record fields
    #[display("arity mismatch")]
    ArityMismatch,
    /// A name was declared twice in one declaration group
    #[display("duplicate declaration")]
    DuplicateDeclaration,
    /// A type declaration group that only refers to itself by name
    #[display("illegal cycle")]
    IllegalCycle,
    /// A write to something that cannot be written
    #[display("illegal mutation")]
    IllegalMutation,
    /// Control flow that has nowhere to go
    #[display("illegal control flow")]
    IllegalControl,
}

/// The list of possible errors
#[allow(missing_docs)]
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DiagnosticKind {
    // LEXER ERRORS
    #[error("unknown token `{0}`")]
    UnknownToken(String),
    #[error("unterminated string literal")]
    UnterminatedStringLiteral,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unknown escape sequence")]
    UnknownEscapeSequence,
    #[error("integer literal `{0}` is out of range")]
    IntegerLiteralOutOfRange(String),

    // PARSER ERRORS
    #[error("unexpected end of file, expected one of: {}", .0.join(", "))]
    UnexpectedEof(Vec<String>),
    #[error("unrecognized token `{0}`, expected one of: {}", .1.join(", "))]
    UnrecognizedToken(String, Vec<String>),
    #[error("expression is nested too deeply")]
    NestingTooDeep,

    // NAME RESOLUTION
    #[error("undeclared variable `{0}`")]
    UndeclaredVariable(String),
    #[error("undeclared function `{0}`")]
    UndeclaredFunction(String),
    #[error("undeclared type `{0}`")]
    UndeclaredType(String),
    #[error("type `{0}` has no field `{1}`")]
    UndeclaredField(String, String),
    #[error("`{0}` is a function, not a variable")]
    NotAVariable(String),
    #[error("`{0}` is a variable, not a function")]
    NotAFunction(String),

    // TYPE CHECKER ERRORS
    #[error("integer required, got `{0}`")]
    IntegerRequired(String),
    #[error("comparable type required, got `{0}`")]
    ComparableRequired(String),
    #[error("`int` or `string` required, got `{0}`")]
    OrderableRequired(String),
    #[error("operands have incompatible types `{0}` and `{1}`")]
    OperandsDisagree(String, String),
    #[error("expected `{expected}` for argument `{param}`, got `{got}`")]
    ArgumentTypeMismatch {
        param: String,
        expected: String,
        got: String,
    },
    #[error("expected `{expected}` for field `{field}`, got `{got}`")]
    FieldTypeMismatch {
        field: String,
        expected: String,
        got: String,
    },
    #[error("field name mismatch: expected `{expected}`, got `{got}`")]
    FieldNameMismatch { expected: String, got: String },
    #[error("expected `{expected}` on right hand side of assignment, got `{got}`")]
    AssignmentTypeMismatch { expected: String, got: String },
    #[error("initializer of type `{got}` does not match declared type `{expected}`")]
    InitializerTypeMismatch { expected: String, got: String },
    #[error("result type mismatch: function returns `{expected}`, body has type `{got}`")]
    ResultTypeMismatch { expected: String, got: String },
    #[error("`if` branches have incompatible types `{0}` and `{1}`")]
    BranchTypeMismatch(String, String),
    #[error("`if` without `else` must not produce a value, got `{0}`")]
    IfThenMustBeVoid(String),
    #[error("loop body must not produce a value, got `{0}`")]
    LoopBodyMustBeVoid(String),
    #[error("record required, got `{0}`")]
    RecordRequired(String),
    #[error("array required, got `{0}`")]
    ArrayRequired(String),
    #[error("`{0}` is not a record type")]
    RecordTypeRequired(String),
    #[error("`{0}` is not an array type")]
    ArrayTypeRequired(String),
    #[error("`nil` initializer requires a record type annotation")]
    NilRequiresRecordType,

    // ARITY
    #[error("missing argument for `{0}`")]
    MissingArgument(String),
    #[error("too many arguments")]
    TooManyArguments,
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("too many fields")]
    TooManyFields,

    // DECLARATIONS
    #[error("type `{0}` is declared more than once in this group")]
    DuplicateType(String),
    #[error("function `{0}` is declared more than once in this group")]
    DuplicateFunction(String),
    #[error("parameter `{0}` is declared more than once")]
    DuplicateParameter(String),
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
    #[error("illegal type cycle: `{0}` never reaches a record or array type")]
    IllegalTypeCycle(String),

    // MUTATION AND CONTROL
    #[error("assignment to loop index `{0}`")]
    AssignmentToLoopIndex(String),
    #[error("cannot use `break` outside of loop")]
    BreakOutsideLoop,
}
impl DiagnosticKind {
    /// Create an [error] diagnostic in a given [`Span`]
    ///
    /// [error]: [`Severity::Error`]
    #[must_use]
    #[inline]
    pub fn error_in(self, span: Span) -> Diagnostic {
        Diagnostic(Severity::Error, self.in_span(span))
    }

    /// The [`DiagnosticCategory`] this kind belongs to
    #[must_use]
    pub const fn category(&self) -> DiagnosticCategory {
        match self {
            Self::UnknownToken(_)
            | Self::UnterminatedStringLiteral
            | Self::UnterminatedComment
            | Self::UnknownEscapeSequence
            | Self::IntegerLiteralOutOfRange(_)
            | Self::NestingTooDeep
            | Self::UnexpectedEof(_)
            | Self::UnrecognizedToken(_, _) => DiagnosticCategory::Syntax,

            Self::UndeclaredVariable(_)
            | Self::UndeclaredFunction(_)
            | Self::UndeclaredType(_)
            | Self::UndeclaredField(_, _)
            | Self::NotAVariable(_)
            | Self::NotAFunction(_) => DiagnosticCategory::UndeclaredIdentifier,

            Self::IntegerRequired(_)
            | Self::ComparableRequired(_)
            | Self::OrderableRequired(_)
            | Self::OperandsDisagree(_, _)
            | Self::ArgumentTypeMismatch { .. }
            | Self::FieldTypeMismatch { .. }
            | Self::FieldNameMismatch { .. }
            | Self::AssignmentTypeMismatch { .. }
            | Self::InitializerTypeMismatch { .. }
            | Self::ResultTypeMismatch { .. }
            | Self::BranchTypeMismatch(_, _)
            | Self::IfThenMustBeVoid(_)
            | Self::LoopBodyMustBeVoid(_)
            | Self::RecordRequired(_)
            | Self::ArrayRequired(_)
            | Self::RecordTypeRequired(_)
            | Self::ArrayTypeRequired(_)
            | Self::NilRequiresRecordType => DiagnosticCategory::TypeMismatch,

            Self::MissingArgument(_)
            | Self::TooManyArguments
            | Self::MissingField(_)
            | Self::TooManyFields => DiagnosticCategory::ArityMismatch,

            Self::DuplicateType(_)
            | Self::DuplicateFunction(_)
            | Self::DuplicateParameter(_)
            | Self::DuplicateField(_) => DiagnosticCategory::DuplicateDeclaration,

            Self::IllegalTypeCycle(_) => DiagnosticCategory::IllegalCycle,
            Self::AssignmentToLoopIndex(_) => DiagnosticCategory::IllegalMutation,
            Self::BreakOutsideLoop => DiagnosticCategory::IllegalControl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_render_their_arguments() {
        assert_eq!(
            DiagnosticKind::UnexpectedEof(vec!["`end`".to_string(), "`;`".to_string()]).to_string(),
            "unexpected end of file, expected one of: `end`, `;`"
        );
        assert_eq!(
            DiagnosticKind::ArgumentTypeMismatch {
                param: "n".to_string(),
                expected: "int".to_string(),
                got: "string".to_string()
            }
            .to_string(),
            "expected `int` for argument `n`, got `string`"
        );
        assert_eq!(
            DiagnosticKind::MissingArgument("b".to_string()).to_string(),
            "missing argument for `b`"
        );
    }

    #[test]
    fn every_category_is_reachable() {
        let cases = [
            (
                DiagnosticKind::UnterminatedComment,
                DiagnosticCategory::Syntax,
            ),
            (
                DiagnosticKind::NotAFunction("x".to_string()),
                DiagnosticCategory::UndeclaredIdentifier,
            ),
            (
                DiagnosticKind::RecordRequired("int".to_string()),
                DiagnosticCategory::TypeMismatch,
            ),
            (
                DiagnosticKind::TooManyArguments,
                DiagnosticCategory::ArityMismatch,
            ),
            (
                DiagnosticKind::DuplicateType("a".to_string()),
                DiagnosticCategory::DuplicateDeclaration,
            ),
            (
                DiagnosticKind::IllegalTypeCycle("a".to_string()),
                DiagnosticCategory::IllegalCycle,
            ),
            (
                DiagnosticKind::AssignmentToLoopIndex("i".to_string()),
                DiagnosticCategory::IllegalMutation,
            ),
            (
                DiagnosticKind::BreakOutsideLoop,
                DiagnosticCategory::IllegalControl,
            ),
        ];

        for (kind, category) in cases {
            assert_eq!(kind.category(), category, "{kind}");
        }
    }

    #[test]
    fn category_display() {
        assert_eq!(
            DiagnosticCategory::UndeclaredIdentifier.to_string(),
            "undeclared identifier"
        );
        assert_eq!(DiagnosticCategory::IllegalCycle.to_string(), "illegal cycle");
    }

    #[test]
    fn error_in_attaches_span() {
        let span = Span::from_positions(2, 5);
        let diagnostic = DiagnosticKind::BreakOutsideLoop.error_in(span);
        assert_eq!(diagnostic.0, Severity::Error);
        assert_eq!(diagnostic.1.span(), span);
    }
}
