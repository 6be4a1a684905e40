//! Lexer and lexical errors
//!
//! Tokens are produced by a [`logos`]-generated automaton. String literals and
//! comments are handled by callbacks because they need escapes and nesting,
//! which a regular expression cannot express.
//!
//! The main interface is [`TigerLexer`], an iterator over
//! [`Spanned<Result<Tok, LexicalError>>`].

use derive_more::Display;
use logos::{FilterResult, Lexer, Logos};
use tigc_diagnostics::DiagnosticKind;
use tigc_utils::span::{Span, Spannable, Spanned};

/// The error enum for internal lexing errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InternalLexicalError {
    /// A generic lexing error. This is later converted to
    /// [`LexicalError::UnknownToken`].
    #[default]
    NoMatchingRule,
    /// A string literal was left unterminated.
    UnterminatedStringLiteral,
    /// A comment ran to the end of the file. Comments nest.
    UnterminatedComment,
    /// An invalid escape sequence was found in a string literal
    UnknownEscapeSequence,
    /// An integer literal is too large to lex
    IntegerLiteralOutOfRange,
}

/// An error encountered during lexing. You will usually find this wrapped in a
/// [`Spanned<LexicalError>`].
///
/// Does not implement [`std::error::Error`] because it should be converted to a
/// [`tigc_diagnostics::Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalError<'input> {
    /// An unknown token was encountered.
    UnknownToken(&'input str),
    /// A string literal was left unterminated.
    UnterminatedStringLiteral,
    /// A comment ran to the end of the file.
    UnterminatedComment,
    /// A string literal contains an escape we do not understand
    UnknownEscapeSequence,
    /// An integer literal is too large to lex
    IntegerLiteralOutOfRange(&'input str),
}
impl LexicalError<'_> {
    /// Convert this error into the [`DiagnosticKind`] reported for it
    #[must_use]
    pub fn into_diagnostic_kind(self) -> DiagnosticKind {
        match self {
            Self::UnknownToken(token) => DiagnosticKind::UnknownToken(token.to_string()),
            Self::UnterminatedStringLiteral => DiagnosticKind::UnterminatedStringLiteral,
            Self::UnterminatedComment => DiagnosticKind::UnterminatedComment,
            Self::UnknownEscapeSequence => DiagnosticKind::UnknownEscapeSequence,
            Self::IntegerLiteralOutOfRange(literal) => {
                DiagnosticKind::IntegerLiteralOutOfRange(literal.to_string())
            }
        }
    }
}

/// Lex the body of a string literal after its opening quote, processing
/// escapes.
///
/// The whole literal is always consumed, even if it contains a bad escape, so
/// lexing resumes after the closing quote.
fn lex_string<'input>(
    lex: &mut Lexer<'input, Tok<'input>>,
) -> Result<String, InternalLexicalError> {
    let remainder: &'input str = lex.remainder();
    let mut value = String::new();
    let mut error = None;
    let mut chars = remainder.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(index + 1);
                return error.map_or(Ok(value), Err);
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, first)) if first.is_ascii_digit() => {
                    let mut code = first.to_digit(10).unwrap_or(0);
                    let mut digits = 1;
                    while digits < 3 {
                        match chars.peek() {
                            Some(&(_, d)) if d.is_ascii_digit() => {
                                code = code * 10 + d.to_digit(10).unwrap_or(0);
                                digits += 1;
                                chars.next();
                            }
                            _ => break,
                        }
                    }

                    match u8::try_from(code) {
                        Ok(byte) if digits == 3 => value.push(char::from(byte)),
                        _ => {
                            error.get_or_insert(InternalLexicalError::UnknownEscapeSequence);
                        }
                    }
                }
                Some(_) => {
                    error.get_or_insert(InternalLexicalError::UnknownEscapeSequence);
                }
                None => break,
            },
            other => value.push(other),
        }
    }

    lex.bump(remainder.len());
    Err(InternalLexicalError::UnterminatedStringLiteral)
}

/// Skip a (possibly nested) comment after its opening `/*`
fn skip_comment<'input>(lex: &mut Lexer<'input, Tok<'input>>) -> FilterResult<(), InternalLexicalError> {
    let remainder: &'input str = lex.remainder();
    let bytes = remainder.as_bytes();
    let mut depth = 1_usize;
    let mut index = 0;

    while index < bytes.len() {
        match (bytes[index], bytes.get(index + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                index += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                index += 2;
                if depth == 0 {
                    lex.bump(index);
                    return FilterResult::Skip;
                }
            }
            _ => index += 1,
        }
    }

    lex.bump(remainder.len());
    FilterResult::Error(InternalLexicalError::UnterminatedComment)
}

/// Enum representing all of the result tokens in the lexer
#[derive(Logos, Debug, Clone, PartialEq, Eq, Display)]
#[logos(error = InternalLexicalError)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Tok<'input> {
    // === OPERATORS ===
    /// The token `+`
    #[token("+")]
    #[display("+")]
    Plus,
    /// The token `-`
    #[token("-")]
    #[display("-")]
    Minus,
    /// The token `*`
    #[token("*")]
    #[display("*")]
    Star,
    /// The token `/`
    #[token("/")]
    #[display("/")]
    Slash,
    /// The token `=`
    #[token("=")]
    #[display("=")]
    Eq,
    /// The token `<>`
    #[token("<>")]
    #[display("<>")]
    NotEq,
    /// The token `<`
    #[token("<")]
    #[display("<")]
    Less,
    /// The token `<=`
    #[token("<=")]
    #[display("<=")]
    LessEq,
    /// The token `>`
    #[token(">")]
    #[display(">")]
    Greater,
    /// The token `>=`
    #[token(">=")]
    #[display(">=")]
    GreaterEq,
    /// The token `&`
    #[token("&")]
    #[display("&")]
    And,
    /// The token `|`
    #[token("|")]
    #[display("|")]
    Or,
    /// The token `:=`
    #[token(":=")]
    #[display(":=")]
    Assign,

    // === PUNCTUATION ===
    /// The token `,`
    #[token(",")]
    #[display(",")]
    Comma,
    /// The token `:`
    #[token(":")]
    #[display(":")]
    Colon,
    /// The token `;`
    #[token(";")]
    #[display(";")]
    Semicolon,
    /// The token `.`
    #[token(".")]
    #[display(".")]
    Dot,
    /// The token `(`
    #[token("(")]
    #[display("(")]
    LeftParen,
    /// The token `)`
    #[token(")")]
    #[display(")")]
    RightParen,
    /// The token `[`
    #[token("[")]
    #[display("[")]
    LeftBracket,
    /// The token `]`
    #[token("]")]
    #[display("]")]
    RightBracket,
    /// The token `{`
    #[token("{")]
    #[display("{{")]
    LeftBrace,
    /// The token `}`
    #[token("}")]
    #[display("}}")]
    RightBrace,

    // === KEYWORDS ===
    /// The keyword `array`
    #[token("array")]
    #[display("array")]
    Array,
    /// The keyword `break`
    #[token("break")]
    #[display("break")]
    Break,
    /// The keyword `do`
    #[token("do")]
    #[display("do")]
    Do,
    /// The keyword `else`
    #[token("else")]
    #[display("else")]
    Else,
    /// The keyword `end`
    #[token("end")]
    #[display("end")]
    End,
    /// The keyword `for`
    #[token("for")]
    #[display("for")]
    For,
    /// The keyword `function`
    #[token("function")]
    #[display("function")]
    Function,
    /// The keyword `if`
    #[token("if")]
    #[display("if")]
    If,
    /// The keyword `in`
    #[token("in")]
    #[display("in")]
    In,
    /// The keyword `let`
    #[token("let")]
    #[display("let")]
    Let,
    /// The keyword `nil`
    #[token("nil")]
    #[display("nil")]
    Nil,
    /// The keyword `of`
    #[token("of")]
    #[display("of")]
    Of,
    /// The keyword `then`
    #[token("then")]
    #[display("then")]
    Then,
    /// The keyword `to`
    #[token("to")]
    #[display("to")]
    To,
    /// The keyword `type`
    #[token("type")]
    #[display("type")]
    Type,
    /// The keyword `var`
    #[token("var")]
    #[display("var")]
    Var,
    /// The keyword `while`
    #[token("while")]
    #[display("while")]
    While,

    // === SPECIAL ===
    /// The opening of a comment. Never yielded: the callback skips the
    /// comment or fails.
    #[token("/*", skip_comment)]
    #[display("/*")]
    CommentStart,
    /// Any string literal, with escapes already processed
    #[token("\"", lex_string)]
    #[display("{_0:?}")]
    StringLiteral(String),
    /// Any integer literal. Its magnitude is only checked against `int` by
    /// the parser, which knows whether it is negated.
    #[regex("[0-9]+", |lex| lex.slice().parse::<u32>().map_err(|_| InternalLexicalError::IntegerLiteralOutOfRange))]
    #[display("{_0}")]
    IntLiteral(u32),
    /// Any identifier
    #[regex("[a-zA-Z][a-zA-Z0-9_]*", |lex| lex.slice())]
    #[display("{_0}")]
    Identifier(&'input str),
}

/// A lexer over some source text
///
/// Wraps the [`logos`] lexer to attach [`Span`]s and map internal errors to
/// [`LexicalError`]s.
pub struct TigerLexer<'input> {
    /// The generated lexer
    lex: Lexer<'input, Tok<'input>>,
}

impl<'input> TigerLexer<'input> {
    /// Create a new [`TigerLexer`] given an input string
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            lex: Tok::lexer(input),
        }
    }
}

impl<'input> Iterator for TigerLexer<'input> {
    type Item = Spanned<Result<Tok<'input>, LexicalError<'input>>>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lex.next()?;
        let range = self.lex.span();
        let span = Span::from_positions(range.start, range.end);
        let slice = self.lex.slice();

        Some(
            token
                .map_err(|error| match error {
                    InternalLexicalError::NoMatchingRule => LexicalError::UnknownToken(slice),
                    InternalLexicalError::UnterminatedStringLiteral => {
                        LexicalError::UnterminatedStringLiteral
                    }
                    InternalLexicalError::UnterminatedComment => LexicalError::UnterminatedComment,
                    InternalLexicalError::UnknownEscapeSequence => {
                        LexicalError::UnknownEscapeSequence
                    }
                    InternalLexicalError::IntegerLiteralOutOfRange => {
                        LexicalError::IntegerLiteralOutOfRange(slice)
                    }
                })
                .in_span(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lex some input, stripping spans
    fn tokens(input: &str) -> Vec<Result<Tok<'_>, LexicalError<'_>>> {
        TigerLexer::new(input).map(Spanned::into_value).collect()
    }

    #[test]
    fn whitespace_should_be_skipped() {
        assert_eq!(
            tokens(" \t\nnil  \r\n"),
            vec![Ok(Tok::Nil)]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            tokens("let var letter in end_ arrays"),
            vec![
                Ok(Tok::Let),
                Ok(Tok::Var),
                Ok(Tok::Identifier("letter")),
                Ok(Tok::In),
                Ok(Tok::Identifier("end_")),
                Ok(Tok::Identifier("arrays")),
            ]
        );
    }

    #[test]
    fn operators_take_the_longest_match() {
        assert_eq!(
            tokens("a := b <> c <= d >= e < f > g"),
            vec![
                Ok(Tok::Identifier("a")),
                Ok(Tok::Assign),
                Ok(Tok::Identifier("b")),
                Ok(Tok::NotEq),
                Ok(Tok::Identifier("c")),
                Ok(Tok::LessEq),
                Ok(Tok::Identifier("d")),
                Ok(Tok::GreaterEq),
                Ok(Tok::Identifier("e")),
                Ok(Tok::Less),
                Ok(Tok::Identifier("f")),
                Ok(Tok::Greater),
                Ok(Tok::Identifier("g")),
            ]
        );
    }

    #[test]
    fn spans_are_byte_offsets() {
        let spans = TigerLexer::new("x := 10")
            .map(|token| token.span())
            .collect::<Vec<_>>();
        assert_eq!(
            spans,
            vec![
                Span::from_positions(0, 1),
                Span::from_positions(2, 4),
                Span::from_positions(5, 7)
            ]
        );
    }

    #[test]
    fn integer_literals() {
        assert_eq!(tokens("0 42"), vec![Ok(Tok::IntLiteral(0)), Ok(Tok::IntLiteral(42))]);
        assert_eq!(tokens("2147483648"), vec![Ok(Tok::IntLiteral(2_147_483_648))]);
        assert_eq!(
            tokens("99999999999"),
            vec![Err(LexicalError::IntegerLiteralOutOfRange("99999999999"))]
        );
    }

    #[test]
    fn string_escapes_are_processed() {
        assert_eq!(
            tokens(r#""a\tb\n\"q\"\\\065""#),
            vec![Ok(Tok::StringLiteral("a\tb\n\"q\"\\A".to_string()))]
        );
    }

    #[test]
    fn bad_escapes_consume_the_whole_literal() {
        assert_eq!(
            tokens(r#""a\qb" nil"#),
            vec![Err(LexicalError::UnknownEscapeSequence), Ok(Tok::Nil)]
        );
        assert_eq!(
            tokens(r#""\999""#),
            vec![Err(LexicalError::UnknownEscapeSequence)]
        );
    }

    #[test]
    fn unterminated_strings_fail() {
        assert_eq!(
            tokens("\"abc"),
            vec![Err(LexicalError::UnterminatedStringLiteral)]
        );
    }

    #[test]
    fn nested_comments_are_skipped() {
        assert_eq!(
            tokens("a /* outer /* inner */ still outer */ b"),
            vec![Ok(Tok::Identifier("a")), Ok(Tok::Identifier("b"))]
        );
    }

    #[test]
    fn unclosed_comments_fail() {
        assert_eq!(
            tokens("a /* /* */"),
            vec![
                Ok(Tok::Identifier("a")),
                Err(LexicalError::UnterminatedComment)
            ]
        );
    }

    #[test]
    fn unknown_tokens_are_reported() {
        assert_eq!(
            tokens("a # b"),
            vec![
                Ok(Tok::Identifier("a")),
                Err(LexicalError::UnknownToken("#")),
                Ok(Tok::Identifier("b")),
            ]
        );
    }

    #[test]
    fn lexical_errors_become_diagnostic_kinds() {
        assert_eq!(
            LexicalError::UnknownToken("#").into_diagnostic_kind(),
            DiagnosticKind::UnknownToken("#".to_string())
        );
    }
}
