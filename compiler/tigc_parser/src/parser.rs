//! Parsing and parser errors
//!
//! This module contains a hand-written recursive descent parser, along with
//! the public entry points [`parse_program`] and [`parse_expr`].
//!
//! # Precedence
//! From loosest to tightest binding:
//! - `:=`, and the bodies of `if`, `while` and `for`, which extend as far to
//!   the right as possible
//! - `|`
//! - `&`
//! - `=`, `<>`, `<`, `<=`, `>`, `>=` (non-associative)
//! - `+`, `-`
//! - `*`, `/`
//! - unary `-`, which is parsed as `0 - e`, except that `-2147483648` is
//!   read as a single literal
//!
//! Expressions may nest at most [`MAX_NESTING`] levels deep, counting both
//! bracketing constructs and chains of binary operators.
//!
//! # Error handling
//! Parsing stops at the first error, which is returned as a [`Diagnostic`].
//! Lexical errors are reported before any syntax error.
//!
//! # Example
//! ```
//! use tigc_parser::parser::parse_program;
//! let ast = parse_program("let var x := 1 in x + 1 end");
//! assert!(ast.is_ok());
//! ```

use tigc_diagnostics::{Diagnostic, DiagnosticKind};
use tigc_utils::span::{Span, Spannable, Spanned};

use crate::{
    ast::{
        dec::{Declaration, DeclarationKind},
        expr::{Arithmetic, Comparison, Equality, Expr, ExprKind, FieldInit, Logical, Var, VarKind},
        ty::{RecordField, Ty, TyKind, TypeField},
    },
    lexer::{LexicalError, TigerLexer, Tok},
};

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError<'input> {
    /// Unexpected end of file
    UnexpectedEof {
        /// Expected tokens
        expected: Vec<String>,
    },
    /// Unexpected token
    UnexpectedToken {
        /// The token that was found
        found: String,
        /// Expected tokens
        expected: Vec<String>,
    },
    /// Lexical error
    LexicalError(LexicalError<'input>),
    /// An integer literal does not fit in an `int`
    IntegerLiteralOutOfRange(u32),
    /// Expressions or types nest more than [`MAX_NESTING`] levels deep
    NestingTooDeep,
}
impl ParseError<'_> {
    /// Convert this error into the [`DiagnosticKind`] reported for it
    fn into_diagnostic_kind(self) -> DiagnosticKind {
        match self {
            Self::UnexpectedEof { expected } => DiagnosticKind::UnexpectedEof(expected),
            Self::UnexpectedToken { found, expected } => {
                DiagnosticKind::UnrecognizedToken(found, expected)
            }
            Self::LexicalError(error) => error.into_diagnostic_kind(),
            Self::IntegerLiteralOutOfRange(n) => {
                DiagnosticKind::IntegerLiteralOutOfRange(n.to_string())
            }
            Self::NestingTooDeep => DiagnosticKind::NestingTooDeep,
        }
    }
}

/// How many levels deep expressions and types may nest
pub const MAX_NESTING: usize = 256;

/// Result of a parsing step
type ParseResult<'input, T> = Result<T, Spanned<ParseError<'input>>>;

/// Describe a token in an expected-token list
fn describe(tok: &Tok<'_>) -> String {
    format!("`{tok}`")
}

/// Recursive descent parser
pub struct Parser<'input> {
    /// The tokens to parse
    tokens: Vec<Spanned<Tok<'input>>>,
    /// Current position in token stream
    pos: usize,
    /// How deeply nested the current position is
    depth: usize,
}

impl<'input> Parser<'input> {
    /// Create a new parser from a token iterator
    ///
    /// # Errors
    /// Returns the first lexical error in the token stream, if any.
    pub fn new(
        tokens: impl Iterator<Item = Spanned<Result<Tok<'input>, LexicalError<'input>>>>,
    ) -> ParseResult<'input, Self> {
        let tokens = tokens
            .map(|token| token.transpose())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| error.map(ParseError::LexicalError))?;

        Ok(Self {
            tokens,
            pos: 0,
            depth: 0,
        })
    }

    /// Peek at the current token without consuming it
    fn peek(&self) -> Option<&Tok<'input>> {
        self.tokens.get(self.pos).map(Spanned::value)
    }

    /// Check if the current token is `tok`
    fn peek_is(&self, tok: &Tok<'input>) -> bool {
        self.peek() == Some(tok)
    }

    /// Check if we're at the end of input
    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Advance to the next token and return the current one
    fn advance(&mut self) -> Option<Spanned<Tok<'input>>> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// Get current position for span creation
    fn current_pos(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or_else(|| self.end_of_input(), Spanned::start)
    }

    /// The end of the last token
    fn end_of_input(&self) -> usize {
        self.tokens.last().map_or(0, Spanned::end)
    }

    /// Create a span from start position to the end of the last consumed
    /// token
    fn span_from(&self, start: usize) -> Span {
        let end = self
            .pos
            .checked_sub(1)
            .and_then(|last| self.tokens.get(last))
            .map_or(start, Spanned::end);
        Span::from_positions(start, std::cmp::max(start, end))
    }

    /// Go one level deeper, failing once the nesting limit is reached. The
    /// caller restores the depth when it is done.
    fn deepen(&mut self) -> ParseResult<'input, ()> {
        if self.depth >= MAX_NESTING {
            let span = self.tokens.get(self.pos).map_or_else(
                || Span::from_positions(self.end_of_input(), self.end_of_input()),
                Spanned::span,
            );
            return Err(ParseError::NestingTooDeep.in_span(span));
        }
        self.depth += 1;
        Ok(())
    }

    /// Build the error for the current token not being one of `expected`
    fn unexpected(&self, expected: Vec<String>) -> Spanned<ParseError<'input>> {
        match self.tokens.get(self.pos) {
            Some(token) => ParseError::UnexpectedToken {
                found: token.value().to_string(),
                expected,
            }
            .in_span(token.span()),
            None => ParseError::UnexpectedEof { expected }.in_span(Span::from_positions(
                self.end_of_input(),
                self.end_of_input(),
            )),
        }
    }

    /// Expect a specific token, consume it if present
    fn expect(&mut self, expected: &Tok<'input>) -> ParseResult<'input, Span> {
        if self.peek_is(expected) {
            let token = self.advance().ok_or_else(|| self.unexpected(vec![describe(expected)]))?;
            Ok(token.span())
        } else {
            Err(self.unexpected(vec![describe(expected)]))
        }
    }

    /// Try to consume a specific token, return true if consumed
    fn try_consume(&mut self, expected: &Tok<'input>) -> bool {
        if self.peek_is(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Expect an identifier
    fn expect_identifier(&mut self) -> ParseResult<'input, Spanned<&'input str>> {
        match self.peek() {
            Some(&Tok::Identifier(name)) => {
                let token = self
                    .advance()
                    .ok_or_else(|| self.unexpected(vec!["identifier".to_string()]))?;
                Ok(name.in_span(token.span()))
            }
            _ => Err(self.unexpected(vec!["identifier".to_string()])),
        }
    }

    /// Parse a complete program, which is one expression
    ///
    /// # Errors
    /// Returns an error if the input is not exactly one expression.
    pub fn parse_program(&mut self) -> ParseResult<'input, Expr<'input>> {
        let expr = self.parse_expr()?;
        if self.is_eof() {
            Ok(expr)
        } else {
            Err(self.unexpected(vec!["end of file".to_string()]))
        }
    }

    /// Parse an expression
    ///
    /// # Errors
    /// Returns an error if the input does not start with an expression.
    pub fn parse_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        let outer = self.depth;
        let expr = self.deepen().and_then(|()| self.parse_assign_expr());
        self.depth = outer;
        expr
    }

    /// Parse an assignment, or any expression that binds tighter
    fn parse_assign_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        let start = self.current_pos();
        let lhs = self.parse_or_expr()?;

        if !self.peek_is(&Tok::Assign) {
            return Ok(lhs);
        }

        let ExprKind::Var(var) = lhs.0.into_value() else {
            return Err(self.unexpected(vec!["end of expression".to_string()]));
        };
        self.expect(&Tok::Assign)?;
        let value = self.parse_expr()?;

        Ok(Expr(
            ExprKind::Assign(var, Box::new(value)).in_span(self.span_from(start)),
        ))
    }

    /// Build a binary expression spanning both operands
    fn binary(
        lhs: Expr<'input>,
        rhs: Expr<'input>,
        make: impl FnOnce(Box<Expr<'input>>, Box<Expr<'input>>) -> ExprKind<'input>,
    ) -> Expr<'input> {
        let span = lhs.0.span().to(rhs.0.span());
        Expr(make(Box::new(lhs), Box::new(rhs)).in_span(span))
    }

    /// Parse `a | b`
    fn parse_or_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        let mut lhs = self.parse_and_expr()?;
        while self.try_consume(&Tok::Or) {
            self.deepen()?;
            let rhs = self.parse_and_expr()?;
            lhs = Self::binary(lhs, rhs, |l, r| ExprKind::Logical(Logical::Or, l, r));
        }
        Ok(lhs)
    }

    /// Parse `a & b`
    fn parse_and_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        let mut lhs = self.parse_comparison_expr()?;
        while self.try_consume(&Tok::And) {
            self.deepen()?;
            let rhs = self.parse_comparison_expr()?;
            lhs = Self::binary(lhs, rhs, |l, r| ExprKind::Logical(Logical::And, l, r));
        }
        Ok(lhs)
    }

    /// The comparison operator at the current token, if any
    fn peek_comparison(&self) -> Option<ComparisonOp> {
        match self.peek()? {
            Tok::Eq => Some(ComparisonOp::Equality(Equality::Eq)),
            Tok::NotEq => Some(ComparisonOp::Equality(Equality::Neq)),
            Tok::Less => Some(ComparisonOp::Comparison(Comparison::Lt)),
            Tok::LessEq => Some(ComparisonOp::Comparison(Comparison::Lte)),
            Tok::Greater => Some(ComparisonOp::Comparison(Comparison::Gt)),
            Tok::GreaterEq => Some(ComparisonOp::Comparison(Comparison::Gte)),
            _ => None,
        }
    }

    /// Parse a single, non-associative comparison
    fn parse_comparison_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        let lhs = self.parse_additive_expr()?;
        let Some(op) = self.peek_comparison() else {
            return Ok(lhs);
        };
        self.pos += 1;
        self.deepen()?;
        let rhs = self.parse_additive_expr()?;

        if self.peek_comparison().is_some() {
            return Err(self.unexpected(vec!["end of comparison".to_string()]));
        }

        Ok(match op {
            ComparisonOp::Equality(op) => {
                Self::binary(lhs, rhs, |l, r| ExprKind::Equality(op, l, r))
            }
            ComparisonOp::Comparison(op) => {
                Self::binary(lhs, rhs, |l, r| ExprKind::Comparison(op, l, r))
            }
        })
    }

    /// Parse `a + b` and `a - b`
    fn parse_additive_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        let mut lhs = self.parse_multiplicative_expr()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Plus) => Arithmetic::Addition,
                Some(Tok::Minus) => Arithmetic::Subtraction,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            self.deepen()?;
            let rhs = self.parse_multiplicative_expr()?;
            lhs = Self::binary(lhs, rhs, |l, r| ExprKind::Arithmetic(op, l, r));
        }
    }

    /// Parse `a * b` and `a / b`
    fn parse_multiplicative_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        let mut lhs = self.parse_unary_expr()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Star) => Arithmetic::Multiplication,
                Some(Tok::Slash) => Arithmetic::Division,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            self.deepen()?;
            let rhs = self.parse_unary_expr()?;
            lhs = Self::binary(lhs, rhs, |l, r| ExprKind::Arithmetic(op, l, r));
        }
    }

    /// Parse `-e`, desugared to `0 - e`
    ///
    /// `-2147483648` becomes a single literal, as its magnitude is not an
    /// `int` on its own.
    fn parse_unary_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        if !self.peek_is(&Tok::Minus) {
            return self.parse_primary_expr();
        }

        let minus = self.expect(&Tok::Minus)?;
        if let Some(literal) = self.tokens.get(self.pos) {
            if *literal.value() == Tok::IntLiteral(i32::MIN.unsigned_abs()) {
                let span = minus.to(literal.span());
                self.pos += 1;
                return Ok(Expr(ExprKind::IntLiteral(i32::MIN).in_span(span)));
            }
        }

        self.deepen()?;
        let operand = self.parse_unary_expr()?;
        let zero = Expr(ExprKind::IntLiteral(0).in_span(minus));

        Ok(Self::binary(zero, operand, |l, r| {
            ExprKind::Arithmetic(Arithmetic::Subtraction, l, r)
        }))
    }

    /// Parse a primary expression
    fn parse_primary_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        let start = self.current_pos();

        let kind = match self.peek() {
            Some(Tok::Nil) => {
                self.pos += 1;
                ExprKind::Nil
            }
            Some(Tok::Break) => {
                self.pos += 1;
                ExprKind::Break
            }
            Some(&Tok::IntLiteral(n)) => {
                let Ok(n) = i32::try_from(n) else {
                    return Err(self.unexpected_literal(n));
                };
                self.pos += 1;
                ExprKind::IntLiteral(n)
            }
            Some(Tok::StringLiteral(s)) => {
                let s = s.clone();
                self.pos += 1;
                ExprKind::StringLiteral(s)
            }
            Some(Tok::LeftParen) => return self.parse_paren_expr(),
            Some(Tok::Let) => self.parse_let_expr()?,
            Some(Tok::If) => self.parse_if_expr()?,
            Some(Tok::While) => self.parse_while_expr()?,
            Some(Tok::For) => self.parse_for_expr()?,
            Some(Tok::Identifier(_)) => return self.parse_identifier_expr(),
            _ => {
                return Err(self.unexpected(
                    [
                        "expression",
                        "`nil`",
                        "`(`",
                        "`let`",
                        "`if`",
                        "`while`",
                        "`for`",
                        "`break`",
                    ]
                    .map(ToString::to_string)
                    .to_vec(),
                ))
            }
        };

        Ok(Expr(kind.in_span(self.span_from(start))))
    }

    /// Build the error for an integer literal at the current token that is too
    /// large for an `int`
    fn unexpected_literal(&self, n: u32) -> Spanned<ParseError<'input>> {
        let span = self.tokens.get(self.pos).map_or_else(
            || Span::from_positions(self.end_of_input(), self.end_of_input()),
            Spanned::span,
        );
        ParseError::IntegerLiteralOutOfRange(n).in_span(span)
    }

    /// Parse expressions separated by `;` up to (not including) `terminator`
    fn parse_expr_seq(&mut self, terminator: &Tok<'input>) -> ParseResult<'input, Vec<Expr<'input>>> {
        let mut exprs = Vec::new();
        if self.peek_is(terminator) {
            return Ok(exprs);
        }

        loop {
            exprs.push(self.parse_expr()?);
            if !self.try_consume(&Tok::Semicolon) {
                break;
            }
        }

        if self.peek_is(terminator) {
            Ok(exprs)
        } else {
            Err(self.unexpected(vec![describe(&Tok::Semicolon), describe(terminator)]))
        }
    }

    /// Parse `()`, `(e)` or `(a; b; ...)`
    ///
    /// A single parenthesized expression is returned as-is.
    fn parse_paren_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        let start = self.current_pos();
        self.expect(&Tok::LeftParen)?;
        let mut exprs = self.parse_expr_seq(&Tok::RightParen)?;
        self.expect(&Tok::RightParen)?;

        if exprs.len() == 1 {
            if let Some(expr) = exprs.pop() {
                return Ok(expr);
            }
        }
        Ok(Expr(ExprKind::Seq(exprs).in_span(self.span_from(start))))
    }

    /// Parse `let decs in exprs end`
    fn parse_let_expr(&mut self) -> ParseResult<'input, ExprKind<'input>> {
        self.expect(&Tok::Let)?;

        let mut decs = Vec::new();
        while matches!(
            self.peek(),
            Some(Tok::Type | Tok::Var | Tok::Function)
        ) {
            decs.push(self.parse_declaration()?);
        }

        if !self.peek_is(&Tok::In) {
            return Err(self.unexpected(
                [&Tok::Type, &Tok::Var, &Tok::Function, &Tok::In]
                    .map(describe)
                    .to_vec(),
            ));
        }
        self.expect(&Tok::In)?;

        let body_start = self.current_pos();
        let mut exprs = self.parse_expr_seq(&Tok::End)?;
        let body = if exprs.len() == 1 {
            exprs.pop()
        } else {
            None
        };
        let body = match body {
            Some(body) => body,
            None => Expr(ExprKind::Seq(exprs).in_span(self.span_from(body_start))),
        };
        self.expect(&Tok::End)?;

        Ok(ExprKind::Let(decs, Box::new(body)))
    }

    /// Parse `if c then a` or `if c then a else b`
    fn parse_if_expr(&mut self) -> ParseResult<'input, ExprKind<'input>> {
        self.expect(&Tok::If)?;
        let cond = self.parse_expr()?;
        self.expect(&Tok::Then)?;
        let then = self.parse_expr()?;
        let else_ = if self.try_consume(&Tok::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };

        Ok(ExprKind::If(Box::new(cond), Box::new(then), else_))
    }

    /// Parse `while c do body`
    fn parse_while_expr(&mut self) -> ParseResult<'input, ExprKind<'input>> {
        self.expect(&Tok::While)?;
        let cond = self.parse_expr()?;
        self.expect(&Tok::Do)?;
        let body = self.parse_expr()?;

        Ok(ExprKind::While(Box::new(cond), Box::new(body)))
    }

    /// Parse `for i := lo to hi do body`
    fn parse_for_expr(&mut self) -> ParseResult<'input, ExprKind<'input>> {
        self.expect(&Tok::For)?;
        let var = self.expect_identifier()?;
        self.expect(&Tok::Assign)?;
        let lo = self.parse_expr()?;
        self.expect(&Tok::To)?;
        let hi = self.parse_expr()?;
        self.expect(&Tok::Do)?;
        let body = self.parse_expr()?;

        Ok(ExprKind::For {
            var,
            lo: Box::new(lo),
            hi: Box::new(hi),
            body: Box::new(body),
        })
    }

    /// Parse everything that starts with an identifier: calls, record and
    /// array construction, and lvalues
    fn parse_identifier_expr(&mut self) -> ParseResult<'input, Expr<'input>> {
        let start = self.current_pos();
        let name = self.expect_identifier()?;

        let kind = match self.peek() {
            Some(Tok::LeftParen) => {
                self.expect(&Tok::LeftParen)?;
                let args = self.parse_argument_list()?;
                self.expect(&Tok::RightParen)?;
                ExprKind::Call(name, args)
            }
            Some(Tok::LeftBrace) => {
                self.expect(&Tok::LeftBrace)?;
                let fields = self.parse_field_inits()?;
                self.expect(&Tok::RightBrace)?;
                ExprKind::Record(name, fields)
            }
            Some(Tok::LeftBracket) => {
                self.expect(&Tok::LeftBracket)?;
                let index = self.parse_expr()?;
                self.expect(&Tok::RightBracket)?;

                if self.try_consume(&Tok::Of) {
                    let init = self.parse_expr()?;
                    ExprKind::Array {
                        ty: name,
                        size: Box::new(index),
                        init: Box::new(init),
                    }
                } else {
                    let base = Var(name.map(VarKind::Simple));
                    let var = Var(
                        VarKind::Subscript(Box::new(base), Box::new(index))
                            .in_span(self.span_from(start)),
                    );
                    ExprKind::Var(self.parse_lvalue_suffix(var)?)
                }
            }
            _ => ExprKind::Var(self.parse_lvalue_suffix(Var(name.map(VarKind::Simple)))?),
        };

        Ok(Expr(kind.in_span(self.span_from(start))))
    }

    /// Parse any `.field` and `[index]` suffixes after an lvalue
    fn parse_lvalue_suffix(&mut self, mut var: Var<'input>) -> ParseResult<'input, Var<'input>> {
        let start = var.0.start();
        loop {
            if self.try_consume(&Tok::Dot) {
                self.deepen()?;
                let field = self.expect_identifier()?;
                var = Var(VarKind::Field(Box::new(var), field).in_span(self.span_from(start)));
            } else if self.try_consume(&Tok::LeftBracket) {
                self.deepen()?;
                let index = self.parse_expr()?;
                self.expect(&Tok::RightBracket)?;
                var = Var(
                    VarKind::Subscript(Box::new(var), Box::new(index))
                        .in_span(self.span_from(start)),
                );
            } else {
                return Ok(var);
            }
        }
    }

    /// Parse a possibly empty, comma separated argument list (without the
    /// parentheses)
    fn parse_argument_list(&mut self) -> ParseResult<'input, Vec<Expr<'input>>> {
        let mut args = Vec::new();
        if self.peek_is(&Tok::RightParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr()?);
            if !self.try_consume(&Tok::Comma) {
                return Ok(args);
            }
        }
    }

    /// Parse a possibly empty list of `name = value` (without the braces)
    fn parse_field_inits(&mut self) -> ParseResult<'input, Vec<Spanned<FieldInit<'input>>>> {
        let mut fields = Vec::new();
        if self.peek_is(&Tok::RightBrace) {
            return Ok(fields);
        }

        loop {
            let start = self.current_pos();
            let name = self.expect_identifier()?;
            self.expect(&Tok::Eq)?;
            let value = self.parse_expr()?;
            fields.push(FieldInit { name, value }.in_span(self.span_from(start)));

            if !self.try_consume(&Tok::Comma) {
                return Ok(fields);
            }
        }
    }

    /// Parse a possibly empty parameter list (without the parentheses)
    fn parse_params(&mut self) -> ParseResult<'input, Vec<Spanned<TypeField<'input>>>> {
        let mut params = Vec::new();
        if self.peek_is(&Tok::RightParen) {
            return Ok(params);
        }

        loop {
            let start = self.current_pos();
            let name = self.expect_identifier()?;
            self.expect(&Tok::Colon)?;
            let ty = self.expect_identifier()?;
            params.push(TypeField { name, ty }.in_span(self.span_from(start)));

            if !self.try_consume(&Tok::Comma) {
                return Ok(params);
            }
        }
    }

    /// Parse the possibly empty field list of a record type (without the
    /// braces)
    fn parse_record_fields(&mut self) -> ParseResult<'input, Vec<Spanned<RecordField<'input>>>> {
        let mut fields = Vec::new();
        if self.peek_is(&Tok::RightBrace) {
            return Ok(fields);
        }

        loop {
            let start = self.current_pos();
            let name = self.expect_identifier()?;
            self.expect(&Tok::Colon)?;
            let ty = self.parse_ty()?;
            fields.push(RecordField { name, ty }.in_span(self.span_from(start)));

            if !self.try_consume(&Tok::Comma) {
                return Ok(fields);
            }
        }
    }

    /// Parse a single declaration
    fn parse_declaration(&mut self) -> ParseResult<'input, Declaration<'input>> {
        let start = self.current_pos();

        let kind = match self.peek() {
            Some(Tok::Type) => {
                self.expect(&Tok::Type)?;
                let name = self.expect_identifier()?;
                self.expect(&Tok::Eq)?;
                let ty = self.parse_ty()?;
                DeclarationKind::Type { name, ty }
            }
            Some(Tok::Var) => {
                self.expect(&Tok::Var)?;
                let name = self.expect_identifier()?;
                let ty = if self.try_consume(&Tok::Colon) {
                    Some(self.expect_identifier()?)
                } else {
                    None
                };
                self.expect(&Tok::Assign)?;
                let init = self.parse_expr()?;
                DeclarationKind::Var { name, ty, init }
            }
            Some(Tok::Function) => {
                self.expect(&Tok::Function)?;
                let name = self.expect_identifier()?;
                self.expect(&Tok::LeftParen)?;
                let params = self.parse_params()?;
                self.expect(&Tok::RightParen)?;
                let result = if self.try_consume(&Tok::Colon) {
                    Some(self.expect_identifier()?)
                } else {
                    None
                };
                self.expect(&Tok::Eq)?;
                let body = self.parse_expr()?;
                DeclarationKind::Function {
                    name,
                    params,
                    result,
                    body,
                }
            }
            _ => {
                return Err(self.unexpected(
                    [&Tok::Type, &Tok::Var, &Tok::Function]
                        .map(describe)
                        .to_vec(),
                ))
            }
        };

        Ok(Declaration(kind.in_span(self.span_from(start))))
    }

    /// Parse a type expression
    fn parse_ty(&mut self) -> ParseResult<'input, Ty<'input>> {
        let outer = self.depth;
        let ty = self.deepen().and_then(|()| self.parse_ty_kind());
        self.depth = outer;
        ty
    }

    /// Parse a type expression without tracking its depth
    fn parse_ty_kind(&mut self) -> ParseResult<'input, Ty<'input>> {
        let start = self.current_pos();

        let kind = match self.peek() {
            Some(&Tok::Identifier(name)) => {
                self.pos += 1;
                TyKind::Name(name)
            }
            Some(Tok::LeftBrace) => {
                self.expect(&Tok::LeftBrace)?;
                let fields = self.parse_record_fields()?;
                self.expect(&Tok::RightBrace)?;
                TyKind::Record(fields)
            }
            Some(Tok::Array) => {
                self.expect(&Tok::Array)?;
                self.expect(&Tok::Of)?;
                TyKind::Array(self.expect_identifier()?)
            }
            _ => {
                return Err(self.unexpected(vec![
                    "identifier".to_string(),
                    describe(&Tok::LeftBrace),
                    describe(&Tok::Array),
                ]))
            }
        };

        Ok(Ty(kind.in_span(self.span_from(start))))
    }
}

/// Either kind of comparison operator
#[derive(Debug, Clone, Copy)]
enum ComparisonOp {
    /// `=` or `<>`
    Equality(Equality),
    /// `<`, `<=`, `>` or `>=`
    Comparison(Comparison),
}

/// Convert parse error to diagnostic
fn parse_error_to_diagnostic(error: Spanned<ParseError<'_>>) -> Diagnostic {
    let span = error.span();
    error.into_value().into_diagnostic_kind().error_in(span)
}

/// Parses a whole program, which is a single expression.
///
/// # Example
/// ```
/// use tigc_parser::parser::parse_program;
/// let ast = parse_program("let type t = {a: int} in t {a = 1} end");
/// assert!(ast.is_ok());
/// ```
///
/// # Errors
/// This function returns [`Err`] with a [`Diagnostic`] if any error was
/// encountered while lexing or parsing the input program.
pub fn parse_program(input: &str) -> Result<Expr<'_>, Diagnostic> {
    Parser::new(TigerLexer::new(input))
        .and_then(|mut parser| parser.parse_program())
        .map_err(parse_error_to_diagnostic)
}

/// Parses a singular expression, yielding an AST [`Expr`] node.
///
/// Unlike [`parse_program`], trailing input after the expression is ignored.
///
/// # Example
/// ```
/// use tigc_parser::parser::parse_expr;
/// let ast = parse_expr("1 + 2");
/// assert!(ast.is_ok());
/// ```
///
/// # Errors
/// This function returns [`Err`] with a [`Diagnostic`] if any error was
/// encountered while lexing or parsing the input expression.
pub fn parse_expr(input: &str) -> Result<Expr<'_>, Diagnostic> {
    Parser::new(TigerLexer::new(input))
        .and_then(|mut parser| parser.parse_expr())
        .map_err(parse_error_to_diagnostic)
}
