//! Expression representation for the AST
//!
//! The main thing within this module you will need is the [`Expr`] struct.
//! Lvalues have their own node, [`Var`], because they appear both as
//! expressions and as assignment targets.

use std::fmt::Display;

use tigc_utils::{code_fmt::indent_lines, span::Spanned};

use super::dec::Declaration;

/// Arithmetic operators
///
/// Both operands and the result are `int`.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Arithmetic {
    /// `+`
    Addition,
    /// `-`
    Subtraction,
    /// `*`
    Multiplication,
    /// `/`
    Division,
}
impl Display for Arithmetic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Addition => write!(f, "+"),
            Self::Subtraction => write!(f, "-"),
            Self::Multiplication => write!(f, "*"),
            Self::Division => write!(f, "/"),
        }
    }
}

/// Logical operators
///
/// Both operands and the result are `int`, where zero is false.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Logical {
    /// `&`
    And,
    /// `|`
    Or,
}
impl Display for Logical {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "&"),
            Self::Or => write!(f, "|"),
        }
    }
}

/// Equality checks
///
/// Operands may be of any comparable type as long as they agree. The result
/// is `int`.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Equality {
    /// `=`
    Eq,
    /// `<>`
    Neq,
}
impl Display for Equality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Neq => write!(f, "<>"),
        }
    }
}

/// Comparison checks
///
/// Operands are both `int` or both `string`. The result is `int`.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Comparison {
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}
impl Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
        }
    }
}

/// An expression
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Expr<'input>(pub Spanned<ExprKind<'input>>);

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.value().fmt(f)
    }
}

/// One `name = value` entry of a record construction
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct FieldInit<'input> {
    /// The field being initialized
    pub name: Spanned<&'input str>,
    /// Its value
    pub value: Expr<'input>,
}
impl Display for FieldInit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// The enum representing the different kinds of expressions
#[derive(PartialEq, Eq, Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub enum ExprKind<'input> {
    /// `nil`
    Nil,
    /// An integer literal
    IntLiteral(i32),
    /// A string literal, with escapes already processed
    StringLiteral(String),
    /// An lvalue read
    Var(Var<'input>),
    /// `f(a, b, c)`
    Call(Spanned<&'input str>, Vec<Expr<'input>>),

    /// Arithmetic operations
    Arithmetic(Arithmetic, Box<Expr<'input>>, Box<Expr<'input>>),
    /// Logical operations
    Logical(Logical, Box<Expr<'input>>, Box<Expr<'input>>),
    /// Equality checks
    Equality(Equality, Box<Expr<'input>>, Box<Expr<'input>>),
    /// Comparisons
    Comparison(Comparison, Box<Expr<'input>>, Box<Expr<'input>>),

    /// `t {a = 1, b = 2}`
    Record(Spanned<&'input str>, Vec<Spanned<FieldInit<'input>>>),
    /// `t [n] of init`
    Array {
        /// The array type's name
        ty: Spanned<&'input str>,
        /// Number of elements
        size: Box<Expr<'input>>,
        /// Initial value of every element
        init: Box<Expr<'input>>,
    },
    /// `(a; b; c)`, or `()`
    Seq(Vec<Expr<'input>>),
    /// `x := e`
    Assign(Var<'input>, Box<Expr<'input>>),

    /// `if c then a` or `if c then a else b`
    If(Box<Expr<'input>>, Box<Expr<'input>>, Option<Box<Expr<'input>>>),
    /// `while c do body`
    While(Box<Expr<'input>>, Box<Expr<'input>>),
    /// `for i := lo to hi do body`
    For {
        /// The loop index
        var: Spanned<&'input str>,
        /// Initial value of the index
        lo: Box<Expr<'input>>,
        /// Final value of the index
        hi: Box<Expr<'input>>,
        /// The loop body
        body: Box<Expr<'input>>,
    },
    /// `break`
    Break,
    /// `let decs in body end`
    Let(Vec<Declaration<'input>>, Box<Expr<'input>>),
}

/// Write a string literal back out with its escapes
fn write_string_literal(f: &mut std::fmt::Formatter<'_>, value: &str) -> std::fmt::Result {
    write!(f, "\"")?;
    for c in value.chars() {
        match c {
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            c if c.is_ascii_control() => write!(f, "\\{:03}", u32::from(c))?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

/// Join the [`Display`] forms of some items
fn join<T: Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

impl Display for ExprKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::IntLiteral(n) => write!(f, "{n}"),
            Self::StringLiteral(s) => write_string_literal(f, s),
            Self::Var(var) => write!(f, "{var}"),
            Self::Call(name, args) => write!(f, "{name}({})", join(args, ", ")),
            Self::Arithmetic(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            Self::Logical(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            Self::Equality(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            Self::Comparison(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            Self::Record(ty, fields) => write!(f, "{ty} {{{}}}", join(fields, ", ")),
            Self::Array { ty, size, init } => write!(f, "{ty} [{size}] of {init}"),
            Self::Seq(exprs) => write!(f, "({})", join(exprs, "; ")),
            Self::Assign(var, value) => write!(f, "{var} := {value}"),
            Self::If(cond, then, None) => write!(f, "if {cond} then {then}"),
            Self::If(cond, then, Some(else_)) => {
                write!(f, "if {cond} then {then} else {else_}")
            }
            Self::While(cond, body) => write!(f, "while {cond} do {body}"),
            Self::For { var, lo, hi, body } => {
                write!(f, "for {var} := {lo} to {hi} do {body}")
            }
            Self::Break => write!(f, "break"),
            Self::Let(decs, body) => {
                let body = match body.0.value() {
                    Self::Seq(exprs) => join(exprs, ";\n"),
                    _ => body.to_string(),
                };
                write!(
                    f,
                    "let\n{}\nin\n{}\nend",
                    decs.iter()
                        .map(|dec| indent_lines(&dec.to_string(), "    "))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    indent_lines(&body, "    ")
                )
            }
        }
    }
}

/// An lvalue: something that names a storage location
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Var<'input>(pub Spanned<VarKind<'input>>);

impl Display for Var<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.value().fmt(f)
    }
}

/// The different kinds of lvalues
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum VarKind<'input> {
    /// A variable, by name
    Simple(&'input str),
    /// `r.field`
    Field(Box<Var<'input>>, Spanned<&'input str>),
    /// `a[index]`
    Subscript(Box<Var<'input>>, Box<Expr<'input>>),
}

impl Display for VarKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple(name) => write!(f, "{name}"),
            Self::Field(base, field) => write!(f, "{base}.{field}"),
            Self::Subscript(base, index) => write!(f, "{base}[{index}]"),
        }
    }
}
