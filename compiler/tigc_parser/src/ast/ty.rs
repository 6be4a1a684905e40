//! Type expressions for the AST
//!
//! These appear on the right hand side of `type` declarations and as the types
//! of record fields. Everywhere else a type is referred to by its name alone.

use std::fmt::Display;

use tigc_utils::span::Spanned;

/// A `name: type` pair, used for function parameters
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TypeField<'input> {
    /// The parameter name
    pub name: Spanned<&'input str>,
    /// The name of its type
    pub ty: Spanned<&'input str>,
}
impl Display for TypeField<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// One field of a record type expression
///
/// Unlike parameters, a field's type may be written out in place, as in
/// `{children: array of tree}`.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct RecordField<'input> {
    /// The field name
    pub name: Spanned<&'input str>,
    /// Its type
    pub ty: Ty<'input>,
}
impl Display for RecordField<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// A type expression
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Ty<'input>(pub Spanned<TyKind<'input>>);

impl Display for Ty<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.value().fmt(f)
    }
}

/// The different kinds of type expressions
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum TyKind<'input> {
    /// Another type, by name, such as `int`
    Name(&'input str),
    /// `{a: int, b: string}`
    Record(Vec<Spanned<RecordField<'input>>>),
    /// `array of int`
    Array(Spanned<&'input str>),
}

impl Display for TyKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Record(fields) => write!(
                f,
                "{{{}}}",
                fields
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Array(element) => write!(f, "array of {element}"),
        }
    }
}
