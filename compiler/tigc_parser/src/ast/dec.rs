//! Declaration representation for the AST
//!
//! Declarations appear in the head of a `let` expression. Consecutive
//! declarations of the same kind form a group, which is what allows types and
//! functions to be mutually recursive.

use std::fmt::Display;

use tigc_utils::span::Spanned;

use super::{
    expr::Expr,
    ty::{Ty, TypeField},
};

/// A declaration within a `let`
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Declaration<'input>(pub Spanned<DeclarationKind<'input>>);

impl Display for Declaration<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.value().fmt(f)
    }
}

impl Declaration<'_> {
    /// Whether two declarations belong in the same group (are of the same
    /// kind)
    #[must_use]
    pub fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self.0.value()) == std::mem::discriminant(other.0.value())
    }
}

/// The different kinds of declarations
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum DeclarationKind<'input> {
    /// `var x := e` or `var x: t := e`
    Var {
        /// The variable name
        name: Spanned<&'input str>,
        /// The annotated type, if any
        ty: Option<Spanned<&'input str>>,
        /// The initializer
        init: Expr<'input>,
    },
    /// `type t = ty`
    Type {
        /// The new type's name
        name: Spanned<&'input str>,
        /// What it stands for
        ty: Ty<'input>,
    },
    /// `function f(a: t, ...): r = body`
    Function {
        /// The function name
        name: Spanned<&'input str>,
        /// Formal parameters, in order
        params: Vec<Spanned<TypeField<'input>>>,
        /// The result type name. Absent for procedures.
        result: Option<Spanned<&'input str>>,
        /// The function body
        body: Expr<'input>,
    },
}

impl Display for DeclarationKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Var {
                name,
                ty: Some(ty),
                init,
            } => write!(f, "var {name}: {ty} := {init}"),
            Self::Var {
                name,
                ty: None,
                init,
            } => write!(f, "var {name} := {init}"),
            Self::Type { name, ty } => write!(f, "type {name} = {ty}"),
            Self::Function {
                name,
                params,
                result,
                body,
            } => {
                write!(
                    f,
                    "function {name}({})",
                    params
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                )?;
                if let Some(result) = result {
                    write!(f, ": {result}")?;
                }
                write!(f, " = {body}")
            }
        }
    }
}
