//! The semantic checker
//!
//! [`Semant`] walks the AST depth-first. Expressions, declarations and
//! lvalues each have their own submodule. Every rule
//! reports what it finds and returns a best-effort type, so a single run
//! surfaces as many problems as possible.

use std::ops::{Deref, DerefMut};

use tigc_diagnostics::{Diagnostic, ErrorReporter};
use tigc_parser::ast::expr::Expr;
use tigc_utils::span::Span;

use crate::{
    env::Env,
    types::{TypeArena, TypeId},
};

mod dec;
mod expr;
mod var;

/// The intermediate code produced for an expression
///
/// Translation is not performed yet, so this carries nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translation;

/// The result of checking an expression or lvalue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpTy {
    /// The translated code
    pub exp: Translation,
    /// The expression's type
    pub ty: TypeId,
}

impl ExpTy {
    /// Create an [`ExpTy`] with an empty translation
    #[must_use]
    pub const fn new(ty: TypeId) -> Self {
        Self {
            exp: Translation,
            ty,
        }
    }
}

/// The type computed for every checked expression and lvalue, keyed by its
/// span, in the order they were checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// `(span, type)` pairs. Children come before their parents.
    entries: Vec<(Span, TypeId)>,
}

impl Annotations {
    /// Record the type of the node at `span`
    fn record(&mut self, span: Span, ty: TypeId) {
        self.entries.push((span, ty));
    }

    /// Iterate over all annotations in the order they were recorded
    pub fn iter(&self) -> impl Iterator<Item = &(Span, TypeId)> {
        self.entries.iter()
    }

    /// The type of the outermost node recorded at exactly `span`
    #[must_use]
    pub fn type_at(&self, span: Span) -> Option<TypeId> {
        self.entries
            .iter()
            .rev()
            .find(|(entry_span, _)| *entry_span == span)
            .map(|(_, ty)| *ty)
    }

    /// The number of annotations
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was annotated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything produced by checking a program
#[derive(Debug)]
pub struct CheckedProgram<'input> {
    /// The type of the whole program
    pub ty: TypeId,
    /// The arena every [`TypeId`] in this result refers to
    pub arena: TypeArena<'input>,
    /// Per-node types
    pub annotations: Annotations,
}

/// The state of one checking run
pub struct Semant<'a, 'input> {
    /// Every type seen so far
    arena: TypeArena<'input>,
    /// The scopes currently visible
    env: Env<'input>,
    /// Where diagnostics go
    reporter: &'a dyn ErrorReporter,
    /// How many loop bodies enclose the current expression within the
    /// current function
    loop_depth: usize,
    /// Types recorded so far
    annotations: Annotations,
}

impl std::fmt::Debug for Semant<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Semant")
            .field("arena", &self.arena)
            .field("env", &self.env)
            .field("loop_depth", &self.loop_depth)
            .finish_non_exhaustive()
    }
}

impl<'a, 'input> Semant<'a, 'input> {
    /// Create a checker over the root environment
    #[must_use]
    pub fn new(reporter: &'a dyn ErrorReporter) -> Self {
        Self {
            arena: TypeArena::new(),
            env: Env::new(),
            reporter,
            loop_depth: 0,
            annotations: Annotations::default(),
        }
    }

    /// The types created so far
    #[must_use]
    pub const fn arena(&self) -> &TypeArena<'input> {
        &self.arena
    }

    /// Finish checking, giving back the arena and annotations
    #[must_use]
    pub fn finish(self) -> (TypeArena<'input>, Annotations) {
        (self.arena, self.annotations)
    }

    /// Send a diagnostic to the reporter
    fn report(&self, diagnostic: Diagnostic) {
        tracing::trace!(%diagnostic, "reporting diagnostic");
        self.reporter.report(diagnostic);
    }

    /// Render a type for a message
    fn display(&self, ty: TypeId) -> String {
        self.arena.display(ty)
    }
}

/// Keeps a scope open for as long as it lives
///
/// Created around let-blocks, function bodies and `for` loop bodies. The
/// frames are popped when the guard is dropped, on every exit path.
struct ScopeGuard<'s, 'a, 'input> {
    /// The checker whose scopes are open
    semant: &'s mut Semant<'a, 'input>,
    /// Whether a type frame was opened as well as a value frame
    types: bool,
}

impl<'s, 'a, 'input> ScopeGuard<'s, 'a, 'input> {
    /// Open a value scope
    fn values(semant: &'s mut Semant<'a, 'input>) -> Self {
        semant.env.values.begin_scope();
        tracing::trace!(depth = semant.env.values.depth(), "entered value scope");
        Self {
            semant,
            types: false,
        }
    }

    /// Open a type scope and a value scope
    fn both(semant: &'s mut Semant<'a, 'input>) -> Self {
        semant.env.types.begin_scope();
        semant.env.values.begin_scope();
        tracing::trace!(depth = semant.env.values.depth(), "entered type and value scope");
        Self {
            semant,
            types: true,
        }
    }
}

impl<'a, 'input> Deref for ScopeGuard<'_, 'a, 'input> {
    type Target = Semant<'a, 'input>;

    fn deref(&self) -> &Self::Target {
        self.semant
    }
}

impl DerefMut for ScopeGuard<'_, '_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.semant
    }
}

impl Drop for ScopeGuard<'_, '_, '_> {
    fn drop(&mut self) {
        tracing::trace!(depth = self.semant.env.values.depth(), "leaving scope");
        self.semant.env.values.end_scope();
        if self.types {
            self.semant.env.types.end_scope();
        }
    }
}

/// Check a whole program
///
/// Diagnostics are sent to `reporter`; the program is always checked to the
/// end.
#[tracing::instrument(skip_all)]
pub fn check_program<'input>(
    program: &Expr<'input>,
    reporter: &dyn ErrorReporter,
) -> CheckedProgram<'input> {
    let mut semant = Semant::new(reporter);
    let ExpTy { ty, .. } = semant.check_expr(program);
    let (arena, annotations) = semant.finish();

    tracing::debug!(types = arena.len(), nodes = annotations.len(), "program checked");
    CheckedProgram {
        ty,
        arena,
        annotations,
    }
}

#[cfg(test)]
mod tests {
    use tigc_diagnostics::{DiagnosticCategory, DiagnosticCollector, DiagnosticKind};
    use tigc_parser::parser::parse_program;

    use super::*;
    use crate::types::Type;

    /// Parse and check a program, returning the program type and the
    /// diagnostics
    fn check(input: &str) -> (TypeId, TypeArena<'_>, Vec<Diagnostic>) {
        let program = parse_program(input).expect("test case should have parsed correctly");
        let collector = DiagnosticCollector::new();
        let CheckedProgram { ty, arena, .. } = check_program(&program, &collector);
        (ty, arena, collector.into_diagnostics())
    }

    #[test]
    fn scopes_are_closed_after_a_let() {
        let program = parse_program("(let var x := 1 type t = int in x end; 0)")
            .expect("test case should have parsed correctly");
        let collector = DiagnosticCollector::new();
        let mut semant = Semant::new(&collector);
        semant.check_expr(&program);

        assert!(collector.is_empty());
        assert_eq!(semant.env.values.depth(), 1);
        assert_eq!(semant.env.types.depth(), 1);
        assert_eq!(semant.env.values.get("x"), None);
        assert_eq!(semant.env.types.get("t"), None);
    }

    #[test]
    fn annotations_cover_every_expression() {
        let program = parse_program("let var s := \"a\" in s end")
            .expect("test case should have parsed correctly");
        let collector = DiagnosticCollector::new();
        let checked = check_program(&program, &collector);

        assert_eq!(checked.ty, TypeId::STRING);
        assert_eq!(checked.annotations.type_at(program.0.span()), Some(TypeId::STRING));
        assert_eq!(
            checked.annotations.type_at(Span::from_positions(13, 16)),
            Some(TypeId::STRING)
        );
        assert!(checked.annotations.len() >= 3);
    }

    #[test]
    fn literals_have_primitive_types() {
        assert_eq!(check("1").0, TypeId::INT);
        assert_eq!(check("\"one\"").0, TypeId::STRING);
        assert_eq!(check("nil").0, TypeId::NIL);
        assert_eq!(check("()").0, TypeId::VOID);
    }

    #[test]
    fn let_has_the_type_of_its_body() {
        let (ty, arena, diagnostics) =
            check("let type list = {head: int, tail: list} in list {head = 1, tail = nil} end");

        assert_eq!(diagnostics, vec![]);
        assert!(matches!(arena.resolved(ty), Type::Record(_)));
        assert_eq!(arena.display(ty), "list");
    }

    #[test]
    fn break_is_only_allowed_in_loops() {
        assert_eq!(check("while 1 do break").2, vec![]);
        assert_eq!(check("for i := 0 to 10 do (i; break)").2, vec![]);

        let (_, _, diagnostics) = check("(break; 0)");
        assert_eq!(
            diagnostics,
            vec![DiagnosticKind::BreakOutsideLoop.error_in(Span::from_positions(1, 6))]
        );
        assert_eq!(diagnostics[0].category(), DiagnosticCategory::IllegalControl);
    }

    #[test]
    fn function_bodies_reset_loop_depth() {
        let (_, _, diagnostics) =
            check("while 1 do let function f() = break in f() end");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind(), &DiagnosticKind::BreakOutsideLoop);
    }
}
