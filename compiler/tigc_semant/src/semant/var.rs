//! for lvalues

use tigc_diagnostics::{DiagnosticKind, SpanExt, SpannedExt};
use tigc_parser::ast::expr::{Var, VarKind};

use super::{ExpTy, Semant};
use crate::{env::Entry, types::TypeId};

impl<'input> Semant<'_, 'input> {
    /// Resolve an lvalue and compute its type
    ///
    /// `is_assignment_target` is set when the lvalue is being written to,
    /// which is not allowed for `for` loop indices.
    pub fn check_var(&mut self, var: &Var<'input>, is_assignment_target: bool) -> ExpTy {
        let span = var.0.span();

        let ty = match var.0.value() {
            VarKind::Simple(name) => match self.env.values.get(name) {
                Some(Entry::Var(ty)) => *ty,
                Some(Entry::LoopVar(ty)) => {
                    if is_assignment_target {
                        self.report(
                            span.error(DiagnosticKind::AssignmentToLoopIndex((*name).to_string())),
                        );
                    }
                    *ty
                }
                Some(Entry::Fun(_)) => {
                    self.report(span.error(DiagnosticKind::NotAVariable((*name).to_string())));
                    TypeId::ERROR
                }
                None => {
                    self.report(
                        span.error(DiagnosticKind::UndeclaredVariable((*name).to_string())),
                    );
                    TypeId::ERROR
                }
            },

            VarKind::Field(base, field) => {
                let base_ty = self.check_var(base, false).ty;
                match self.arena.record_fields(base_ty) {
                    None if self.arena.is_error(base_ty) => TypeId::ERROR,
                    Some(fields) => {
                        if let Some(ty) = fields.get(field.value()) {
                            *ty
                        } else {
                            self.report(field.error(|field| {
                                DiagnosticKind::UndeclaredField(
                                    self.display(base_ty),
                                    field.to_string(),
                                )
                            }));
                            TypeId::ERROR
                        }
                    }
                    None => {
                        self.report(
                            base.0
                                .span()
                                .error(DiagnosticKind::RecordRequired(self.display(base_ty))),
                        );
                        TypeId::ERROR
                    }
                }
            }

            VarKind::Subscript(base, index) => {
                let base_ty = self.check_var(base, false).ty;
                self.check_int(index);
                if let Some(element) = self.arena.array_element(base_ty) {
                    element
                } else if self.arena.is_error(base_ty) {
                    TypeId::ERROR
                } else {
                    self.report(
                        base.0
                            .span()
                            .error(DiagnosticKind::ArrayRequired(self.display(base_ty))),
                    );
                    TypeId::ERROR
                }
            }
        };

        self.annotations.record(span, ty);
        ExpTy::new(ty)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use tigc_diagnostics::{Diagnostic, DiagnosticCollector};
    use tigc_parser::parser::parse_program;
    use tigc_utils::span::Span;

    use super::*;
    use crate::check_program;

    /// Check a program and return its diagnostics
    fn diagnostics(input: &str) -> Vec<Diagnostic> {
        let program = parse_program(input).expect("test case should have parsed correctly");
        let collector = DiagnosticCollector::new();
        check_program(&program, &collector);
        collector.into_diagnostics()
    }

    #[test]
    fn variables_must_be_declared() {
        assert_eq!(
            diagnostics("x"),
            vec![DiagnosticKind::UndeclaredVariable("x".to_string())
                .error_in(Span::from_positions(0, 1))]
        );
    }

    #[test]
    fn functions_are_not_variables() {
        assert_eq!(
            diagnostics("let function f() = () in f end"),
            vec![DiagnosticKind::NotAVariable("f".to_string())
                .error_in(Span::from_positions(25, 26))]
        );
    }

    #[test]
    fn loop_indices_can_be_read_but_not_written() {
        assert_eq!(diagnostics("for i := 0 to 3 do (i + 1; ())"), vec![]);
        assert_eq!(
            diagnostics("for i := 0 to 3 do i := 2"),
            vec![DiagnosticKind::AssignmentToLoopIndex("i".to_string())
                .error_in(Span::from_positions(19, 20))]
        );
    }

    #[test]
    fn field_access_resolves_through_names() {
        let source = indoc! {"
            let
                type point = {x: int, y: int}
                var p := point {x = 1, y = 2}
            in
                p.x + p.y
            end
        "};
        assert_eq!(diagnostics(source), vec![]);
    }

    #[test]
    fn field_access_requires_a_known_field_of_a_record() {
        let source = "let type point = {x: int} var p := point {x = 1} in p.z end";
        assert_eq!(
            diagnostics(source)
                .iter()
                .map(|diagnostic| diagnostic.kind().clone())
                .collect::<Vec<_>>(),
            vec![DiagnosticKind::UndeclaredField(
                "point".to_string(),
                "z".to_string()
            )]
        );

        assert_eq!(
            diagnostics("let var n := 1 in n.x end")
                .iter()
                .map(|diagnostic| diagnostic.kind().clone())
                .collect::<Vec<_>>(),
            vec![DiagnosticKind::RecordRequired("int".to_string())]
        );
    }

    #[test]
    fn subscripts_require_arrays_and_integer_indices() {
        let source = indoc! {"
            let
                type ints = array of int
                var a := ints [4] of 0
            in
                a[1] := a[2] + 1
            end
        "};
        assert_eq!(diagnostics(source), vec![]);

        assert_eq!(
            diagnostics("let type ints = array of int var a := ints [4] of 0 in a[\"x\"] end")
                .iter()
                .map(|diagnostic| diagnostic.kind().clone())
                .collect::<Vec<_>>(),
            vec![DiagnosticKind::IntegerRequired("string".to_string())]
        );
        assert_eq!(
            diagnostics("let var s := \"abc\" in s[0] end")
                .iter()
                .map(|diagnostic| diagnostic.kind().clone())
                .collect::<Vec<_>>(),
            vec![DiagnosticKind::ArrayRequired("string".to_string())]
        );
    }
}
