//! for expressions

use tigc_diagnostics::{DiagnosticKind, SpanExt, SpannedExt};
use tigc_parser::ast::{
    dec::Declaration,
    expr::{Expr, ExprKind, FieldInit},
};
use tigc_utils::span::{Span, Spanned};

use super::{ExpTy, ScopeGuard, Semant};
use crate::{env::Entry, types::TypeId};

impl<'input> Semant<'_, 'input> {
    /// Check an expression and compute its type
    pub fn check_expr(&mut self, expr: &Expr<'input>) -> ExpTy {
        let span = expr.0.span();

        let ty = match expr.0.value() {
            ExprKind::Nil => TypeId::NIL,
            ExprKind::IntLiteral(_) => TypeId::INT,
            ExprKind::StringLiteral(_) => TypeId::STRING,
            ExprKind::Var(var) => self.check_var(var, false).ty,
            ExprKind::Call(name, args) => self.check_call(span, *name, args),

            ExprKind::Arithmetic(_, lhs, rhs) | ExprKind::Logical(_, lhs, rhs) => {
                self.check_int(lhs);
                self.check_int(rhs);
                TypeId::INT
            }
            ExprKind::Equality(_, lhs, rhs) => self.check_comparison(span, lhs, rhs, false),
            ExprKind::Comparison(_, lhs, rhs) => self.check_comparison(span, lhs, rhs, true),

            ExprKind::Record(ty, fields) => self.check_record(span, *ty, fields),
            ExprKind::Array { ty, size, init } => self.check_array(*ty, size, init),
            ExprKind::Seq(exprs) => exprs
                .iter()
                .map(|expr| self.check_expr(expr).ty)
                .last()
                .unwrap_or(TypeId::VOID),
            ExprKind::Assign(var, value) => {
                let target = self.check_var(var, true).ty;
                let value_ty = self.check_expr(value).ty;
                if !self.arena.coerce_to(value_ty, target) {
                    self.report(value.0.span().error(DiagnosticKind::AssignmentTypeMismatch {
                        expected: self.display(target),
                        got: self.display(value_ty),
                    }));
                }
                TypeId::VOID
            }

            ExprKind::If(cond, then, else_) => {
                self.check_int(cond);
                let then_ty = self.check_expr(then).ty;
                match else_ {
                    None => {
                        self.expect_void(then_ty, then.0.span(), DiagnosticKind::IfThenMustBeVoid);
                        TypeId::VOID
                    }
                    Some(else_) => {
                        let else_ty = self.check_expr(else_).ty;
                        if !self.arena.agree(then_ty, else_ty) {
                            self.report(span.error(DiagnosticKind::BranchTypeMismatch(
                                self.display(then_ty),
                                self.display(else_ty),
                            )));
                            then_ty
                        } else if then_ty == TypeId::NIL {
                            else_ty
                        } else {
                            then_ty
                        }
                    }
                }
            }
            ExprKind::While(cond, body) => {
                self.check_int(cond);
                self.check_loop_body(body);
                TypeId::VOID
            }
            ExprKind::For { var, lo, hi, body } => {
                self.check_int(lo);
                self.check_int(hi);

                let mut scope = ScopeGuard::values(self);
                scope.env.values.put(*var.value(), Entry::LoopVar(TypeId::INT));
                scope.check_loop_body(body);
                TypeId::VOID
            }
            ExprKind::Break => {
                if self.loop_depth == 0 {
                    self.report(span.error(DiagnosticKind::BreakOutsideLoop));
                }
                TypeId::VOID
            }
            ExprKind::Let(decs, body) => {
                let mut scope = ScopeGuard::both(self);
                for group in decs.chunk_by(Declaration::same_kind) {
                    scope.check_declaration_group(group);
                }
                scope.check_expr(body).ty
            }
        };

        self.annotations.record(span, ty);
        ExpTy::new(ty)
    }

    /// Check an expression that must be an `int`
    pub(super) fn check_int(&mut self, expr: &Expr<'input>) {
        let ty = self.check_expr(expr).ty;
        if !self.arena.coerce_to(ty, TypeId::INT) {
            self.report(
                expr.0
                    .span()
                    .error(DiagnosticKind::IntegerRequired(self.display(ty))),
            );
        }
    }

    /// Report `make_error` at `span` unless `ty` is `void`
    fn expect_void(&self, ty: TypeId, span: Span, make_error: fn(String) -> DiagnosticKind) {
        if !self.arena.coerce_to(ty, TypeId::VOID) {
            self.report(span.error(make_error(self.display(ty))));
        }
    }

    /// Check the body of a `while` or `for` loop, within which `break` is
    /// allowed
    fn check_loop_body(&mut self, body: &Expr<'input>) {
        self.loop_depth += 1;
        let ty = self.check_expr(body).ty;
        self.loop_depth -= 1;

        self.expect_void(ty, body.0.span(), DiagnosticKind::LoopBodyMustBeVoid);
    }

    /// Check the operands of `=`, `<>`, `<`, `<=`, `>` and `>=`
    ///
    /// Each operand must be of a comparable type, or an orderable one if
    /// `ordering` is set, and the two must agree.
    fn check_comparison(
        &mut self,
        span: Span,
        lhs: &Expr<'input>,
        rhs: &Expr<'input>,
        ordering: bool,
    ) -> TypeId {
        let lhs_ty = self.check_expr(lhs).ty;
        let rhs_ty = self.check_expr(rhs).ty;

        let lhs_ok = self.expect_comparable(lhs_ty, lhs.0.span(), ordering);
        let rhs_ok = self.expect_comparable(rhs_ty, rhs.0.span(), ordering);
        if lhs_ok && rhs_ok && !self.arena.agree(lhs_ty, rhs_ty) {
            self.report(span.error(DiagnosticKind::OperandsDisagree(
                self.display(lhs_ty),
                self.display(rhs_ty),
            )));
        }

        TypeId::INT
    }

    /// Report if a comparison operand has a type that cannot be compared
    fn expect_comparable(&self, ty: TypeId, span: Span, ordering: bool) -> bool {
        if ordering && !self.arena.is_orderable(ty) {
            self.report(span.error(DiagnosticKind::OrderableRequired(self.display(ty))));
            false
        } else if !ordering && !self.arena.is_comparable(ty) {
            self.report(span.error(DiagnosticKind::ComparableRequired(self.display(ty))));
            false
        } else {
            true
        }
    }

    /// Check every expression in a list, for recovery after its context turned
    /// out to be invalid
    fn check_all<'e>(&mut self, exprs: impl IntoIterator<Item = &'e Expr<'input>>)
    where
        'input: 'e,
    {
        for expr in exprs {
            self.check_expr(expr);
        }
    }

    /// Check a function call
    fn check_call(
        &mut self,
        span: Span,
        name: Spanned<&'input str>,
        args: &[Expr<'input>],
    ) -> TypeId {
        let fun = match self.env.values.get(name.value()) {
            Some(Entry::Fun(fun)) => fun.clone(),
            Some(Entry::Var(_) | Entry::LoopVar(_)) => {
                self.report(name.error(|name| DiagnosticKind::NotAFunction(name.to_string())));
                self.check_all(args);
                return TypeId::ERROR;
            }
            None => {
                self.report(
                    name.error(|name| DiagnosticKind::UndeclaredFunction(name.to_string())),
                );
                self.check_all(args);
                return TypeId::ERROR;
            }
        };

        let mut args = args.iter();
        for (param, expected) in &fun.formals {
            let Some(arg) = args.next() else {
                self.report(span.error(DiagnosticKind::MissingArgument((*param).to_string())));
                continue;
            };

            let got = self.check_expr(arg).ty;
            if !self.arena.coerce_to(got, *expected) {
                self.report(arg.0.span().error(DiagnosticKind::ArgumentTypeMismatch {
                    param: (*param).to_string(),
                    expected: self.display(*expected),
                    got: self.display(got),
                }));
            }
        }
        for surplus in args {
            self.check_expr(surplus);
            self.report(surplus.0.span().error(DiagnosticKind::TooManyArguments));
        }

        fun.result
    }

    /// Check a record construction
    fn check_record(
        &mut self,
        span: Span,
        ty_name: Spanned<&'input str>,
        inits: &[Spanned<FieldInit<'input>>],
    ) -> TypeId {
        let values = move || inits.iter().map(|init| &init.value().value);

        let Some(ty) = self.lookup_type(ty_name) else {
            self.check_all(values());
            return TypeId::ERROR;
        };
        let Some(fields) = self.arena.record_fields(ty).cloned() else {
            if !self.arena.is_error(ty) {
                self.report(
                    ty_name.error(|_| DiagnosticKind::RecordTypeRequired(self.display(ty))),
                );
            }
            self.check_all(values());
            return TypeId::ERROR;
        };

        let mut inits = inits.iter();
        for (field, expected) in fields {
            let Some(init) = inits.next() else {
                self.report(span.error(DiagnosticKind::MissingField(field.to_string())));
                continue;
            };
            let FieldInit { name, value } = init.value();

            if *name.value() != field {
                self.report(name.error(|name| DiagnosticKind::FieldNameMismatch {
                    expected: field.to_string(),
                    got: name.to_string(),
                }));
            }

            let got = self.check_expr(value).ty;
            if !self.arena.coerce_to(got, expected) {
                self.report(value.0.span().error(DiagnosticKind::FieldTypeMismatch {
                    field: field.to_string(),
                    expected: self.display(expected),
                    got: self.display(got),
                }));
            }
        }
        for surplus in inits {
            self.check_expr(&surplus.value().value);
            self.report(surplus.span().error(DiagnosticKind::TooManyFields));
        }

        ty
    }

    /// Check an array construction
    fn check_array(
        &mut self,
        ty_name: Spanned<&'input str>,
        size: &Expr<'input>,
        init: &Expr<'input>,
    ) -> TypeId {
        self.check_int(size);

        let Some(ty) = self.lookup_type(ty_name) else {
            self.check_expr(init);
            return TypeId::ERROR;
        };
        let Some(element) = self.arena.array_element(ty) else {
            if !self.arena.is_error(ty) {
                self.report(
                    ty_name.error(|_| DiagnosticKind::ArrayTypeRequired(self.display(ty))),
                );
            }
            self.check_expr(init);
            return TypeId::ERROR;
        };

        let got = self.check_expr(init).ty;
        if !self.arena.coerce_to(got, element) {
            self.report(init.0.span().error(DiagnosticKind::InitializerTypeMismatch {
                expected: self.display(element),
                got: self.display(got),
            }));
        }

        ty
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use tigc_diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticCollector};
    use tigc_parser::parser::parse_program;

    use super::*;
    use crate::check_program;

    /// Check a program and return the categories of its diagnostics
    fn categories(input: &str) -> Vec<DiagnosticCategory> {
        diagnostics(input).iter().map(Diagnostic::category).collect()
    }

    /// Check a program and return its diagnostics
    fn diagnostics(input: &str) -> Vec<Diagnostic> {
        let program = parse_program(input).expect("test case should have parsed correctly");
        let collector = DiagnosticCollector::new();
        check_program(&program, &collector);
        collector.into_diagnostics()
    }

    #[test]
    fn arithmetic_reports_each_bad_operand() {
        let diagnostics = diagnostics("\"a\" + \"bc\"");
        assert_eq!(
            diagnostics,
            vec![
                DiagnosticKind::IntegerRequired("string".to_string())
                    .error_in(Span::from_positions(0, 3)),
                DiagnosticKind::IntegerRequired("string".to_string())
                    .error_in(Span::from_positions(6, 10)),
            ]
        );
    }

    #[test]
    fn logical_operators_take_integers() {
        assert_eq!(categories("1 & 0 | 3"), vec![]);
        assert_eq!(categories("nil | 1"), vec![DiagnosticCategory::TypeMismatch]);
    }

    #[test]
    fn equality_requires_agreeing_comparable_operands() {
        assert_eq!(categories("1 = 2"), vec![]);
        assert_eq!(categories("\"a\" <> \"b\""), vec![]);
        assert_eq!(
            categories("let type r = {x: int} var v: r := nil in v = nil end"),
            vec![]
        );
        assert_eq!(categories("1 = \"a\""), vec![DiagnosticCategory::TypeMismatch]);
        assert_eq!(categories("() = ()"), vec![DiagnosticCategory::TypeMismatch; 2]);
    }

    #[test]
    fn ordering_requires_ints_or_strings() {
        assert_eq!(categories("1 < 2"), vec![]);
        assert_eq!(categories("\"a\" >= \"b\""), vec![]);
        assert_eq!(categories("nil < 1"), vec![DiagnosticCategory::TypeMismatch]);
        assert_eq!(categories("1 > \"a\""), vec![DiagnosticCategory::TypeMismatch]);
    }

    #[test]
    fn calls_check_arguments_pairwise() {
        let source = indoc! {"
            let
                function f(a: int, b: string): int = a
            in
                f(1, 2)
            end
        "};
        assert_eq!(
            diagnostics(source)
                .iter()
                .map(|diagnostic| diagnostic.kind().clone())
                .collect::<Vec<_>>(),
            vec![DiagnosticKind::ArgumentTypeMismatch {
                param: "b".to_string(),
                expected: "string".to_string(),
                got: "int".to_string(),
            }]
        );
    }

    #[test]
    fn calls_to_unknown_names_still_check_arguments() {
        assert_eq!(
            categories("g(1 + \"x\")"),
            vec![
                DiagnosticCategory::UndeclaredIdentifier,
                DiagnosticCategory::TypeMismatch,
            ]
        );
        assert_eq!(
            categories("let var g := 1 in g() end"),
            vec![DiagnosticCategory::UndeclaredIdentifier]
        );
    }

    #[test]
    fn record_construction_checks_fields_in_order() {
        let source = indoc! {"
            let
                type point = {x: int, y: int}
            in
                point {y = 1, x = \"a\"}
            end
        "};
        assert_eq!(
            categories(source),
            vec![
                DiagnosticCategory::TypeMismatch,
                DiagnosticCategory::TypeMismatch,
                DiagnosticCategory::TypeMismatch,
            ]
        );

        assert_eq!(
            categories("let type p = {x: int, y: int} in p {x = 1} end"),
            vec![DiagnosticCategory::ArityMismatch]
        );
        assert_eq!(
            categories("let type p = {x: int} in p {x = 1, y = 2} end"),
            vec![DiagnosticCategory::ArityMismatch]
        );
        assert_eq!(
            categories("let type a = array of int in a {x = 1} end"),
            vec![DiagnosticCategory::TypeMismatch]
        );
        assert_eq!(
            categories("q {x = 1}"),
            vec![DiagnosticCategory::UndeclaredIdentifier]
        );
    }

    #[test]
    fn array_construction() {
        assert_eq!(categories("let type a = array of int in a [3] of 0 end"), vec![]);
        assert_eq!(
            categories("let type a = array of int in a [\"3\"] of \"0\" end"),
            vec![DiagnosticCategory::TypeMismatch; 2]
        );
        assert_eq!(
            categories("let type r = {} in r [1] of nil end"),
            vec![DiagnosticCategory::TypeMismatch]
        );
    }

    #[test]
    fn if_branches_must_agree() {
        assert_eq!(categories("if 1 then 2 else 3"), vec![]);
        assert_eq!(categories("if 1 then ()"), vec![]);
        assert_eq!(
            categories("let type r = {} in if 1 then nil else r {} end"),
            vec![]
        );
        assert_eq!(
            categories("if 1 then 2 else \"a\""),
            vec![DiagnosticCategory::TypeMismatch]
        );
        assert_eq!(categories("if 1 then 2"), vec![DiagnosticCategory::TypeMismatch]);
        assert_eq!(categories("if \"c\" then ()"), vec![DiagnosticCategory::TypeMismatch]);
    }

    #[test]
    fn if_with_nil_then_branch_takes_the_record_type() {
        let program = parse_program("let type r = {} in if 1 then nil else r {} end")
            .expect("test case should have parsed correctly");
        let collector = DiagnosticCollector::new();
        let checked = check_program(&program, &collector);

        assert_eq!(checked.arena.display(checked.ty), "r");
    }

    #[test]
    fn loop_bodies_must_be_void() {
        assert_eq!(categories("while 1 do ()"), vec![]);
        assert_eq!(categories("while 1 do 5"), vec![DiagnosticCategory::TypeMismatch]);
        assert_eq!(
            categories("for i := 0 to 3 do i"),
            vec![DiagnosticCategory::TypeMismatch]
        );
        assert_eq!(
            categories("for i := \"a\" to nil do ()"),
            vec![DiagnosticCategory::TypeMismatch; 2]
        );
    }

    #[test]
    fn loop_index_is_scoped_to_the_body() {
        assert_eq!(
            categories("(for i := 0 to 3 do (); i)"),
            vec![DiagnosticCategory::UndeclaredIdentifier]
        );
    }

    #[test]
    fn sequences_have_the_type_of_their_last_expression() {
        let program = parse_program("(1; \"two\")").expect("test case should have parsed correctly");
        let collector = DiagnosticCollector::new();
        assert_eq!(check_program(&program, &collector).ty, TypeId::STRING);
    }

    #[test]
    fn assignment_checks_value_type() {
        assert_eq!(categories("let var x := 1 in x := 2 end"), vec![]);
        assert_eq!(
            categories("let var x := 1 in x := \"two\" end"),
            vec![DiagnosticCategory::TypeMismatch]
        );
    }
}
