//! for declarations
//!
//! Declarations are handled a group at a time, a group being a run of
//! consecutive declarations of the same kind. Type and function groups are
//! processed in two passes: all headers are bound first, so that the members
//! of a group may refer to each other, and then the bodies are checked.

use std::collections::HashSet;

use indexmap::IndexMap;
use tigc_diagnostics::{DiagnosticKind, SpanExt, SpannedExt};
use tigc_parser::ast::{
    dec::{Declaration, DeclarationKind},
    expr::Expr,
    ty::{Ty, TyKind, TypeField},
};
use tigc_utils::span::{Spannable, Spanned};

use super::{ScopeGuard, Semant};
use crate::{
    env::{Entry, FunEntry},
    types::{ResolveError, TypeId},
};

/// The parts of a function declaration
type FunctionParts<'d, 'input> = (
    Spanned<&'input str>,
    &'d [Spanned<TypeField<'input>>],
    Option<Spanned<&'input str>>,
    &'d Expr<'input>,
);

impl<'input> Semant<'_, 'input> {
    /// Check a group of consecutive declarations of the same kind and bind
    /// them in the current scope
    pub(super) fn check_declaration_group(&mut self, group: &[Declaration<'input>]) {
        let Some(first) = group.first() else {
            return;
        };

        match first.0.value() {
            DeclarationKind::Var { .. } => {
                tracing::debug!(size = group.len(), "checking variable declarations");
                for dec in group {
                    if let DeclarationKind::Var { name, ty, init } = dec.0.value() {
                        self.check_var_declaration(*name, *ty, init);
                    }
                }
            }
            DeclarationKind::Type { .. } => {
                tracing::debug!(size = group.len(), "checking type declaration group");
                let decs = group
                    .iter()
                    .filter_map(|dec| match dec.0.value() {
                        DeclarationKind::Type { name, ty } => Some((*name, ty)),
                        _ => None,
                    })
                    .collect::<Vec<_>>();
                self.check_type_group(&decs);
            }
            DeclarationKind::Function { .. } => {
                tracing::debug!(size = group.len(), "checking function declaration group");
                let decs = group
                    .iter()
                    .filter_map(|dec| match dec.0.value() {
                        DeclarationKind::Function {
                            name,
                            params,
                            result,
                            body,
                        } => Some((*name, params.as_slice(), *result, body)),
                        _ => None,
                    })
                    .collect::<Vec<_>>();
                self.check_function_group(&decs);
            }
        }
    }

    /// Find a type by name, reporting if it does not exist
    pub(super) fn lookup_type(&self, name: Spanned<&'input str>) -> Option<TypeId> {
        let ty = self.env.types.get(name.value()).copied();
        if ty.is_none() {
            self.report(name.error(|name| DiagnosticKind::UndeclaredType(name.to_string())));
        }
        ty
    }

    /// Check `var name: ty := init` and bind `name`
    fn check_var_declaration(
        &mut self,
        name: Spanned<&'input str>,
        ty: Option<Spanned<&'input str>>,
        init: &Expr<'input>,
    ) {
        let init_ty = self.check_expr(init).ty;

        let declared = match ty {
            Some(ty) => {
                let declared = self.lookup_type(ty).unwrap_or(TypeId::ERROR);
                if !self.arena.coerce_to(init_ty, declared) {
                    self.report(init.0.span().error(DiagnosticKind::InitializerTypeMismatch {
                        expected: self.display(declared),
                        got: self.display(init_ty),
                    }));
                }
                declared
            }
            None => {
                if self.arena.actual(init_ty) == TypeId::NIL {
                    self.report(init.0.span().error(DiagnosticKind::NilRequiresRecordType));
                    TypeId::ERROR
                } else {
                    init_ty
                }
            }
        };

        self.env.values.put(name.into_value(), Entry::Var(declared));
    }

    /// Resolve a type expression, creating new types for record and array
    /// types
    fn resolve_ty(&mut self, ty: &Ty<'input>) -> TypeId {
        match ty.0.value() {
            TyKind::Name(name) => self
                .lookup_type((*name).in_span(ty.0.span()))
                .unwrap_or(TypeId::ERROR),
            TyKind::Array(element) => {
                let element = self.lookup_type(*element).unwrap_or(TypeId::ERROR);
                self.arena.new_array(element)
            }
            TyKind::Record(fields) => {
                let mut resolved = IndexMap::with_capacity(fields.len());
                for field in fields {
                    let field = field.value();
                    let field_ty = self.resolve_ty(&field.ty);
                    if resolved.contains_key(field.name.value()) {
                        self.report(
                            field
                                .name
                                .error(|name| DiagnosticKind::DuplicateField(name.to_string())),
                        );
                    } else {
                        resolved.insert(field.name.into_value(), field_ty);
                    }
                }
                self.arena.new_record(resolved)
            }
        }
    }

    /// Check a group of type declarations
    fn check_type_group(&mut self, decs: &[(Spanned<&'input str>, &Ty<'input>)]) {
        let mut seen = HashSet::new();
        let headers = decs
            .iter()
            .map(|(name, _)| {
                if !seen.insert(*name.value()) {
                    self.report(name.error(|name| DiagnosticKind::DuplicateType(name.to_string())));
                }
                let header = self.arena.new_name(name.into_value());
                self.env.types.put(name.into_value(), header);
                header
            })
            .collect::<Vec<_>>();

        for ((_, ty), header) in decs.iter().zip(&headers) {
            let resolved = self.resolve_ty(ty);
            self.arena.bind(*header, resolved);
        }

        for ((name, _), header) in decs.iter().zip(&headers) {
            if self.arena.try_actual(*header) == Err(ResolveError::Cycle) {
                self.report(name.error(|name| DiagnosticKind::IllegalTypeCycle(name.to_string())));
            }
        }
    }

    /// Resolve the signature of a function
    fn resolve_signature(
        &self,
        params: &[Spanned<TypeField<'input>>],
        result: Option<Spanned<&'input str>>,
    ) -> FunEntry<'input> {
        let mut seen = HashSet::new();
        let mut formals = Vec::with_capacity(params.len());
        for param in params {
            let TypeField { name, ty } = *param.value();
            if !seen.insert(name.into_value()) {
                self.report(
                    name.error(|name| DiagnosticKind::DuplicateParameter(name.to_string())),
                );
            }
            formals.push((
                name.into_value(),
                self.lookup_type(ty).unwrap_or(TypeId::ERROR),
            ));
        }

        let result = result.map_or(TypeId::VOID, |result| {
            self.lookup_type(result).unwrap_or(TypeId::ERROR)
        });

        FunEntry { formals, result }
    }

    /// Check a group of function declarations
    fn check_function_group(&mut self, decs: &[FunctionParts<'_, 'input>]) {
        let mut seen = HashSet::new();
        let signatures = decs
            .iter()
            .map(|(name, params, result, _)| {
                if !seen.insert(*name.value()) {
                    self.report(
                        name.error(|name| DiagnosticKind::DuplicateFunction(name.to_string())),
                    );
                }
                let signature = self.resolve_signature(params, *result);
                self.env
                    .values
                    .put(name.into_value(), Entry::Fun(signature.clone()));
                signature
            })
            .collect::<Vec<_>>();

        for ((name, _, _, body), signature) in decs.iter().zip(signatures) {
            tracing::trace!(function = *name.value(), "checking function body");

            let mut scope = ScopeGuard::values(self);
            for (param, ty) in &signature.formals {
                scope.env.values.put(*param, Entry::Var(*ty));
            }

            let enclosing_loops = std::mem::replace(&mut scope.loop_depth, 0);
            let body_ty = scope.check_expr(body).ty;
            scope.loop_depth = enclosing_loops;

            if !scope.arena.coerce_to(body_ty, signature.result) {
                scope.report(body.0.span().error(DiagnosticKind::ResultTypeMismatch {
                    expected: scope.display(signature.result),
                    got: scope.display(body_ty),
                }));
            }
        }
    }
}
