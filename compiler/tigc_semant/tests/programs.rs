use indoc::indoc;
use tigc_diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticCollector};
use tigc_parser::parser::parse_program;
use tigc_semant::{check_program, types::TypeId};
use tigc_utils::span::Span;

/// Parse and check a program, returning its type and diagnostics
fn check(source: &str) -> (TypeId, Vec<Diagnostic>) {
    let program = parse_program(source).expect("test case should have parsed correctly");
    let collector = DiagnosticCollector::new();
    let checked = check_program(&program, &collector);
    (checked.ty, collector.into_diagnostics())
}

/// The categories of the diagnostics reported for a program
fn categories(source: &str) -> Vec<DiagnosticCategory> {
    check(source).1.iter().map(Diagnostic::category).collect()
}

/// The span of the first occurrence of `needle` in `source`
fn span_of(source: &str, needle: &str) -> Span {
    let start = source.find(needle).expect("needle should be in the source");
    Span::from_positions(start, start + needle.len())
}

#[test]
fn literals_check_to_primitive_types() {
    assert_eq!(check("42"), (TypeId::INT, vec![]));
    assert_eq!(check("\"forty two\""), (TypeId::STRING, vec![]));
    assert_eq!(check("nil"), (TypeId::NIL, vec![]));
}

#[test]
fn arithmetic_with_two_bad_operands_reports_each_operand() {
    let source = "\"left\" * nil";
    let (ty, diagnostics) = check(source);

    assert_eq!(ty, TypeId::INT);
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .all(|diagnostic| diagnostic.category() == DiagnosticCategory::TypeMismatch));
    assert_eq!(diagnostics[0].span(), span_of(source, "\"left\""));
    assert_eq!(diagnostics[1].span(), span_of(source, "nil"));
}

#[test]
fn nil_is_only_accepted_where_a_record_is_expected() {
    assert_eq!(
        categories("let type r = {x: int} var v: r := nil in end"),
        vec![]
    );
    assert_eq!(
        categories("let type a = array of int var v: a := nil in end"),
        vec![DiagnosticCategory::TypeMismatch]
    );
    assert_eq!(
        categories("let var v: int := nil in end"),
        vec![DiagnosticCategory::TypeMismatch]
    );
}

#[test]
fn identical_record_declarations_are_distinct_types() {
    let source = indoc! {"
        let
            type a = {x: int}
            type b = {x: int}
            var v: a := b {x = 1}
        in
        end
    "};
    assert_eq!(categories(source), vec![DiagnosticCategory::TypeMismatch]);
}

#[test]
fn type_cycles_must_pass_through_a_record_or_array() {
    assert!(categories("let type A = B type B = A in 0 end")
        .contains(&DiagnosticCategory::IllegalCycle));
    assert!(categories("let type a = b type b = a in 0 end")
        .contains(&DiagnosticCategory::IllegalCycle));
    assert_eq!(
        categories("let type A = {next: B} type B = A in 0 end"),
        vec![]
    );
    assert_eq!(
        categories("let type A = array of B type B = A in 0 end"),
        vec![]
    );
}

#[test]
fn mutually_recursive_functions_check_cleanly() {
    let source = indoc! {"
        let
            function F(n: int): int = if n > 0 then G(n - 1) else 0
            function G(n: int): int = if n > 0 then F(n - 1) else 1
        in
            F(5)
        end
    "};
    assert_eq!(check(source), (TypeId::INT, vec![]));
}

#[test]
fn assigning_a_loop_index_is_reported_once_at_the_assignment() {
    let source = "for i := 0 to 10 do i := i + 1";
    let (_, diagnostics) = check(source);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category(), DiagnosticCategory::IllegalMutation);
    assert_eq!(diagnostics[0].span().start(), source.find("i := i").expect("assignment"));
}

#[test]
fn surplus_arguments_are_reported_at_the_argument() {
    let source = "let function f(a: int, b: int) = () in f(1, 2, 3) end";
    let (_, diagnostics) = check(source);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category(), DiagnosticCategory::ArityMismatch);
    assert_eq!(diagnostics[0].span(), span_of(source, "3"));
}

#[test]
fn missing_arguments_are_reported_at_the_call() {
    let source = "let function f(a: int, b: int) = () in f(1) end";
    let (_, diagnostics) = check(source);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category(), DiagnosticCategory::ArityMismatch);
    assert_eq!(diagnostics[0].span(), span_of(source, "f(1)"));
    assert_eq!(
        diagnostics[0].to_string(),
        "error: missing argument for `b`"
    );
}

#[test]
fn trees_of_arrays_check_cleanly() {
    assert_eq!(
        check("let type tree = {key: int, children: array of tree} in 0 end"),
        (TypeId::INT, vec![])
    );
}

#[test]
fn checking_continues_after_errors() {
    let source = indoc! {"
        let
            var a := undefined
            var b: string := 3
        in
            break;
            a := nope(1)
        end
    "};
    assert_eq!(
        categories(source),
        vec![
            DiagnosticCategory::UndeclaredIdentifier,
            DiagnosticCategory::TypeMismatch,
            DiagnosticCategory::IllegalControl,
            DiagnosticCategory::UndeclaredIdentifier,
        ]
    );
}

#[test]
fn one_mistake_is_reported_once() {
    let source = indoc! {"
        let
            var n := missing
            function f(x: int): unknown = x
        in
            n + f(n) * 2;
            n.field := n[1];
            if n < 3 then f(1) else g(2)
        end
    "};
    assert_eq!(
        categories(source),
        vec![
            DiagnosticCategory::UndeclaredIdentifier,
            DiagnosticCategory::UndeclaredIdentifier,
            DiagnosticCategory::UndeclaredIdentifier,
        ]
    );
}

#[test]
fn larger_program_checks_cleanly() {
    let source = indoc! {"
        let
            type intlist = {head: int, tail: intlist}
            type intarray = array of int

            var n := 8
            var row := intarray [n] of 0

            function length(l: intlist): int =
                if l = nil then 0 else 1 + length(l.tail)

            function sum(a: intarray, size: int): int =
                let
                    var total := 0
                in
                    for i := 0 to size - 1 do
                        total := total + a[i];
                    total
                end

            function cons(x: int, l: intlist): intlist = intlist {head = x, tail = l}
        in
            row[0] := length(cons(1, cons(2, nil)));
            sum(row, n)
        end
    "};
    assert_eq!(check(source), (TypeId::INT, vec![]));
}

#[test]
fn diagnostics_render_against_the_source() {
    let source = "for i := 0 to 3 do i := 5";
    let (_, diagnostics) = check(source);
    let rendered = diagnostics
        .iter()
        .map(|diagnostic| diagnostic.print_plain(source))
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(rendered, @r"
error: assignment to loop index `i`
--> 1:20
 1 | for i := 0 to 3 do i := 5
   |                    ^
");
}
