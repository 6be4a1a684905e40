//! Abstract Syntax Tree representation
//!
//! This module contains the AST emitted by the parser. A program is a single
//! [`expr::Expr`]; declarations ([`dec::Declaration`]) only appear inside a
//! `let` expression, and type expressions ([`ty::Ty`]) only appear on the
//! right hand side of a type declaration.
//!
//! Every node carries the [`Span`](tigc_utils::span::Span) of source it was
//! parsed from, and every node implements [`Display`](std::fmt::Display) to
//! print itself back as source text.

pub mod dec;
pub mod expr;
pub mod ty;

#[cfg(test)]
mod tests {
    use indoc::indoc;

    #[test]
    fn program_display_works() {
        let input = indoc! {r#"
            let type list = {head: int, tail: list}
                function len(l: list): int =
                    if l = nil then 0 else 1 + len(l.tail)
                var xs := list {head = 1, tail = nil}
            in len(xs); print("done\n") end"#};

        let expected = indoc! {r#"
            let
                type list = {head: int, tail: list}
                function len(l: list): int = if (l = nil) then 0 else (1 + len(l.tail))
                var xs := list {head = 1, tail = nil}
            in
                len(xs);
                print("done\n")
            end"#};

        let program =
            crate::parser::parse_program(input).expect("test case should have parsed correctly");

        assert_eq!(program.to_string(), expected);
    }
}
