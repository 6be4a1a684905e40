//! tigc compiler driver
//!
//! Runs the parser and then the semantic checker over one source file, and
//! renders whatever output was asked for.

use tigc_diagnostics::{Diagnostic, DiagnosticCollector};
use tigc_semant::{check_program, CheckedProgram};
use tigc_utils::line_finder::LineLookup;

use crate::cli::OutputFormat;

/// Drive the compilation process.
///
/// AST output is produced as soon as the program parses. Every other format
/// requires the program to check without errors.
///
/// # Errors
/// Returns every diagnostic found if the program fails to parse or check.
pub fn compile(emit: OutputFormat, content: &str) -> Result<String, Vec<Diagnostic>> {
    // === PARSER ===
    let ast = tigc_parser::parser::parse_program(content).map_err(|diagnostic| vec![diagnostic])?;
    tracing::debug!("program parsed");

    match emit {
        OutputFormat::Ast => return Ok(ast.to_string()),
        OutputFormat::AstDebug => return Ok(format!("{ast:?}")),
        OutputFormat::AstDebugPretty => return Ok(format!("{ast:#?}")),
        OutputFormat::Diagnostics | OutputFormat::Types => {}
    }

    // === SEMANTIC ANALYSIS ===
    let collector = DiagnosticCollector::new();
    let checked = check_program(&ast, &collector);
    if !collector.is_empty() {
        return Err(collector.into_diagnostics());
    }

    Ok(match emit {
        OutputFormat::Types => render_types(content, &checked),
        OutputFormat::Diagnostics
        | OutputFormat::Ast
        | OutputFormat::AstDebug
        | OutputFormat::AstDebugPretty => String::new(),
    })
}

/// List the type of every checked node, outermost first, one per line
fn render_types(content: &str, checked: &CheckedProgram<'_>) -> String {
    let lines = LineLookup::new(content);

    let mut annotations = checked.annotations.iter().collect::<Vec<_>>();
    annotations.sort_by_key(|(span, _)| (span.start(), std::cmp::Reverse(span.end())));
    annotations.dedup_by_key(|(span, _)| *span);

    annotations
        .into_iter()
        .map(|(span, ty)| {
            let mut source_lines = content[span.range()].lines();
            let first = source_lines.next().unwrap_or_default();
            let more = if source_lines.next().is_some() { " ..." } else { "" };

            format!(
                "{}-{} {} | {first}{more}",
                lines.lookup_from_index(span.start()),
                lines.lookup_from_index(span.end()),
                checked.arena.display(*ty),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
