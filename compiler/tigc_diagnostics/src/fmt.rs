//! Rendering of the source window below a diagnostic message.

use ansi_term::{Color, Style};
use line_span::LineSpanExt;
use tigc_utils::span::Span;

use crate::Severity;

/// Paint `text` with `style` when colors are enabled
fn paint(colored: bool, style: Style, text: String) -> String {
    if colored {
        style.paint(text).to_string()
    } else {
        text
    }
}

/// Format and display the 'source window' -- the lines of span within str with
/// the underline where the span lies.
///
/// An empty span (such as the end of file) underlines the single character at
/// its position, or the end of the last line if it lies past all of them.
pub fn display_source_window(
    severity: Severity,
    span: Span,
    source: &str,
    colored: bool,
) -> String {
    let target = if span.start() == span.end() {
        Span::from_positions(span.start(), span.start() + 1)
    } else {
        span
    };

    // A line is shown if the half-open range it occupies, line terminator
    // included, overlaps the target.
    let mut lines = source
        .line_spans()
        .enumerate()
        .filter_map(|(n, line)| {
            Span::intersect(Span::from_positions(line.start(), line.ending()), target)
                .filter(|overlap| overlap.start() < overlap.end())
                .map(|overlap| (n + 1, line, overlap))
        })
        .map(|(n, line, overlap)| {
            let start = overlap.start() - line.start();
            let end = std::cmp::min(overlap.end(), line.end()).saturating_sub(line.start());
            (n, &source[line.start()..line.end()], (start, std::cmp::max(end, start + 1)))
        })
        .collect::<Vec<_>>();

    if lines.is_empty() {
        // Past the end of the input. Point just after the last line.
        let Some((n, line)) = source.line_spans().enumerate().last() else {
            return String::new();
        };
        let len = line.end() - line.start();
        lines.push((n + 1, &source[line.start()..line.end()], (len, len + 1)));
    }

    let max_line_number_length = lines
        .iter()
        .map(|(line, _, _)| line.to_string().len())
        .max()
        .unwrap_or(0)
        + 1;

    // Display format:
    // line | CODE CODE CODE CODE
    //      |      ^^^^
    lines
        .into_iter()
        .map(|(line_number, string, (start, end))| {
            format!(
                "{} {string}\n{} {} {}",
                paint(
                    colored,
                    Color::Blue.bold(),
                    format!("{line_number: >max_line_number_length$} |")
                ),
                " ".repeat(max_line_number_length),
                paint(colored, Color::Blue.bold(), "|".to_string()),
                paint(
                    colored,
                    severity.style(),
                    format!("{}{}", " ".repeat(start), "^".repeat(end - start))
                )
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
