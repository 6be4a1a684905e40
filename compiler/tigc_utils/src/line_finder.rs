//! Tools for looking up the [`LineAndCol`] of some location in a source file

use std::{cmp::Ordering, fmt::Display};

/// Wrapper around a line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAndCol {
    /// The 1-indexed line number
    pub line: u32,
    /// The 1-indexed column number
    pub col: u32,
}
impl Display for LineAndCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Simple tool to lookup the line and column of a location in the source file
#[derive(Debug)]
pub struct LineLookup {
    /// The spans of each line in the input, as inclusive `(start, end)` byte
    /// offsets. The end offset is the position of the line terminator.
    line_spans: Vec<(usize, usize)>,
}

impl LineLookup {
    /// Creates a new [`LineLookup`] over a string
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut line_start = 0;
        let mut line_spans = vec![];
        for line in input.split('\n') {
            let line_end = line_start + line.len() + "\n".len();
            line_spans.push((line_start, line_end - 1));
            line_start = line_end;
        }

        Self { line_spans }
    }

    /// Look up the `1`-indexed line and column from a byte offset in the
    /// string
    ///
    /// # Panics
    /// Panics if the offset lies past the end of the input or there are more
    /// than [`u32::MAX`] lines or columns in the input
    #[must_use]
    pub fn lookup_from_index(&self, index: usize) -> LineAndCol {
        let line = self
            .line_spans
            .binary_search_by(|(line_start, line_end)| {
                if *line_end < index {
                    return Ordering::Less;
                }
                if *line_start > index {
                    return Ordering::Greater;
                }

                Ordering::Equal
            })
            .expect("line should be present");

        LineAndCol {
            line: u32::try_from(line)
                .expect("there should probably never be more than u32::MAX lines in a file")
                + 1,
            col: u32::try_from(index - self.line_spans[line].0)
                .expect("there should probably never be more than u32::MAX columns in a line")
                + 1,
        }
    }
}
