//! Table shape detection and raw row extraction.
//!
//! Tables are markdown-ish text in one of two shapes:
//!
//! - a list, one entry per `1. `, `* `, `- ` or `– ` item, where unprefixed
//!   lines continue the previous entry;
//! - a two-column pipe table, `| roll | result |`, whose first column holds a
//!   number, a range, or (on the header row) a dice expression.

use std::sync::LazyLock;

use regex::Regex;

/// How many lines are inspected before giving up on detection.
pub const DETECTION_WINDOW: usize = 5;

/// Identifies a line as a list item, ie. `1. `, `* `, `- ` or `– `.
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\. |\* |- |– )").expect("valid list item pattern"));

/// The shape of a table's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Bullet or numbered list, each entry equally likely.
    List,
    /// Two-column pipe table keyed by roll ranges.
    RangeTable,
}

/// One row of a range table, before its roll column is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRow {
    /// The raw first column, eg. `" 1-3 "` or `" 2d6 "`.
    pub range: String,
    /// The raw second column.
    pub text: String,
}

impl RangeRow {
    /// Create a row from its two columns.
    pub fn new(range: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            text: text.into(),
        }
    }
}

/// Returns true if the line starts with a list item prefix.
pub fn is_list_item(line: &str) -> bool {
    LIST_ITEM.is_match(line)
}

/// Strip the list item prefix, or `None` if the line isn't a list item.
pub fn strip_list_prefix(line: &str) -> Option<&str> {
    LIST_ITEM.find(line).map(|m| &line[m.end()..])
}

/// Returns true if the line is a two-column pipe table row.
pub fn is_range_row(line: &str) -> bool {
    table_cells(line).is_some_and(|cells| cells.len() == 2)
}

/// Split a line on unescaped pipes. Escaped pipes (`\|`) stay in the
/// segment text as a plain `|`.
fn split_segments(line: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

/// The cells of a pipe table row, or `None` if the line doesn't start and
/// end with a delimiter.
fn table_cells(line: &str) -> Option<Vec<String>> {
    let mut segments = split_segments(line.trim());
    if segments.len() < 3 {
        return None;
    }
    let last = segments.pop()?;
    if !segments[0].is_empty() || !last.is_empty() {
        return None;
    }
    segments.remove(0);
    Some(segments)
}

/// Decide the table format from the first [`DETECTION_WINDOW`] lines.
///
/// Returns the format and the index of the first line that matched it, or
/// `None` if no line in the window looks like a table.
pub fn detect_format<S: AsRef<str>>(lines: &[S]) -> Option<(TableFormat, usize)> {
    lines
        .iter()
        .take(DETECTION_WINDOW)
        .enumerate()
        .find_map(|(i, line)| {
            let line = line.as_ref();
            if is_list_item(line) {
                Some((TableFormat::List, i))
            } else if is_range_row(line) {
                Some((TableFormat::RangeTable, i))
            } else {
                None
            }
        })
}

/// Collect list entries. Unprefixed, non-blank lines continue the previous
/// entry; blank lines and anything before the first item are ignored.
pub fn extract_list<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in lines {
        let line = line.as_ref().trim_end();
        if let Some(item) = strip_list_prefix(line) {
            entries.push(item.trim().to_string());
        } else if !line.trim().is_empty() {
            if let Some(current) = entries.last_mut() {
                current.push('\n');
                current.push_str(line.trim());
            }
        }
    }
    entries
}

/// Collect the first two columns of every pipe-delimited line. Extra
/// columns are dropped, so a pipe inside outcome text must be escaped.
pub fn extract_range_rows<S: AsRef<str>>(lines: &[S]) -> Vec<RangeRow> {
    lines
        .iter()
        .filter_map(|line| {
            let line: &str = line.as_ref();
            let cells = table_cells(line)?;
            if cells.len() > 2 {
                tracing::debug!(
                    line,
                    cells = cells.len(),
                    "dropping columns past the second; unescaped pipe?"
                );
            }
            Some(cells)
        })
        .filter_map(|cells| {
            let mut cells = cells.into_iter();
            let range = cells.next()?;
            let text = cells.next()?;
            Some(RangeRow { range, text })
        })
        .collect()
}
