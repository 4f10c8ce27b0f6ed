//! Marks table codec
//!
//! The persisted record of a rubric is a single pipe table:
//!
//! ```text
//! | cid | dt1 | dt2 |
//! | -- | -- | -- |
//! | a. | 3 | - |
//! | b. | 2 | 4 |
//! | avg. | 2.5 | 4.0 |
//! | comments | tidy code |  |
//! ```
//!
//! Band rows are sorted by name; `-` marks a task without that band. The
//! `avg.` row is derived and ignored on read.

mod parse;
mod render;

use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::rubric::Rubric;

pub use parse::{parse, IssueKind, ParseIssue, ParseReport};
pub use render::serialize;

pub(crate) const ROW_MARKER: char = '|';
pub(crate) const HEADER_KEY: &str = "cid";
pub(crate) const AVG_KEY: &str = "avg.";
pub(crate) const COMMENTS_KEY: &str = "comments";
pub(crate) const MISSING: &str = "-";
pub(crate) const ALIGNMENT: &str = "--";
const LINE_BREAK: &str = "<br>";

static ALIGNMENT_CELL: OnceLock<Option<Regex>> = OnceLock::new();

/// Whether `text` is exactly the table the rubric would write, and reading it
/// into a fresh copy of the rubric's template reproduces the rubric.
///
/// A `false` result means the persisted file is out of date. Nothing is
/// repaired.
pub fn compare(rubric: &Rubric, text: &str) -> Result<bool> {
    let mut fresh = rubric.fresh()?;
    let report = parse(&mut fresh, text);
    let same_text = serialize(&fresh)? == text;
    let same_state = fresh == *rubric;
    tracing::debug!(
        same_text,
        same_state,
        issues = report.issues.len(),
        "compared marks table"
    );
    Ok(same_text && same_state)
}

/// Make free text safe to place in a single cell
pub(crate) fn escape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        match c {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            // A literal line-break tag must not read back as a newline
            '<' if text[i..].starts_with(LINE_BREAK) => out.push_str("\\<"),
            '\n' => out.push_str(LINE_BREAK),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn unescape_cell(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    let mut rest = cell;
    while let Some(c) = rest.chars().next() {
        if c == '\\' {
            let mut tail = rest[1..].chars();
            if let Some(escaped) = tail.next() {
                out.push(escaped);
                rest = tail.as_str();
                continue;
            }
        } else if rest.starts_with(LINE_BREAK) {
            out.push('\n');
            rest = &rest[LINE_BREAK.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Split a table row into trimmed, unescaped cells.
///
/// Returns `None` for a line that is not a table row. Empty cells keep their
/// position.
pub(crate) fn split_row(line: &str) -> Option<Vec<String>> {
    let body = line.trim().strip_prefix(ROW_MARKER)?;

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ROW_MARKER => cells.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    // Text after the closing marker is only kept when there is no closing marker
    if !current.trim().is_empty() {
        cells.push(current);
    }

    Some(cells.iter().map(|c| unescape_cell(c.trim())).collect())
}

/// Separator row under the header, e.g. `| -- | :---: |`
pub(crate) fn is_alignment_row(cells: &[String]) -> bool {
    let pattern = ALIGNMENT_CELL.get_or_init(|| match Regex::new(r"^:?-+:?$") {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to compile alignment regex");
            None
        }
    });
    let Some(pattern) = pattern else {
        return false;
    };
    !cells.is_empty() && cells.iter().all(|c| pattern.is_match(c))
}
