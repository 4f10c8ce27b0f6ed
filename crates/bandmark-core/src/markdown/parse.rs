use std::fmt;

use serde::Serialize;

use super::{is_alignment_row, split_row, HEADER_KEY, MISSING};
use crate::rubric::{Marks, Rubric};

/// What was wrong with a skipped part of a marks table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A whole row (or the table itself) could not be used
    Row,
    /// A single cell was skipped; the rest of its row still applied
    Cell,
}

/// A row or cell that `parse` skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    /// 1-based line number, 0 when the issue concerns the whole text
    pub line: usize,
    pub kind: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub reason: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            IssueKind::Row => "row",
            IssueKind::Cell => "cell",
        };
        write!(f, "line {}: {}", self.line, kind)?;
        if let Some(column) = &self.column {
            write!(f, " [{column}]")?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Outcome of reading a marks table into a rubric
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseReport {
    /// Marks and comments written to the rubric
    pub applied: usize,
    pub issues: Vec<ParseIssue>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn skip(
        &mut self,
        line: usize,
        kind: IssueKind,
        column: Option<&str>,
        reason: impl Into<String>,
    ) {
        let issue = ParseIssue {
            line,
            kind,
            column: column.map(str::to_string),
            reason: reason.into(),
        };
        tracing::warn!(%issue, "skipped marks table entry");
        self.issues.push(issue);
    }
}

/// A mark read from a band row, waiting to be applied
struct PendingMark {
    line: usize,
    task: usize,
    band: String,
    mark: Marks,
}

/// Apply a marks table to `rubric`.
///
/// Unreadable rows and cells are skipped and reported; parsing always runs
/// to the end of the table. Band rows are applied leaves first, then
/// composites from the deepest up, whatever their order in the text.
pub fn parse(rubric: &mut Rubric, text: &str) -> ParseReport {
    let mut report = ParseReport::default();

    let mut rows = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, split_row(line)));

    let header = rows.by_ref().find_map(|(line, cells)| {
        cells
            .filter(|c| c.first().is_some_and(|k| k.eq_ignore_ascii_case(HEADER_KEY)))
            .map(|c| (line, c))
    });
    let Some((header_line, header)) = header else {
        report.skip(0, IssueKind::Row, None, "no table with a cid header");
        return report;
    };

    // Column i + 1 of every row belongs to columns[i]
    let columns: Vec<Option<usize>> = header[1..]
        .iter()
        .map(|name| {
            let task = rubric.tasks.iter().position(|t| &t.name == name);
            if task.is_none() {
                report.skip(header_line, IssueKind::Cell, Some(name.as_str()), "unknown task");
            }
            task
        })
        .collect();

    let mut pending = Vec::new();
    let mut first = true;
    for (line, cells) in rows {
        let Some(cells) = cells else {
            break;
        };
        if std::mem::take(&mut first) && is_alignment_row(&cells) {
            continue;
        }

        let key = cells.first().map(|k| k.to_lowercase()).unwrap_or_default();
        if key.is_empty() {
            report.skip(line, IssueKind::Row, None, "row has no key");
            continue;
        }
        if key.starts_with("avg") {
            continue;
        }
        let is_comment = key.starts_with("comment");
        let band = cells[0].strip_suffix('.').unwrap_or(&cells[0]);

        for (i, cell) in cells.iter().enumerate().skip(1) {
            let Some(column) = columns.get(i - 1) else {
                report.skip(line, IssueKind::Cell, None, format!("column {} has no task", i + 1));
                continue;
            };
            let Some(task) = *column else {
                continue;
            };

            if is_comment {
                rubric.tasks[task].update_comment(cell);
                report.applied += 1;
                continue;
            }
            if cell == MISSING {
                continue;
            }
            match cell.parse::<Marks>() {
                Ok(mark) => pending.push(PendingMark {
                    line,
                    task,
                    band: band.to_string(),
                    mark,
                }),
                Err(_) => report.skip(
                    line,
                    IssueKind::Cell,
                    Some(rubric.tasks[task].name.as_str()),
                    format!("{cell:?} is not a mark"),
                ),
            }
        }
    }

    pending.sort_by_cached_key(|p| rubric.tasks[p.task].reconcile_rank(&p.band));
    for p in pending {
        let task = &mut rubric.tasks[p.task];
        match task.reconcile_mark(&p.band, p.mark) {
            Ok(()) => report.applied += 1,
            Err(e) => {
                report.skip(p.line, IssueKind::Cell, Some(task.name.as_str()), e.to_string());
            }
        }
    }

    tracing::debug!(
        applied = report.applied,
        issues = report.issues.len(),
        "parsed marks table"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{compare, serialize};
    use crate::template::RubricTemplate;
    use std::sync::Arc;

    const TEMPLATE: &str = r#"
year: 2024
semester: 1
stage: pf
tasks:
  - name: dt1
    bands:
      - name: a
        requirements:
          - direct: nothing
          - defer: up
          - direct: some
          - direct: most
      - name: b
        requirements: [{direct: x}, {direct: y}, {direct: z}]
  - name: dt2
    bands:
      - name: design
        best_of:
          - name: layout
            requirements: [{direct: x}, {direct: y}, {direct: z}]
          - name: naming
            requirements: [{direct: x}, {direct: y}, {direct: z}]
      - name: code
        sum:
          - name: style
            requirements: [{direct: x}, {direct: y}]
          - name: tests
            requirements: [{direct: x}, {direct: y}]
"#;

    fn rubric() -> Rubric {
        let template = RubricTemplate::from_yaml(TEMPLATE).unwrap();
        Rubric::from_template(Arc::new(template)).unwrap()
    }

    fn marks(rubric: &Rubric, task: &str) -> std::collections::BTreeMap<String, Marks> {
        rubric.task(task).unwrap().marks_by_band().unwrap()
    }

    #[test]
    fn test_parse_applies_marks_and_comments() {
        let mut rubric = rubric();
        let report = parse(
            &mut rubric,
            "| cid | dt1 | dt2 |\n\
             | -- | -- | -- |\n\
             | a. | 2 | - |\n\
             | b. | 1 | - |\n\
             | layout. | - | 2 |\n\
             | naming. | - | 1 |\n\
             | avg. | 99 | 99 |\n\
             | comments | good<br>work | needs \\| tests |\n",
        );

        assert!(report.is_clean(), "{:?}", report.issues);
        let dt1 = marks(&rubric, "dt1");
        assert_eq!(dt1["a"], 2);
        assert_eq!(dt1["b"], 1);
        assert_eq!(marks(&rubric, "dt2")["design"], 1);
        assert_eq!(rubric.task("dt1").unwrap().comment, "good\nwork");
        assert_eq!(rubric.task("dt2").unwrap().comment, "needs | tests");
    }

    #[test]
    fn test_malformed_cell_does_not_stop_parse() {
        let mut rubric = rubric();
        let report = parse(
            &mut rubric,
            "| cid | dt1 | dt2 |\n\
             | -- | -- | -- |\n\
             | a. | lots | 2 |\n\
             | b. | 2 | - |\n\
             | style. | - | 1 |\n",
        );

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::Cell);
        assert_eq!(report.issues[0].line, 3);
        assert_eq!(report.issues[0].column.as_deref(), Some("dt1"));

        assert_eq!(marks(&rubric, "dt1")["a"], 0);
        assert_eq!(marks(&rubric, "dt1")["b"], 2);
        assert_eq!(marks(&rubric, "dt2")["style"], 1);
        // `a` exists in dt1 only; dt2 gains it as a detached band
        assert_eq!(marks(&rubric, "dt2")["a"], 2);
    }

    #[test]
    fn test_mark_no_requirement_awards_is_reported() {
        let mut rubric = rubric();
        let report = parse(&mut rubric, "| cid | dt1 |\n| -- | -- |\n| a. | 1 |\n");
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].reason.contains("awards 1 marks"));
        assert_eq!(marks(&rubric, "dt1")["a"], 0);
    }

    #[test]
    fn test_no_header_is_a_noop() {
        let mut rubric = rubric();
        let before = rubric.clone();
        let report = parse(&mut rubric, "# marks\n\nnothing here\n");
        assert_eq!(report.applied, 0);
        assert_eq!(report.issues[0].kind, IssueKind::Row);
        assert_eq!(rubric, before);
    }

    #[test]
    fn test_table_ends_at_first_non_row() {
        let mut rubric = rubric();
        parse(
            &mut rubric,
            "intro\n| CID | dt1 |\n|---|---|\n| b. | 1 |\n\n| b. | 2 |\n",
        );
        assert_eq!(marks(&rubric, "dt1")["b"], 1);
    }

    #[test]
    fn test_unknown_task_column_is_skipped() {
        let mut rubric = rubric();
        let report = parse(
            &mut rubric,
            "| cid | mylib | dt1 |\n| -- | -- | -- |\n| b. | 2 | 2 | 7 |\n",
        );
        assert_eq!(marks(&rubric, "dt1")["b"], 2);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.issues[0].column.as_deref(), Some("mylib"));
    }

    #[test]
    fn test_composite_rows_override_only_on_disagreement() {
        let mut rubric = rubric();
        let report = parse(
            &mut rubric,
            "| cid | dt2 |\n| -- | -- |\n| code. | 1 |\n| style. | 1 |\n| design. | 2 |\n",
        );
        assert!(report.is_clean());
        let dt2 = marks(&rubric, "dt2");
        // children already sum to 1: no override kept
        assert_eq!(dt2["code"], 1);
        assert_eq!(dt2["design"], 2);
        assert_eq!(dt2["layout"], 0);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let mut rubric = rubric();
        rubric.select("dt1", "a", 1).unwrap();
        rubric.update_mark("dt2", "naming", 2).unwrap();
        rubric.update_mark("dt2", "code", 5).unwrap();
        rubric.update_comment("dt2", "see | notes\nbelow").unwrap();

        let text = serialize(&rubric).unwrap();
        let total = rubric.calc_marks().unwrap();
        let report = parse(&mut rubric, &text);

        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(serialize(&rubric).unwrap(), text);
        assert_eq!(rubric.calc_marks().unwrap(), total);
        assert!(compare(&rubric, &text).unwrap());
    }

    #[test]
    fn test_compare_detects_drift() {
        let mut rubric = rubric();
        let text = serialize(&rubric).unwrap();
        assert!(compare(&rubric, &text).unwrap());

        rubric.update_mark("dt1", "b", 2).unwrap();
        assert!(!compare(&rubric, &text).unwrap());

        let edited = serialize(&rubric).unwrap().replace("| b. | 2 |", "| b. | 1 |");
        assert!(!compare(&rubric, &edited).unwrap());
    }

    #[test]
    fn test_override_later_matched_by_children_round_trips() {
        let mut rubric = rubric();
        rubric.update_mark("dt2", "code", 1).unwrap();
        rubric.select("dt2", "style", 1).unwrap();

        let text = serialize(&rubric).unwrap();
        assert!(text.contains("| code. | - | 1 |"));
        assert!(text.contains("| style. | - | 1 |"));
        assert!(compare(&rubric, &text).unwrap());
    }

    #[test]
    fn test_literal_line_break_tag_round_trips() {
        let mut rubric = rubric();
        rubric.update_comment("dt1", "use <br> tags\nsparingly").unwrap();

        let text = serialize(&rubric).unwrap();
        assert!(compare(&rubric, &text).unwrap());

        let mut reread = rubric.fresh().unwrap();
        assert!(parse(&mut reread, &text).is_clean());
        assert_eq!(reread.task("dt1").unwrap().comment, "use <br> tags\nsparingly");
    }

    #[test]
    fn test_issue_display() {
        let issue = ParseIssue {
            line: 4,
            kind: IssueKind::Cell,
            column: Some("dt1".to_string()),
            reason: "\"x\" is not a mark".to_string(),
        };
        assert_eq!(issue.to_string(), "line 4: cell [dt1]: \"x\" is not a mark");
    }
}
