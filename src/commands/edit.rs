//! `bandmark set`, `select` and `comment` - record a grading decision
//!
//! The marks file is read into a fresh rubric (or the rubric starts at its
//! defaults when the file does not exist yet), the edit is applied, and the
//! whole table is written back.

use serde_json::json;

use crate::cli::MarksArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::print_json_status;
use crate::commands::helpers::{load_marks_if_present, write_marks};
use crate::output_by_format_result;
use bandmark_core::error::Result;
use bandmark_core::rubric::{Marks, Rubric};

/// A single change to a rubric
#[derive(Debug, Clone, Copy)]
pub enum Edit<'a> {
    Mark {
        task: &'a str,
        band: &'a str,
        mark: Marks,
    },
    Select {
        task: &'a str,
        band: &'a str,
        index: usize,
    },
    Comment {
        task: &'a str,
        text: &'a str,
    },
}

impl Edit<'_> {
    fn task(&self) -> &str {
        match self {
            Edit::Mark { task, .. } | Edit::Select { task, .. } | Edit::Comment { task, .. } => {
                *task
            }
        }
    }

    pub fn apply(&self, rubric: &mut Rubric) -> Result<()> {
        match *self {
            Edit::Mark { task, band, mark } => rubric.update_mark(task, band, mark),
            Edit::Select { task, band, index } => rubric.select(task, band, index),
            Edit::Comment { task, text } => rubric.update_comment(task, text),
        }
    }
}

/// Execute an edit command
pub fn execute(ctx: &CommandContext, marks: &MarksArgs, edit: Edit) -> Result<()> {
    let mut rubric = ctx.fresh_rubric()?;
    let path = ctx.require_marks_path(marks, &rubric)?;
    let report = load_marks_if_present(&mut rubric, &path)?;

    edit.apply(&mut rubric)?;
    write_marks(&rubric, &path)?;

    let average = rubric
        .task(edit.task())
        .map(|t| t.calc_marks())
        .transpose()?
        .unwrap_or(0.0);

    output_by_format_result!(ctx.cli.format,
        json => print_json_status(
            "updated",
            None,
            &[
                ("path", json!(path.display().to_string())),
                ("task", json!(edit.task())),
                ("average", json!(average)),
                ("issues", serde_json::to_value(&report.issues)?),
            ],
        ),
        human => {
            if !ctx.cli.quiet {
                println!("updated {} ({} average {:.1})", path.display(), edit.task(), average);
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bandmark_core::error::BandmarkError;
    use bandmark_core::template::RubricTemplate;

    fn rubric() -> Rubric {
        let template = RubricTemplate::from_yaml(
            r#"
year: 2024
semester: 1
stage: pf
tasks:
  - name: dt1
    bands:
      - name: a
        requirements:
          - direct: Nothing
          - defer: up
          - direct: Something
"#,
        )
        .unwrap();
        Rubric::from_template(Arc::new(template)).unwrap()
    }

    #[test]
    fn test_apply_edits() {
        let mut rubric = rubric();

        Edit::Select {
            task: "dt1",
            band: "a",
            index: 1,
        }
        .apply(&mut rubric)
        .unwrap();
        assert_eq!(rubric.task("dt1").unwrap().calc_marks().unwrap(), 2.0);

        Edit::Mark {
            task: "dt1",
            band: "a",
            mark: 0,
        }
        .apply(&mut rubric)
        .unwrap();
        assert_eq!(rubric.task("dt1").unwrap().calc_marks().unwrap(), 0.0);

        Edit::Comment {
            task: "dt1",
            text: "  Needs work.\n",
        }
        .apply(&mut rubric)
        .unwrap();
        assert_eq!(rubric.task("dt1").unwrap().comment, "Needs work.");
    }

    #[test]
    fn test_unknown_task_is_not_found() {
        let mut rubric = rubric();
        let err = Edit::Comment {
            task: "dt9",
            text: "x",
        }
        .apply(&mut rubric)
        .unwrap_err();
        assert!(matches!(err, BandmarkError::NotFound { .. }));
    }
}
