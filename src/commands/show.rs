//! `bandmark show` command - marks awarded per task and band

use serde::Serialize;

use crate::cli::MarksArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::format_marks;
use crate::commands::helpers::load_marks;
use crate::output_by_format_result;
use bandmark_core::error::Result;
use bandmark_core::rubric::{Marks, Rubric, Task};
use bandmark_core::score::{self, Gradeable};

#[derive(Debug, Serialize)]
struct BandSummary {
    name: String,
    depth: usize,
    marks: Marks,
    max: Marks,
    /// Criterion the selected requirement resolves to (leaf bands only)
    #[serde(skip_serializing_if = "Option::is_none")]
    criterion: Option<String>,
}

#[derive(Debug, Serialize)]
struct TaskSummary {
    name: String,
    average: f64,
    max: Marks,
    bands: Vec<BandSummary>,
    #[serde(skip_serializing_if = "String::is_empty")]
    comment: String,
}

#[derive(Debug, Serialize)]
struct RubricSummary {
    template: String,
    total: f64,
    max: Marks,
    tasks: Vec<TaskSummary>,
}

fn summarize_task(task: &Task) -> Result<TaskSummary> {
    let mut bands = Vec::new();
    let mut failure = None;
    task.visit(|band, depth| {
        if failure.is_some() {
            return;
        }
        match score::calculate(band) {
            Ok(marks) => bands.push(BandSummary {
                name: band.name().to_string(),
                depth,
                marks,
                max: band.max_marks(),
                criterion: band.criterion().map(str::to_string),
            }),
            Err(e) => failure = Some(e),
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }

    Ok(TaskSummary {
        name: task.name.clone(),
        average: task.calc_marks()?,
        max: task.max_marks(),
        bands,
        comment: task.comment.clone(),
    })
}

fn summarize(rubric: &Rubric) -> Result<RubricSummary> {
    Ok(RubricSummary {
        template: rubric.template().label(),
        total: rubric.calc_marks()?,
        max: rubric.max_marks(),
        tasks: rubric
            .tasks
            .iter()
            .map(summarize_task)
            .collect::<Result<_>>()?,
    })
}

/// Execute the show command
pub fn execute(ctx: &CommandContext, marks: &MarksArgs) -> Result<()> {
    let mut rubric = ctx.fresh_rubric()?;
    if let Some(path) = ctx.marks_path(marks, &rubric)? {
        load_marks(&mut rubric, &path)?;
    }
    let summary = summarize(&rubric)?;

    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        },
        human => {
            println!("{}", summary.template);
            for task in &summary.tasks {
                println!();
                println!("{}  {}", task.name, format_marks(task.average, task.max));
                for band in &task.bands {
                    let indent = "  ".repeat(band.depth + 1);
                    print!("{}{}  {} / {}", indent, band.name, band.marks, band.max);
                    match band.criterion.as_deref() {
                        Some(criterion) if !criterion.is_empty() => println!("  {}", criterion),
                        _ => println!(),
                    }
                }
                if !task.comment.is_empty() {
                    for line in task.comment.lines() {
                        println!("  > {}", line);
                    }
                }
            }
            println!();
            println!("total  {}", format_marks(summary.total, summary.max));
        }
    )
}
