//! `bandmark render` command - print a marks table
//!
//! Without a marks file this is the table of a fresh rubric, ready to be
//! written into a student's stage directory. With one, it is that file in
//! canonical form.

use serde_json::json;

use crate::cli::MarksArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::load_marks;
use crate::output_by_format_result;
use bandmark_core::error::Result;
use bandmark_core::markdown::ParseReport;

/// Execute the render command
pub fn execute(ctx: &CommandContext, marks: &MarksArgs) -> Result<()> {
    let mut rubric = ctx.fresh_rubric()?;
    let report = match ctx.marks_path(marks, &rubric)? {
        Some(path) => load_marks(&mut rubric, &path)?.1,
        None => ParseReport::default(),
    };
    let table = rubric.to_markdown()?;

    output_by_format_result!(ctx.cli.format,
        json => {
            let output = json!({
                "template": rubric.template().label(),
                "markdown": table,
                "issues": report.issues,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            print!("{}", table);
        }
    )
}
