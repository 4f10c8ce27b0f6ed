//! `bandmark fmt` command - rewrite a marks file in canonical form

use serde_json::json;

use crate::cli::MarksArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::print_json_status;
use crate::commands::helpers::{load_marks, write_marks};
use crate::output_by_format_result;
use bandmark_core::error::{BandmarkError, Result};

/// Execute the fmt command
pub fn execute(ctx: &CommandContext, marks: &MarksArgs, check: bool) -> Result<()> {
    let mut rubric = ctx.fresh_rubric()?;
    let path = ctx.require_marks_path(marks, &rubric)?;
    let (text, _) = load_marks(&mut rubric, &path)?;
    let changed = rubric.to_markdown()? != text;

    if check && changed {
        return Err(BandmarkError::Stale { path });
    }
    if changed {
        write_marks(&rubric, &path)?;
    }

    let status = if changed { "formatted" } else { "unchanged" };

    output_by_format_result!(ctx.cli.format,
        json => print_json_status(status, None, &[("path", json!(path.display().to_string()))]),
        human => {
            if !ctx.cli.quiet {
                println!("{} {}", status, path.display());
            }
        }
    )
}
