//! `bandmark check` command - is a marks file up to date?
//!
//! A file is up to date when reading it into a fresh rubric and writing the
//! rubric back reproduces it byte for byte. Anything else (a changed
//! template, a hand edit, a skipped cell) means it needs rewriting.

use serde_json::json;

use crate::cli::{MarksArgs, OutputFormat};
use crate::commands::dispatch::CommandContext;
use crate::commands::format::print_json_status;
use crate::commands::helpers::load_marks;
use bandmark_core::error::{BandmarkError, Result};

/// Execute the check command
pub fn execute(ctx: &CommandContext, marks: &MarksArgs) -> Result<()> {
    let mut rubric = ctx.fresh_rubric()?;
    let path = ctx.require_marks_path(marks, &rubric)?;
    let (text, report) = load_marks(&mut rubric, &path)?;
    let up_to_date = report.is_clean() && rubric.matches_markdown(&text)?;

    tracing::debug!(path = %path.display(), up_to_date, "checked marks file");

    match ctx.cli.format {
        OutputFormat::Json => {
            print_json_status(
                if up_to_date { "up_to_date" } else { "stale" },
                None,
                &[
                    ("path", json!(path.display().to_string())),
                    ("issues", serde_json::to_value(&report.issues)?),
                ],
            )?;
        }
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                for issue in &report.issues {
                    eprintln!("{}: {}", path.display(), issue);
                }
                if up_to_date {
                    println!("{} is up to date", path.display());
                }
            }
        }
    }

    if up_to_date {
        Ok(())
    } else {
        Err(BandmarkError::Stale { path })
    }
}
