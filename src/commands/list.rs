//! `bandmark list` command - list the templates in the criteria directory

use serde_json::json;

use crate::commands::dispatch::CommandContext;
use crate::output_by_format_result;
use bandmark_core::error::Result;

/// Execute the list command
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let catalog = ctx.catalog()?;

    output_by_format_result!(ctx.cli.format,
        json => {
            let entries: Vec<_> = catalog
                .entries()
                .iter()
                .map(|entry| {
                    json!({
                        "year": entry.template.year,
                        "semester": entry.template.semester,
                        "stage": entry.template.stage,
                        "path": entry.path.display().to_string(),
                        "tasks": entry
                            .template
                            .tasks
                            .iter()
                            .map(|t| t.name.as_str())
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            Ok(())
        },
        human => {
            if catalog.entries().is_empty() {
                if !ctx.cli.quiet {
                    println!("No templates found in {}", ctx.criteria_dir().display());
                }
            } else {
                for entry in catalog.entries() {
                    println!("{}  {}", entry.template.label(), entry.path.display());
                }
            }
        }
    )
}
