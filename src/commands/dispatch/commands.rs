//! Command implementations for all bandmark commands

use super::command::{Command, CommandContext};
use super::macros::trace_command_always;
use crate::cli::Commands;
use crate::commands::edit::Edit;
use crate::commands::{check, edit, fmt, list, render, show};
use bandmark_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let result = match self {
            Commands::List => list::execute(ctx),
            Commands::Render { marks } => render::execute(ctx, marks),
            Commands::Show { marks } => show::execute(ctx, marks),
            Commands::Check { marks } => check::execute(ctx, marks),
            Commands::Set {
                marks,
                task,
                band,
                mark,
            } => edit::execute(
                ctx,
                marks,
                Edit::Mark {
                    task,
                    band,
                    mark: *mark,
                },
            ),
            Commands::Select {
                marks,
                task,
                band,
                index,
            } => edit::execute(
                ctx,
                marks,
                Edit::Select {
                    task,
                    band,
                    index: *index,
                },
            ),
            Commands::Comment { marks, task, text } => {
                edit::execute(ctx, marks, Edit::Comment { task, text })
            }
            Commands::Fmt { marks, check } => fmt::execute(ctx, marks, *check),
        };
        trace_command_always!(ctx.start, "command_done");
        result
    }
}
