//! CLI argument parsing for bandmark
//!
//! Global flags: --root, --config, --format, --quiet, --verbose, logging
//! controls, and template selection (--template or --year/--semester/--stage).

pub mod args;
pub mod format;
pub mod paths;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{MarksArgs, TemplateArgs};
pub use bandmark_core::format::OutputFormat;
use bandmark_core::rubric::Marks;

/// Bandmark - rubric marking with deferred grade bands
#[derive(Parser, Debug)]
#[command(name = "bandmark")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for resolving config, criteria and marks paths
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Config file (default: bandmark.toml, then the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (human or json)
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter, e.g. `debug` or `bandmark_core=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(flatten)]
    pub template: TemplateArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available rubric templates
    List,

    /// Print the marks table for a fresh rubric, or a normalized marks file
    Render {
        #[command(flatten)]
        marks: MarksArgs,
    },

    /// Show per-task and per-band marks with maxima and totals
    Show {
        #[command(flatten)]
        marks: MarksArgs,
    },

    /// Check whether a marks file is up to date (exit 1 when stale)
    Check {
        #[command(flatten)]
        marks: MarksArgs,
    },

    /// Set the mark a band awards
    Set {
        #[command(flatten)]
        marks: MarksArgs,

        /// Task name (table column)
        #[arg(long)]
        task: String,

        /// Band name (table row)
        #[arg(long)]
        band: String,

        /// Mark to award
        #[arg(long)]
        mark: Marks,
    },

    /// Select a requirement of a leaf band by index
    Select {
        #[command(flatten)]
        marks: MarksArgs,

        /// Task name (table column)
        #[arg(long)]
        task: String,

        /// Band name (table row)
        #[arg(long)]
        band: String,

        /// Requirement index, 0 for the lowest level
        #[arg(long)]
        index: usize,
    },

    /// Replace a task's comment
    Comment {
        #[command(flatten)]
        marks: MarksArgs,

        /// Task name (table column)
        #[arg(long)]
        task: String,

        /// Comment text
        #[arg(long)]
        text: String,
    },

    /// Rewrite a marks file in canonical form
    Fmt {
        #[command(flatten)]
        marks: MarksArgs,

        /// Report whether the file would change without writing it
        #[arg(long)]
        check: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_help() {
        let result = Cli::try_parse_from(["bandmark", "--help"]);
        assert!(result.is_err()); // --help exits
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["bandmark", "list"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List)));
        assert_eq!(cli.format, OutputFormat::Human);
    }

    #[test]
    fn test_parse_set_with_template_selection() {
        let cli = Cli::try_parse_from([
            "bandmark",
            "set",
            "marks.md",
            "--task",
            "dt1",
            "--band",
            "a",
            "--mark",
            "3",
            "--year",
            "2024",
            "--semester",
            "1",
            "--stage",
            "pf",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.template.year.as_deref(), Some("2024"));
        match cli.command {
            Some(Commands::Set {
                marks, task, band, mark,
            }) => {
                assert_eq!(marks.path, Some(PathBuf::from("marks.md")));
                assert_eq!(task, "dt1");
                assert_eq!(band, "a");
                assert_eq!(mark, 3);
            }
            other => panic!("expected set, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_student_instead_of_path() {
        let cli = Cli::try_parse_from(["bandmark", "check", "--student", "s4412345"]).unwrap();
        match cli.command {
            Some(Commands::Check { marks }) => {
                assert!(marks.path.is_none());
                assert_eq!(marks.student.as_deref(), Some("s4412345"));
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn test_path_and_student_conflict() {
        let result =
            Cli::try_parse_from(["bandmark", "check", "marks.md", "--student", "s4412345"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["bandmark", "--format", "records", "list"]).is_err());
    }
}
