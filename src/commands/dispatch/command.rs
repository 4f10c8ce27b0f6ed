//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::cli::paths::student_marks_path;
use crate::cli::{Cli, MarksArgs};
use bandmark_core::bail_usage;
use bandmark_core::config::BandmarkConfig;
use bandmark_core::error::{BandmarkError, Result};
use bandmark_core::rubric::Rubric;
use bandmark_core::template::{RubricTemplate, TemplateCatalog};

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a Path,
    pub start: Instant,
    pub config: BandmarkConfig,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a Path, start: Instant) -> Result<Self> {
        let config = BandmarkConfig::discover(root, cli.config.as_deref())?;
        Ok(Self {
            cli,
            root,
            start,
            config,
        })
    }

    pub fn criteria_dir(&self) -> PathBuf {
        BandmarkConfig::resolve(self.root, &self.config.criteria_dir)
    }

    pub fn catalog(&self) -> Result<TemplateCatalog> {
        TemplateCatalog::load_dir(&self.criteria_dir())
    }

    /// The template picked by `--template`, by `--year/--semester/--stage`,
    /// or the only template in the criteria directory.
    pub fn template(&self) -> Result<Arc<RubricTemplate>> {
        let args = &self.cli.template;
        let template = if let Some(path) = &args.template {
            RubricTemplate::load(&BandmarkConfig::resolve(self.root, path))?
        } else {
            let catalog = self.catalog()?;
            match (&args.year, &args.semester, &args.stage) {
                (Some(year), Some(semester), Some(stage)) => {
                    catalog.find(year, semester, stage)?.template.clone()
                }
                (None, None, None) => match catalog.entries() {
                    [only] => only.template.clone(),
                    [] => {
                        return Err(BandmarkError::not_found(
                            "template",
                            self.criteria_dir().display(),
                        ))
                    }
                    _ => bail_usage!(
                        "several templates available; pass --template, \
                         or --year, --semester and --stage"
                    ),
                },
                _ => bail_usage!("--year, --semester and --stage must be given together"),
            }
        };
        tracing::debug!(template = %template.label(), "selected template");
        Ok(Arc::new(
            template.with_default_headings(&self.config.headings),
        ))
    }

    /// A rubric with every band at its default selection
    pub fn fresh_rubric(&self) -> Result<Rubric> {
        Rubric::from_template(self.template()?)
    }

    /// The marks file named on the command line, if any
    pub fn marks_path(&self, marks: &MarksArgs, rubric: &Rubric) -> Result<Option<PathBuf>> {
        if let Some(path) = &marks.path {
            return Ok(Some(BandmarkConfig::resolve(self.root, path)));
        }
        match &marks.student {
            Some(student) => {
                let marks_dir = BandmarkConfig::resolve(self.root, &self.config.marks_dir);
                student_marks_path(&marks_dir, student, &rubric.stage, &self.config.marks_file)
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    /// Like `marks_path`, for commands that cannot run without a file
    pub fn require_marks_path(&self, marks: &MarksArgs, rubric: &Rubric) -> Result<PathBuf> {
        match self.marks_path(marks, rubric)? {
            Some(path) => Ok(path),
            None => bail_usage!("a marks file path or --student is required"),
        }
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("bandmark {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Rubric marking with deferred grade bands.");
        println!();
        println!("Run `bandmark --help` for usage information.");
        Ok(())
    }
}
