//! Rubric data model
//!
//! A rubric is built once from a template and keeps its shape for its whole
//! life. Only band selections, manual overrides and task comments change.

mod band;
mod requirement;
mod task;

use std::sync::Arc;

use serde::Serialize;

pub use band::{Band, BandMut, Composite, LeafBand};
pub use requirement::{Requirement, RequirementKind};
pub use task::Task;

use crate::error::{BandmarkError, Result};
use crate::markdown::{self, ParseReport};
use crate::score::Gradeable;
use crate::template::RubricTemplate;

/// Integer mark awarded by a requirement or band
pub type Marks = u32;

/// Aggregate root: every task assessed for one year/semester/stage
#[derive(Debug, Clone, Serialize)]
pub struct Rubric {
    pub year: String,
    pub semester: String,
    pub stage: String,
    pub tasks: Vec<Task>,
    #[serde(skip)]
    template: Arc<RubricTemplate>,
}

impl PartialEq for Rubric {
    fn eq(&self, other: &Self) -> bool {
        self.year == other.year
            && self.semester == other.semester
            && self.stage == other.stage
            && self.tasks == other.tasks
    }
}

impl Rubric {
    pub(crate) fn new(template: Arc<RubricTemplate>, tasks: Vec<Task>) -> Self {
        Rubric {
            year: template.year.clone(),
            semester: template.semester.clone(),
            stage: template.stage.clone(),
            tasks,
            template,
        }
    }

    /// Build a rubric from a template, validating its structure
    pub fn from_template(template: Arc<RubricTemplate>) -> Result<Self> {
        crate::template::build(template)
    }

    /// The template this rubric was built from
    pub fn template(&self) -> &Arc<RubricTemplate> {
        &self.template
    }

    /// A new rubric from the same template with every selection at its default
    pub fn fresh(&self) -> Result<Self> {
        Self::from_template(Arc::clone(&self.template))
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn task_mut(&mut self, name: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| BandmarkError::not_found("task", name))
    }

    /// Grade-selection event: choose requirement `index` of a leaf band
    pub fn select(&mut self, task: &str, band: &str, index: usize) -> Result<()> {
        self.task_mut(task)?.select(band, index)?;
        tracing::debug!(task, band, index, "selected requirement");
        Ok(())
    }

    /// Set the mark a band awards
    pub fn update_mark(&mut self, task: &str, band: &str, mark: Marks) -> Result<()> {
        self.task_mut(task)?.update_mark(band, mark)?;
        tracing::debug!(task, band, mark, "updated mark");
        Ok(())
    }

    pub fn update_comment(&mut self, task: &str, comment: &str) -> Result<()> {
        self.task_mut(task)?.update_comment(comment);
        Ok(())
    }

    /// Sum of each task's mean band mark
    pub fn calc_marks(&self) -> Result<f64> {
        self.tasks.iter().map(Task::calc_marks).sum()
    }

    /// Sum of each task's maximum band mark
    pub fn max_marks(&self) -> Marks {
        self.tasks.iter().map(Task::max_marks).sum()
    }

    /// Highest mark a single named band can award in a task
    pub fn band_max_marks(&self, task: &str, band: &str) -> Option<Marks> {
        let mut max = None;
        self.task(task)?.visit(|b, _| {
            if b.name() == band {
                max = Some(b.max_marks());
            }
        });
        max
    }

    /// Render the marks table
    pub fn to_markdown(&self) -> Result<String> {
        markdown::serialize(self)
    }

    /// Apply a marks table to this rubric
    pub fn load_markdown(&mut self, text: &str) -> ParseReport {
        markdown::parse(self, text)
    }

    /// Whether `text` is exactly the table this rubric would write
    pub fn matches_markdown(&self, text: &str) -> Result<bool> {
        markdown::compare(self, text)
    }
}
