//! Rubric templates
//!
//! Templates are YAML documents describing the tasks, bands and requirement
//! ladders of one year/semester/stage. They carry no marks; a [`Rubric`] is
//! built from a template and then graded.
//!
//! [`Rubric`]: crate::rubric::Rubric

mod build;
pub mod catalog;

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{BandmarkError, Result};
use crate::rubric::Marks;

pub(crate) use build::build;
pub use catalog::TemplateCatalog;

/// Requirement names used when a template declares no headings
pub const DEFAULT_HEADINGS: &[&str] = &[
    "Absent",
    "Inadequate",
    "Insufficient",
    "Competent",
    "Proficient",
    "Exemplary",
];

/// Top-level template document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricTemplate {
    #[serde(deserialize_with = "scalar_string")]
    pub year: String,
    #[serde(deserialize_with = "scalar_string")]
    pub semester: String,
    #[serde(deserialize_with = "scalar_string")]
    pub stage: String,
    /// Requirement names by index, shared by every task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<TaskTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Overrides the rubric headings for this task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<String>,
    #[serde(default)]
    pub bands: Vec<BandTemplate>,
}

/// A band: exactly one of `requirements`, `sum` or `best_of`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTemplate {
    pub name: String,
    /// Index selected before any grading (first selectable if absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<RequirementTemplate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<Vec<BandTemplate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_of: Option<Vec<BandTemplate>>,
}

/// A requirement: exactly one of `direct`, `defer` or `empty`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementTemplate {
    /// Display name; defaults to the heading at this index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Criterion text of a direct requirement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct: Option<String>,
    /// Marks of a direct requirement; defaults to the top of its deferral run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Marks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defer: Option<DeferDirection>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub empty: bool,
}

/// Direction a deferred requirement borrows its grade from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeferDirection {
    Up,
    Down,
}

impl TryFrom<String> for DeferDirection {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "up" => Ok(DeferDirection::Up),
            "down" => Ok(DeferDirection::Down),
            other => Err(format!(
                "defer direction should be up or down, was {other}"
            )),
        }
    }
}

impl From<DeferDirection> for String {
    fn from(direction: DeferDirection) -> String {
        direction.to_string()
    }
}

impl fmt::Display for DeferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeferDirection::Up => write!(f, "up"),
            DeferDirection::Down => write!(f, "down"),
        }
    }
}

/// Accept `2024` as well as `"2024"` for identifying fields
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    })
}

impl RubricTemplate {
    /// Parse a template document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| BandmarkError::template(e.to_string()))
    }

    /// Load a template from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| BandmarkError::io_operation("read template", path.display(), e))?;
        Self::from_yaml(&content).map_err(|e| match e {
            BandmarkError::Template { reason } => BandmarkError::template(format!(
                "{}: {}",
                path.display(),
                reason
            )),
            other => other,
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Use `headings` for requirement names when the template declares none
    pub fn with_default_headings(mut self, headings: &[String]) -> Self {
        if self.headings.is_empty() {
            self.headings = headings.to_vec();
        }
        self
    }

    /// Human-readable identifier, e.g. `2024/1/pf`
    pub fn label(&self) -> String {
        format!("{}/{}/{}", self.year, self.semester, self.stage)
    }
}
