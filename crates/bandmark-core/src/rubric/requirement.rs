use serde::Serialize;

use super::Marks;

/// One selectable grade level inside a leaf band
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Display label (e.g. "Exemplary")
    pub name: String,
    pub kind: RequirementKind,
}

/// What a requirement contributes once selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementKind {
    /// A real criterion awarding a fixed number of marks
    Direct { marks: Marks, description: String },
    /// Same grade as the requirement above it (next index)
    DeferredUp,
    /// Same grade as the requirement below it (previous index)
    DeferredDown,
    /// No criterion at this level; never selectable and never joined
    Empty,
}

impl Requirement {
    pub fn direct(name: impl Into<String>, marks: Marks, description: impl Into<String>) -> Self {
        Requirement {
            name: name.into(),
            kind: RequirementKind::Direct {
                marks,
                description: description.into(),
            },
        }
    }

    pub fn deferred_up(name: impl Into<String>) -> Self {
        Requirement {
            name: name.into(),
            kind: RequirementKind::DeferredUp,
        }
    }

    pub fn deferred_down(name: impl Into<String>) -> Self {
        Requirement {
            name: name.into(),
            kind: RequirementKind::DeferredDown,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Requirement {
            name: name.into(),
            kind: RequirementKind::Empty,
        }
    }

    /// Marks awarded directly by this requirement, if it is a real criterion
    pub fn direct_marks(&self) -> Option<Marks> {
        match self.kind {
            RequirementKind::Direct { marks, .. } => Some(marks),
            _ => None,
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self.kind, RequirementKind::Direct { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, RequirementKind::Empty)
    }

    /// Text shown to the grader for this level
    pub fn description(&self) -> &str {
        match &self.kind {
            RequirementKind::Direct { description, .. } => description,
            RequirementKind::DeferredUp => "(see above)",
            RequirementKind::DeferredDown => "(see below)",
            RequirementKind::Empty => "",
        }
    }
}
