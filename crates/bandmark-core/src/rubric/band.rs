use serde::Serialize;

use super::requirement::Requirement;
use super::Marks;
use crate::error::{BandmarkError, Result};
use crate::score::{self, Gradeable};

/// A directly selectable band: an ordered list of requirements and a choice
#[derive(Debug, Clone, Serialize)]
pub struct LeafBand {
    pub name: String,
    pub requirements: Vec<Requirement>,
    pub chosen_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_override: Option<Marks>,
}

/// A band whose mark is derived from its children
#[derive(Debug, Clone, Serialize)]
pub struct Composite<C> {
    pub name: String,
    pub children: Vec<C>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_override: Option<Marks>,
}

/// A gradeable unit of a task
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Band {
    Leaf(LeafBand),
    /// Mark is the sum of the children's marks
    Sum(Composite<Band>),
    /// Mark is bounded by the weakest child; children are always leaves
    BestOf(Composite<LeafBand>),
}

/// Mutable handle on a band found by name anywhere in a band tree
pub enum BandMut<'a> {
    Band(&'a mut Band),
    Leaf(&'a mut LeafBand),
}

impl LeafBand {
    pub fn new(
        name: impl Into<String>,
        requirements: Vec<Requirement>,
        chosen_index: usize,
    ) -> Self {
        LeafBand {
            name: name.into(),
            requirements,
            chosen_index,
            manual_override: None,
        }
    }

    /// A band with no requirements, carrying only an explicit mark.
    /// Used when a marks file names a band the template does not know.
    pub fn detached(name: impl Into<String>, mark: Marks) -> Self {
        LeafBand {
            name: name.into(),
            requirements: Vec::new(),
            chosen_index: 0,
            manual_override: Some(mark),
        }
    }

    /// Record a grade-selection event.
    ///
    /// Leaves the band untouched when the index is rejected.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let Some(requirement) = self.requirements.get(index) else {
            return Err(BandmarkError::IndexOutOfRange {
                band: self.name.clone(),
                index,
                len: self.requirements.len(),
            });
        };
        if requirement.is_empty() {
            return Err(BandmarkError::Unselectable {
                band: self.name.clone(),
                index,
            });
        }
        self.chosen_index = index;
        Ok(())
    }

    /// Set the band to the direct requirement that awards `mark`.
    ///
    /// A band without requirements has no index to choose, so the mark is
    /// kept as a manual override instead.
    pub fn assign_mark(&mut self, mark: Marks) -> Result<()> {
        if self.requirements.is_empty() {
            self.manual_override = Some(mark);
            return Ok(());
        }
        let index = self
            .requirements
            .iter()
            .position(|r| r.direct_marks() == Some(mark))
            .ok_or_else(|| BandmarkError::MarkNotAwarded {
                band: self.name.clone(),
                mark,
            })?;
        self.chosen_index = index;
        Ok(())
    }
}

impl PartialEq for LeafBand {
    // Two choices inside one deferral range award the same grade
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.requirements == other.requirements
            && self.manual_override == other.manual_override
            && self.evaluate().ok() == other.evaluate().ok()
    }
}

impl<C: PartialEq> Composite<C> {
    fn same_shape(&self, other: &Self) -> bool {
        self.name == other.name && self.children == other.children
    }
}

impl PartialEq for Band {
    // A composite override that the children already produce is redundant,
    // so composites compare by the mark they award
    fn eq(&self, other: &Self) -> bool {
        let same_shape = match (self, other) {
            (Band::Leaf(a), Band::Leaf(b)) => return a == b,
            (Band::Sum(a), Band::Sum(b)) => a.same_shape(b),
            (Band::BestOf(a), Band::BestOf(b)) => a.same_shape(b),
            _ => false,
        };
        same_shape && score::calculate(self).ok() == score::calculate(other).ok()
    }
}

impl<C> Composite<C> {
    pub fn new(name: impl Into<String>, children: Vec<C>) -> Self {
        Composite {
            name: name.into(),
            children,
            manual_override: None,
        }
    }
}

impl Band {
    pub fn name(&self) -> &str {
        match self {
            Band::Leaf(leaf) => &leaf.name,
            Band::Sum(c) => &c.name,
            Band::BestOf(c) => &c.name,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Band::Leaf(_))
    }

    /// Find a band by name in this band's tree (pre-order)
    pub fn find_mut(&mut self, name: &str) -> Option<BandMut<'_>> {
        if self.name() == name {
            return Some(BandMut::Band(self));
        }
        match self {
            Band::Leaf(_) => None,
            Band::Sum(c) => c.children.iter_mut().find_map(|child| child.find_mut(name)),
            Band::BestOf(c) => c
                .children
                .iter_mut()
                .find(|leaf| leaf.name == name)
                .map(BandMut::Leaf),
        }
    }

    /// Visit every band in this tree in pre-order, along with its depth
    pub fn visit<F>(&self, depth: usize, f: &mut F)
    where
        F: FnMut(&dyn Gradeable, usize),
    {
        f(self, depth);
        match self {
            Band::Leaf(_) => {}
            Band::Sum(c) => {
                for child in &c.children {
                    child.visit(depth + 1, f);
                }
            }
            Band::BestOf(c) => {
                for child in &c.children {
                    f(child, depth + 1);
                }
            }
        }
    }

    /// Set the band's mark from a recorded value.
    ///
    /// Composites have no single index, so the value becomes a manual
    /// override unless the children already produce it.
    pub fn assign_mark(&mut self, mark: Marks) -> Result<()> {
        match self {
            Band::Leaf(leaf) => leaf.assign_mark(mark),
            Band::Sum(_) | Band::BestOf(_) => {
                let derived = self.evaluate().ok();
                *self.override_slot() = (derived != Some(mark)).then_some(mark);
                Ok(())
            }
        }
    }

    fn override_slot(&mut self) -> &mut Option<Marks> {
        match self {
            Band::Leaf(leaf) => &mut leaf.manual_override,
            Band::Sum(c) => &mut c.manual_override,
            Band::BestOf(c) => &mut c.manual_override,
        }
    }
}

impl BandMut<'_> {
    pub fn select(self, index: usize) -> Result<()> {
        match self {
            BandMut::Band(Band::Leaf(leaf)) | BandMut::Leaf(leaf) => leaf.select(index),
            BandMut::Band(band) => Err(BandmarkError::invalid_value(
                "selection",
                format!("{} is a composite band with no index to select", band.name()),
            )),
        }
    }

    pub fn assign_mark(self, mark: Marks) -> Result<()> {
        match self {
            BandMut::Band(band) => band.assign_mark(mark),
            BandMut::Leaf(leaf) => leaf.assign_mark(mark),
        }
    }
}
