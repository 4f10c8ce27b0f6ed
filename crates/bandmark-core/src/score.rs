//! Mark calculation for bands
//!
//! `calculate` is the single entry point: a manual override wins outright,
//! otherwise the band's own composition rule applies.
//!
//! - Leaf: marks of the chosen requirement, following deferrals to the
//!   `Direct` requirement of its run.
//! - Sum: sum of the children.
//! - BestOf: the lowest of the children's marks. Each child awards the
//!   upper bound of its deferral run, and the composite cannot exceed what
//!   its weakest dimension allows.
//!
//! `max_marks` is structural and ignores the current selection.

use crate::deferral::{anchor, resolve_bounds};
use crate::error::{BandmarkError, Result};
use crate::rubric::{Band, LeafBand, Marks};

/// Anything that can be scored: bands and the leaf children of best-of bands
pub trait Gradeable {
    fn name(&self) -> &str;

    fn manual_override(&self) -> Option<Marks>;

    /// Marks from the composition rule alone, ignoring any override
    fn evaluate(&self) -> Result<Marks>;

    /// Highest mark the band can award
    fn max_marks(&self) -> Marks;

    /// Whether the mark is derived from child bands
    fn is_composite(&self) -> bool {
        false
    }

    /// Criterion text of the requirement the current selection resolves to
    fn criterion(&self) -> Option<&str> {
        None
    }
}

/// Marks currently awarded by a band
pub fn calculate<G: Gradeable + ?Sized>(band: &G) -> Result<Marks> {
    if let Some(marks) = band.manual_override() {
        return Ok(marks);
    }
    band.evaluate()
}

impl Gradeable for LeafBand {
    fn name(&self) -> &str {
        &self.name
    }

    fn manual_override(&self) -> Option<Marks> {
        self.manual_override
    }

    fn evaluate(&self) -> Result<Marks> {
        let range = resolve_bounds(self, self.chosen_index)?;
        let index = anchor(&self.requirements, range).ok_or_else(|| BandmarkError::Unresolved {
            band: self.name.clone(),
            index: self.chosen_index,
        })?;
        self.requirements[index]
            .direct_marks()
            .ok_or_else(|| BandmarkError::Unresolved {
                band: self.name.clone(),
                index: self.chosen_index,
            })
    }

    fn max_marks(&self) -> Marks {
        self.requirements
            .iter()
            .filter_map(|r| r.direct_marks())
            .max()
            .unwrap_or(0)
    }

    fn criterion(&self) -> Option<&str> {
        let range = resolve_bounds(self, self.chosen_index).ok()?;
        let index = anchor(&self.requirements, range)?;
        Some(self.requirements[index].description())
    }
}

impl Gradeable for Band {
    fn name(&self) -> &str {
        Band::name(self)
    }

    fn manual_override(&self) -> Option<Marks> {
        match self {
            Band::Leaf(leaf) => leaf.manual_override,
            Band::Sum(c) => c.manual_override,
            Band::BestOf(c) => c.manual_override,
        }
    }

    fn evaluate(&self) -> Result<Marks> {
        match self {
            Band::Leaf(leaf) => leaf.evaluate(),
            Band::Sum(c) => c.children.iter().map(calculate).sum(),
            Band::BestOf(c) => {
                let mut lowest: Option<Marks> = None;
                for child in &c.children {
                    let marks = calculate(child)?;
                    lowest = Some(lowest.map_or(marks, |m| m.min(marks)));
                }
                Ok(lowest.unwrap_or(0))
            }
        }
    }

    fn max_marks(&self) -> Marks {
        match self {
            Band::Leaf(leaf) => leaf.max_marks(),
            Band::Sum(c) => c.children.iter().map(Gradeable::max_marks).sum(),
            // Only one dimension need be satisfied
            Band::BestOf(c) => c
                .children
                .iter()
                .map(Gradeable::max_marks)
                .max()
                .unwrap_or(0),
        }
    }

    fn is_composite(&self) -> bool {
        !self.is_leaf()
    }

    fn criterion(&self) -> Option<&str> {
        match self {
            Band::Leaf(leaf) => leaf.criterion(),
            Band::Sum(_) | Band::BestOf(_) => None,
        }
    }
}
