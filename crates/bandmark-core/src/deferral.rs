//! Deferral resolution for leaf bands
//!
//! A deferred requirement has no marks of its own: `DeferredUp` takes the
//! grade of the requirement at the next index, `DeferredDown` the grade of the
//! one at the previous index. Adjacent requirements joined this way form a
//! contiguous run that awards a single grade, anchored on the one `Direct`
//! requirement inside it. `Empty` never joins a run.

use crate::error::{BandmarkError, Result};
use crate::rubric::{LeafBand, Requirement, RequirementKind};

/// Inclusive index range of requirements that award the same grade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferralRange {
    pub low: usize,
    pub high: usize,
}

impl DeferralRange {
    pub fn contains(&self, index: usize) -> bool {
        (self.low..=self.high).contains(&index)
    }
}

/// Resolve the run of requirements reachable from `index` in a leaf band
pub fn resolve_bounds(leaf: &LeafBand, index: usize) -> Result<DeferralRange> {
    if index >= leaf.requirements.len() {
        return Err(BandmarkError::IndexOutOfRange {
            band: leaf.name.clone(),
            index,
            len: leaf.requirements.len(),
        });
    }
    Ok(span(&leaf.requirements, index))
}

/// Index of the `Direct` requirement that supplies the grade for `range`.
///
/// Searches from the upper bound down; a well-formed run holds exactly one.
pub fn anchor(requirements: &[Requirement], range: DeferralRange) -> Option<usize> {
    (range.low..=range.high)
        .rev()
        .find(|&i| requirements[i].is_direct())
}

/// Widest run around `index`. Caller guarantees `index` is in bounds.
pub(crate) fn span(requirements: &[Requirement], index: usize) -> DeferralRange {
    let mut low = index;
    while low > 0 && joined(&requirements[low - 1].kind, &requirements[low].kind) {
        low -= 1;
    }

    let mut high = index;
    while high + 1 < requirements.len()
        && joined(&requirements[high].kind, &requirements[high + 1].kind)
    {
        high += 1;
    }

    DeferralRange { low, high }
}

/// Whether the requirements at `i` (lower) and `i + 1` (upper) share a grade
fn joined(lower: &RequirementKind, upper: &RequirementKind) -> bool {
    if matches!(lower, RequirementKind::Empty) || matches!(upper, RequirementKind::Empty) {
        return false;
    }
    matches!(lower, RequirementKind::DeferredUp) || matches!(upper, RequirementKind::DeferredDown)
}
