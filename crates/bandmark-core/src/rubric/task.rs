use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::Serialize;

use super::band::{Band, BandMut, LeafBand};
use super::Marks;
use crate::error::{BandmarkError, Result};
use crate::score::{self, Gradeable};

/// One assessed task: its bands and the grader's free-text comment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub comment: String,
    pub bands: Vec<Band>,
}

impl Task {
    pub fn new(name: impl Into<String>, description: impl Into<String>, bands: Vec<Band>) -> Self {
        Task {
            name: name.into(),
            description: description.into(),
            comment: String::new(),
            bands,
        }
    }

    /// Find a band by name anywhere in this task's band trees
    pub fn band_mut(&mut self, name: &str) -> Option<BandMut<'_>> {
        self.bands.iter_mut().find_map(|band| band.find_mut(name))
    }

    fn require_band(&mut self, name: &str) -> Result<BandMut<'_>> {
        let task = self.name.clone();
        self.band_mut(name)
            .ok_or_else(|| BandmarkError::not_found("band", format!("{name} (task {task})")))
    }

    /// Grade-selection event for a leaf band
    pub fn select(&mut self, band: &str, index: usize) -> Result<()> {
        self.require_band(band)?.select(index)
    }

    /// Set a band to the requirement (or override) that awards `mark`
    pub fn update_mark(&mut self, band: &str, mark: Marks) -> Result<()> {
        self.require_band(band)?.assign_mark(mark)
    }

    /// Like `update_mark`, but a band the task does not know is created
    /// as a detached leaf instead of being rejected.
    pub(crate) fn reconcile_mark(&mut self, band: &str, mark: Marks) -> Result<()> {
        match self.band_mut(band) {
            Some(found) => found.assign_mark(mark),
            None => {
                tracing::debug!(
                    task = %self.name,
                    band,
                    mark,
                    "creating band missing from template"
                );
                self.bands.push(Band::Leaf(LeafBand::detached(band, mark)));
                Ok(())
            }
        }
    }

    /// Order in which recorded marks must be applied: leaves first, then
    /// composites from the deepest up, so a composite sees its children's
    /// final state before deciding whether it needs an override.
    pub(crate) fn reconcile_rank(&self, band: &str) -> (u8, Reverse<usize>) {
        let mut rank = (0, Reverse(0));
        self.visit(|b, depth| {
            if b.name() == band && b.is_composite() {
                rank = (1, Reverse(depth));
            }
        });
        rank
    }

    pub fn update_comment(&mut self, comment: &str) {
        self.comment = normalize_comment(comment);
    }

    /// Visit every band of the task in pre-order
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&dyn Gradeable, usize),
    {
        for band in &self.bands {
            band.visit(0, &mut f);
        }
    }

    /// Current marks of every band in the task, keyed by band name
    pub fn marks_by_band(&self) -> Result<BTreeMap<String, Marks>> {
        let mut marks = BTreeMap::new();
        let mut failure = None;
        self.visit(|band, _| {
            if failure.is_some() {
                return;
            }
            match score::calculate(band) {
                Ok(m) => {
                    marks.insert(band.name().to_string(), m);
                }
                Err(e) => failure = Some(e),
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(marks),
        }
    }

    /// Mean mark of the task's top-level bands (0 when it has none)
    pub fn calc_marks(&self) -> Result<f64> {
        if self.bands.is_empty() {
            return Ok(0.0);
        }
        let total: Marks = self.bands.iter().map(score::calculate).sum::<Result<Marks>>()?;
        Ok(f64::from(total) / self.bands.len() as f64)
    }

    /// Highest mark any top-level band can award
    pub fn max_marks(&self) -> Marks {
        self.bands
            .iter()
            .map(Gradeable::max_marks)
            .max()
            .unwrap_or(0)
    }
}

/// Comments are stored the way the marks table can carry them back
pub(crate) fn normalize_comment(comment: &str) -> String {
    comment.replace("\r\n", "\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::{Composite, Requirement};

    fn ladder(name: &str, chosen: usize) -> LeafBand {
        LeafBand::new(
            name,
            (0..=5)
                .map(|m| Requirement::direct(format!("L{m}"), m, ""))
                .collect(),
            chosen,
        )
    }

    fn task() -> Task {
        Task::new(
            "dt1",
            "",
            vec![
                Band::Leaf(ladder("a", 2)),
                Band::Sum(Composite::new(
                    "code",
                    vec![
                        Band::Leaf(ladder("style", 1)),
                        Band::BestOf(Composite::new(
                            "tests",
                            vec![ladder("unit", 3), ladder("system", 5)],
                        )),
                    ],
                )),
            ],
        )
    }

    #[test]
    fn test_marks_by_band_covers_nested_bands() {
        let marks = task().marks_by_band().unwrap();
        let names: Vec<_> = marks.keys().map(String::as_str).collect();
        assert_eq!(names, ["a", "code", "style", "system", "tests", "unit"]);
        assert_eq!(marks["tests"], 3);
        assert_eq!(marks["code"], 4);
    }

    #[test]
    fn test_calc_marks_is_mean_of_top_level_bands() {
        let task = task();
        assert_eq!(task.calc_marks().unwrap(), 3.0);
        assert_eq!(task.max_marks(), 10);
    }

    #[test]
    fn test_select_nested_leaf() {
        let mut task = task();
        task.select("unit", 5).unwrap();
        assert_eq!(task.marks_by_band().unwrap()["code"], 6);
    }

    #[test]
    fn test_select_composite_is_rejected() {
        let mut task = task();
        let err = task.select("code", 1).unwrap_err();
        assert!(matches!(err, BandmarkError::InvalidValue { .. }));
    }

    #[test]
    fn test_unknown_band_is_not_found() {
        let mut task = task();
        assert!(matches!(
            task.update_mark("zz", 1),
            Err(BandmarkError::NotFound { .. })
        ));
    }

    #[test]
    fn test_reconcile_mark_creates_missing_band() {
        let mut task = task();
        task.reconcile_mark("bonus", 2).unwrap();
        assert_eq!(task.marks_by_band().unwrap()["bonus"], 2);
    }

    #[test]
    fn test_reconcile_rank_orders_leaves_then_deep_composites() {
        let task = task();
        assert!(task.reconcile_rank("unit") < task.reconcile_rank("tests"));
        assert!(task.reconcile_rank("tests") < task.reconcile_rank("code"));
    }

    #[test]
    fn test_update_comment_normalizes_whitespace() {
        let mut task = task();
        task.update_comment("  needs work\r\non style  ");
        assert_eq!(task.comment, "needs work\non style");
    }

    #[test]
    fn test_empty_task_marks() {
        let task = Task::new("empty", "", Vec::new());
        assert_eq!(task.calc_marks().unwrap(), 0.0);
        assert_eq!(task.max_marks(), 0);
    }
}
