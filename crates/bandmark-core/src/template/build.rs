use std::collections::HashSet;
use std::sync::Arc;

use super::{BandTemplate, DeferDirection, RequirementTemplate, RubricTemplate};
use crate::bail_template;
use crate::deferral;
use crate::error::{BandmarkError, Result};
use crate::rubric::{Band, Composite, LeafBand, Marks, Requirement, RequirementKind, Rubric, Task};

/// Assemble and validate a rubric from its template.
///
/// Nothing is returned unless the whole template is well formed.
pub(crate) fn build(template: Arc<RubricTemplate>) -> Result<Rubric> {
    let mut task_names = HashSet::new();
    let mut tasks = Vec::with_capacity(template.tasks.len());

    for task in &template.tasks {
        check_name("task", &task.name)?;
        if !task_names.insert(task.name.as_str()) {
            bail_template!("duplicate task name {}", task.name);
        }

        let headings = if task.headings.is_empty() {
            &template.headings
        } else {
            &task.headings
        };
        let mut builder = TaskBuilder {
            task: &task.name,
            headings,
            seen: HashSet::new(),
        };
        let bands = task
            .bands
            .iter()
            .map(|band| builder.band(band))
            .collect::<Result<Vec<_>>>()?;
        tasks.push(Task::new(&task.name, &task.description, bands));
    }

    tracing::debug!(
        template = %template.label(),
        tasks = tasks.len(),
        "built rubric from template"
    );
    Ok(Rubric::new(template, tasks))
}

struct TaskBuilder<'a> {
    task: &'a str,
    headings: &'a [String],
    seen: HashSet<String>,
}

impl TaskBuilder<'_> {
    fn band(&mut self, band: &BandTemplate) -> Result<Band> {
        match (&band.requirements, &band.sum, &band.best_of) {
            (Some(requirements), None, None) => Ok(Band::Leaf(self.leaf(band, requirements)?)),
            (None, Some(children), None) => {
                self.composite_header(band, children)?;
                let children = children
                    .iter()
                    .map(|child| self.band(child))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Band::Sum(Composite::new(&band.name, children)))
            }
            (None, None, Some(children)) => {
                self.composite_header(band, children)?;
                let children = children
                    .iter()
                    .map(|child| match &child.requirements {
                        Some(requirements) if child.sum.is_none() && child.best_of.is_none() => {
                            self.leaf(child, requirements)
                        }
                        _ => bail_template!(
                            "best_of band {} in task {} has non-leaf child {}",
                            band.name,
                            self.task,
                            child.name
                        ),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Band::BestOf(Composite::new(&band.name, children)))
            }
            _ => bail_template!(
                "band {} in task {} must declare exactly one of requirements, sum or best_of",
                band.name,
                self.task
            ),
        }
    }

    fn composite_header(&mut self, band: &BandTemplate, children: &[BandTemplate]) -> Result<()> {
        self.register(&band.name)?;
        if children.is_empty() {
            bail_template!("band {} in task {} has no children", band.name, self.task);
        }
        if band.default.is_some() {
            bail_template!(
                "band {} in task {} is composite and cannot have a default",
                band.name,
                self.task
            );
        }
        Ok(())
    }

    fn register(&mut self, name: &str) -> Result<()> {
        check_name("band", name)?;
        let lower = name.to_lowercase();
        if lower == "cid" || lower.starts_with("avg") || lower.starts_with("comment") {
            bail_template!("band name {name} is reserved by the marks table");
        }
        if !self.seen.insert(name.to_string()) {
            bail_template!("duplicate band name {} in task {}", name, self.task);
        }
        Ok(())
    }

    fn leaf(&mut self, band: &BandTemplate, templates: &[RequirementTemplate]) -> Result<LeafBand> {
        self.register(&band.name)?;
        if templates.is_empty() {
            bail_template!("band {} in task {} has no requirements", band.name, self.task);
        }

        let mut requirements = templates
            .iter()
            .enumerate()
            .map(|(i, r)| self.requirement(&band.name, i, r))
            .collect::<Result<Vec<_>>>()?;
        self.resolve_marks(&band.name, templates, &mut requirements)?;

        let default = match band.default {
            Some(index) => index,
            None => requirements
                .iter()
                .position(|r| !r.is_empty())
                .unwrap_or(requirements.len()),
        };
        let mut leaf = LeafBand::new(&band.name, requirements, 0);
        leaf.select(default).map_err(|e| {
            BandmarkError::template(format!(
                "bad default for band {} in task {}: {}",
                band.name, self.task, e
            ))
        })?;
        Ok(leaf)
    }

    fn requirement(
        &self,
        band: &str,
        index: usize,
        template: &RequirementTemplate,
    ) -> Result<Requirement> {
        let name = template
            .name
            .clone()
            .or_else(|| self.headings.get(index).cloned())
            .unwrap_or_else(|| format!("Level {index}"));

        let kind = match (&template.direct, template.defer, template.empty) {
            // Marks are filled in once the deferral runs are known
            (Some(description), None, false) => RequirementKind::Direct {
                marks: 0,
                description: description.clone(),
            },
            (None, Some(DeferDirection::Up), false) => RequirementKind::DeferredUp,
            (None, Some(DeferDirection::Down), false) => RequirementKind::DeferredDown,
            (None, None, true) => RequirementKind::Empty,
            _ => bail_template!(
                "requirement {} of band {} in task {} needs exactly one of direct, defer or empty",
                index,
                band,
                self.task
            ),
        };
        if template.marks.is_some() && !matches!(kind, RequirementKind::Direct { .. }) {
            bail_template!(
                "requirement {} of band {} in task {} has marks but is not direct",
                index,
                band,
                self.task
            );
        }
        Ok(Requirement { name, kind })
    }

    /// Give every direct requirement its marks and check the ladder
    fn resolve_marks(
        &self,
        band: &str,
        templates: &[RequirementTemplate],
        requirements: &mut [Requirement],
    ) -> Result<()> {
        for index in 0..requirements.len() {
            if requirements[index].is_empty() {
                continue;
            }
            let range = deferral::span(requirements, index);
            if deferral::anchor(requirements, range).is_none() {
                bail_template!(
                    "requirement {} of band {} in task {} does not defer to a direct requirement",
                    index,
                    band,
                    self.task
                );
            }
            if let RequirementKind::Direct { marks, .. } = &mut requirements[index].kind {
                *marks = templates[index]
                    .marks
                    .unwrap_or(Marks::try_from(range.high).unwrap_or(Marks::MAX));
            }
        }

        let mut previous: Option<Marks> = None;
        for (index, marks) in requirements
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.direct_marks().map(|m| (i, m)))
        {
            if previous.is_some_and(|p| marks < p) {
                bail_template!(
                    "requirement {} of band {} in task {} awards fewer marks than a lower level",
                    index,
                    band,
                    self.task
                );
            }
            previous = Some(marks);
        }
        Ok(())
    }
}

/// Names become table cells, so they must survive a round trip
fn check_name(context: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail_template!("{context} name is empty");
    }
    if name.trim() != name {
        bail_template!("{context} name {name:?} has surrounding whitespace");
    }
    if name.contains('|') || name.contains('\n') || name.contains('\r') {
        bail_template!("{context} name {name:?} contains a table delimiter or newline");
    }
    Ok(())
}
