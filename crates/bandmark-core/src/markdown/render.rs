use std::collections::{BTreeMap, BTreeSet};
use std::iter;

use super::{escape_cell, ALIGNMENT, AVG_KEY, COMMENTS_KEY, HEADER_KEY, MISSING};
use crate::error::Result;
use crate::rubric::{Marks, Rubric, Task};

/// Render the rubric's marks table.
///
/// Output depends only on rubric state: tasks in template order, band rows
/// sorted by name. A rubric without tasks renders as an empty string.
pub fn serialize(rubric: &Rubric) -> Result<String> {
    if rubric.tasks.is_empty() {
        return Ok(String::new());
    }

    let marks = rubric
        .tasks
        .iter()
        .map(Task::marks_by_band)
        .collect::<Result<Vec<BTreeMap<String, Marks>>>>()?;
    let bands: BTreeSet<&str> = marks
        .iter()
        .flat_map(|m| m.keys().map(String::as_str))
        .collect();

    let mut out = String::new();
    push_row(
        &mut out,
        iter::once(HEADER_KEY.to_string()).chain(rubric.tasks.iter().map(|t| escape_cell(&t.name))),
    );
    push_row(&mut out, vec![ALIGNMENT.to_string(); rubric.tasks.len() + 1]);

    for band in bands {
        let cells = marks.iter().map(|m| match m.get(band) {
            Some(mark) => mark.to_string(),
            None => MISSING.to_string(),
        });
        push_row(
            &mut out,
            iter::once(format!("{}.", escape_cell(band))).chain(cells),
        );
    }

    let mut averages = vec![AVG_KEY.to_string()];
    for task in &rubric.tasks {
        averages.push(if task.bands.is_empty() {
            MISSING.to_string()
        } else {
            format!("{:.1}", task.calc_marks()?)
        });
    }
    push_row(&mut out, averages);

    push_row(
        &mut out,
        iter::once(COMMENTS_KEY.to_string())
            .chain(rubric.tasks.iter().map(|t| escape_cell(&t.comment))),
    );

    Ok(out)
}

fn push_row(out: &mut String, cells: impl IntoIterator<Item = String>) {
    let cells: Vec<String> = cells.into_iter().collect();
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::{Band, Composite, LeafBand, Requirement};
    use crate::template::RubricTemplate;
    use std::sync::Arc;

    fn ladder(name: &str, chosen: usize) -> LeafBand {
        LeafBand::new(
            name,
            (0..=5)
                .map(|m| Requirement::direct(format!("L{m}"), m, ""))
                .collect(),
            chosen,
        )
    }

    fn rubric(tasks: Vec<Task>) -> Rubric {
        let template = RubricTemplate::from_yaml("year: 2024\nsemester: 1\nstage: pf\n").unwrap();
        Rubric::new(Arc::new(template), tasks)
    }

    #[test]
    fn test_serialize_table_shape() {
        let mut dt1 = Task::new(
            "dt1",
            "",
            vec![Band::Leaf(ladder("b", 2)), Band::Leaf(ladder("a", 3))],
        );
        dt1.update_comment("tidy | clear\nwell done");
        let dt2 = Task::new("dt2", "", vec![Band::Leaf(ladder("a", 4))]);
        let empty = Task::new("mylib", "", Vec::new());

        let text = serialize(&rubric(vec![dt1, dt2, empty])).unwrap();
        assert_eq!(
            text,
            "| cid | dt1 | dt2 | mylib |\n\
             | -- | -- | -- | -- |\n\
             | a. | 3 | 4 | - |\n\
             | b. | 2 | - | - |\n\
             | avg. | 2.5 | 4.0 | - |\n\
             | comments | tidy \\| clear<br>well done |  |  |\n"
        );
    }

    #[test]
    fn test_serialize_includes_nested_bands() {
        let task = Task::new(
            "dt1",
            "",
            vec![Band::BestOf(Composite::new(
                "design",
                vec![ladder("layout", 1), ladder("naming", 4)],
            ))],
        );
        let text = serialize(&rubric(vec![task])).unwrap();
        let keys: Vec<_> = text
            .lines()
            .filter_map(|l| l.split('|').nth(1).map(str::trim))
            .collect();
        assert_eq!(
            keys,
            ["cid", "--", "design.", "layout.", "naming.", "avg.", "comments"]
        );
        assert!(text.contains("| design. | 1 |"));
    }

    #[test]
    fn test_serialize_empty_rubric() {
        assert_eq!(serialize(&rubric(Vec::new())).unwrap(), "");
    }

    #[test]
    fn test_serialize_fails_on_unresolvable_band() {
        let task = Task::new("dt1", "", vec![Band::Leaf(ladder("a", 9))]);
        assert!(serialize(&rubric(vec![task])).is_err());
    }
}
