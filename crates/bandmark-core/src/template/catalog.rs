//! Directory of rubric templates, indexed by year, semester and stage

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::RubricTemplate;
use crate::error::{BandmarkError, Result};

/// A template file found in the catalog directory
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub template: RubricTemplate,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    entries: Vec<CatalogEntry>,
}

impl TemplateCatalog {
    /// Load every `.yaml`/`.yml` file under `dir`.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(BandmarkError::not_found(
                "criteria directory",
                dir.display(),
            ));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path
                .extension()
                .is_some_and(|e| e == "yaml" || e == "yml")
            {
                continue;
            }
            match RubricTemplate::load(path) {
                Ok(template) => entries.push(CatalogEntry {
                    path: path.to_path_buf(),
                    template,
                }),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to load template");
                }
            }
        }

        tracing::debug!(dir = %dir.display(), templates = entries.len(), "loaded template catalog");
        Ok(TemplateCatalog { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Template for one year/semester/stage
    pub fn find(&self, year: &str, semester: &str, stage: &str) -> Result<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| {
                e.template.year == year
                    && e.template.semester == semester
                    && e.template.stage.eq_ignore_ascii_case(stage)
            })
            .ok_or_else(|| {
                BandmarkError::not_found("template", format!("{year}/{semester}/{stage}"))
            })
    }

    pub fn years(&self) -> Vec<&str> {
        distinct(self.entries.iter().map(|e| e.template.year.as_str()))
    }

    pub fn semesters(&self, year: &str) -> Vec<&str> {
        distinct(
            self.entries
                .iter()
                .filter(|e| e.template.year == year)
                .map(|e| e.template.semester.as_str()),
        )
    }

    pub fn stages(&self, year: &str, semester: &str) -> Vec<&str> {
        distinct(
            self.entries
                .iter()
                .filter(|e| e.template.year == year && e.template.semester == semester)
                .map(|e| e.template.stage.as_str()),
        )
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values.collect::<BTreeSet<_>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, year: &str, semester: &str, stage: &str) {
        fs::write(
            dir.join(name),
            format!("year: \"{year}\"\nsemester: \"{semester}\"\nstage: {stage}\ntasks: []\n"),
        )
        .unwrap();
    }

    #[test]
    fn test_load_dir_indexes_templates() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("2024")).unwrap();
        write(dir.path(), "a.yaml", "2023", "2", "pf");
        write(&dir.path().join("2024"), "b.yml", "2024", "1", "pf");
        write(&dir.path().join("2024"), "c.yaml", "2024", "1", "s1");
        fs::write(dir.path().join("notes.txt"), "not a template").unwrap();

        let catalog = TemplateCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.entries().len(), 3);
        assert_eq!(catalog.years(), ["2023", "2024"]);
        assert_eq!(catalog.semesters("2024"), ["1"]);
        assert_eq!(catalog.stages("2024", "1"), ["pf", "s1"]);
        assert_eq!(catalog.semesters("2023"), ["2"]);
        assert_eq!(catalog.stages("2023", "2"), ["pf"]);
        assert!(catalog.semesters("2025").is_empty());
        assert!(catalog.stages("2024", "2").is_empty());

        let found = catalog.find("2024", "1", "S1").unwrap();
        assert!(found.path.ends_with("c.yaml"));
    }

    #[test]
    fn test_broken_template_is_skipped() {
        let dir = tempdir().unwrap();
        write(dir.path(), "good.yaml", "2024", "1", "pf");
        fs::write(dir.path().join("bad.yaml"), "year: [unclosed").unwrap();

        let catalog = TemplateCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.entries().len(), 1);
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let dir = tempdir().unwrap();
        let catalog = TemplateCatalog::load_dir(dir.path()).unwrap();
        assert!(matches!(
            catalog.find("2024", "1", "pf"),
            Err(BandmarkError::NotFound { .. })
        ));
        assert!(TemplateCatalog::load_dir(&dir.path().join("absent")).is_err());
    }
}
