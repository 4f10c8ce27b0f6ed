//! Helper functions shared across commands

use std::fs;
use std::path::Path;
use std::time::Instant;

use bandmark_core::error::{BandmarkError, Result};
use bandmark_core::markdown::ParseReport;
use bandmark_core::rubric::Rubric;
use bandmark_core::trace_time;

/// Read a marks file
pub fn read_marks(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| BandmarkError::io_operation("read marks file", path.display(), e))
}

/// Apply the marks file at `path` to `rubric`, returning the file's text
pub fn load_marks(rubric: &mut Rubric, path: &Path) -> Result<(String, ParseReport)> {
    let text = read_marks(path)?;
    let start = Instant::now();
    let report = rubric.load_markdown(&text);
    trace_time!(start, "parse_marks", rows = report.applied);
    tracing::debug!(
        path = %path.display(),
        applied = report.applied,
        issues = report.issues.len(),
        "loaded marks"
    );
    Ok((text, report))
}

/// Like `load_marks`, but a missing file leaves the rubric untouched
pub fn load_marks_if_present(rubric: &mut Rubric, path: &Path) -> Result<ParseReport> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no marks file yet");
        return Ok(ParseReport::default());
    }
    load_marks(rubric, path).map(|(_, report)| report)
}

/// Write the rubric's marks table to `path`, creating parent directories
pub fn write_marks(rubric: &Rubric, path: &Path) -> Result<()> {
    let text = rubric.to_markdown()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| BandmarkError::io_operation("create marks directory", dir.display(), e))?;
    }
    fs::write(path, text)
        .map_err(|e| BandmarkError::io_operation("write marks file", path.display(), e))?;
    tracing::debug!(path = %path.display(), "wrote marks");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bandmark_core::template::RubricTemplate;
    use tempfile::tempdir;

    fn rubric() -> Rubric {
        let template = RubricTemplate::from_yaml(
            r#"
year: 2024
semester: 1
stage: pf
tasks:
  - name: dt1
    bands:
      - name: a
        requirements:
          - direct: Not attempted
          - direct: Works
"#,
        )
        .unwrap();
        Rubric::from_template(Arc::new(template)).unwrap()
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("4412345").join("pf").join("marks.md");

        let mut graded = rubric();
        graded.update_mark("dt1", "a", 1).unwrap();
        write_marks(&graded, &path).unwrap();

        let mut loaded = rubric();
        let (text, report) = load_marks(&mut loaded, &path).unwrap();
        assert!(report.is_clean());
        assert_eq!(text, graded.to_markdown().unwrap());
        assert_eq!(loaded, graded);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("marks.md");

        let mut fresh = rubric();
        let report = load_marks_if_present(&mut fresh, &path).unwrap();
        assert_eq!(report.applied, 0);
        assert!(matches!(
            read_marks(&path),
            Err(BandmarkError::FailedOperation { .. })
        ));
    }
}
