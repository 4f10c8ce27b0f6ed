//! Path resolution utilities for CLI commands

use std::env;
use std::path::{Path, PathBuf};

use bandmark_core::error::{BandmarkError, Result};

/// Resolve the root path for config and data lookup.
///
/// If a root path is provided, returns it. Otherwise, falls back to the
/// current working directory, or "." if that cannot be determined.
pub fn resolve_root_path(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Directory name a stage's marks live under: `pf` or `s<N>`
pub fn stage_dir(stage: &str) -> String {
    let stage = stage.trim().to_lowercase();
    if stage.chars().all(|c| c.is_ascii_digit()) && !stage.is_empty() {
        format!("s{stage}")
    } else {
        stage
    }
}

/// `<marks_dir>/<student number>/<stage dir>/<marks_file>`
///
/// Accepts the student number with or without its leading `s`.
pub fn student_marks_path(
    marks_dir: &Path,
    student: &str,
    stage: &str,
    marks_file: &str,
) -> Result<PathBuf> {
    let digits = student
        .trim()
        .strip_prefix(['s', 'S'])
        .unwrap_or(student.trim());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(BandmarkError::invalid_value("student number", student));
    }
    Ok(marks_dir
        .join(digits)
        .join(stage_dir(stage))
        .join(marks_file))
}
