//! Argument groups shared by several commands

use clap::Args;
use std::path::PathBuf;

/// Which rubric template to grade against
#[derive(Args, Debug, Default, Clone)]
pub struct TemplateArgs {
    /// Template file (takes precedence over --year/--semester/--stage)
    #[arg(long, global = true)]
    pub template: Option<PathBuf>,

    /// Template year, looked up in the criteria directory
    #[arg(long, global = true)]
    pub year: Option<String>,

    /// Template semester
    #[arg(long, global = true)]
    pub semester: Option<String>,

    /// Template stage (e.g. pf, s1)
    #[arg(long, global = true)]
    pub stage: Option<String>,
}

/// Where the marks file lives
#[derive(Args, Debug, Default, Clone)]
pub struct MarksArgs {
    /// Marks file path
    #[arg(conflicts_with = "student")]
    pub path: Option<PathBuf>,

    /// Student number; resolves <marks_dir>/<number>/<stage>/<marks_file>
    #[arg(long)]
    pub student: Option<String>,
}
