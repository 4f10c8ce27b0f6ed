use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};

/// Two tasks: `a` defers its second level up, `b` has explicit marks
pub const TEMPLATE: &str = r#"
year: 2024
semester: 1
stage: pf
tasks:
  - name: dt1
    description: Movement
    bands:
      - name: a
        requirements:
          - direct: Not attempted
          - defer: up
          - direct: Partly works
          - direct: Works
      - name: b
        requirements:
          - direct: Not attempted
          - direct: Works
            marks: 3
  - name: dt2
    description: Library
    bands:
      - name: c
        requirements:
          - direct: No
          - direct: Yes
"#;

/// Table of a rubric built from `TEMPLATE` with nothing graded
#[allow(dead_code)]
pub const FRESH_TABLE: &str = "| cid | dt1 | dt2 |\n\
                               | -- | -- | -- |\n\
                               | a. | 0 | - |\n\
                               | b. | 0 | - |\n\
                               | c. | - | 0 |\n\
                               | avg. | 0.0 | 0.0 |\n\
                               | comments |  |  |\n";

/// Get a Command for bandmark, isolated from any user config
pub fn bandmark(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("bandmark");
    cmd.current_dir(dir)
        .env("BANDMARK_CONFIG_DIR", dir.join(".no-user-config"))
        .env_remove("RUST_LOG")
        .env_remove("BANDMARK_LOG");
    cmd
}

/// Write a template into `<dir>/criteria/<file>`
pub fn write_template(dir: &Path, file: &str, yaml: &str) -> PathBuf {
    let criteria = dir.join("criteria");
    fs::create_dir_all(&criteria).unwrap();
    let path = criteria.join(file);
    fs::write(&path, yaml).unwrap();
    path
}

/// A criteria directory holding only `TEMPLATE`
pub fn setup_criteria(dir: &Path) -> PathBuf {
    write_template(dir, "2024-1-pf.yaml", TEMPLATE)
}
