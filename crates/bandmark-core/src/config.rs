//! Configuration for bandmark
//!
//! Looked up, first match wins: an explicit `--config` path, `bandmark.toml`
//! in the working root, then `config.toml` in `$BANDMARK_CONFIG_DIR` or the
//! platform config directory (`~/.config/bandmark/` on Linux). No file means
//! defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BandmarkError, Result};
use crate::template::DEFAULT_HEADINGS;

const CONFIG_DIR: &str = "bandmark";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "BANDMARK_CONFIG_DIR";

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "bandmark.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandmarkConfig {
    /// Directory holding rubric templates
    #[serde(default = "default_criteria_dir")]
    pub criteria_dir: PathBuf,

    /// Root of the per-student marks checkouts
    #[serde(default = "default_marks_dir")]
    pub marks_dir: PathBuf,

    /// Name of the marks file inside a stage directory
    #[serde(default = "default_marks_file")]
    pub marks_file: String,

    /// Requirement names by index for templates that declare none
    #[serde(default = "default_headings")]
    pub headings: Vec<String>,
}

fn default_criteria_dir() -> PathBuf {
    PathBuf::from("criteria")
}

fn default_marks_dir() -> PathBuf {
    PathBuf::from("marks")
}

fn default_marks_file() -> String {
    "marks.md".to_string()
}

fn default_headings() -> Vec<String> {
    DEFAULT_HEADINGS.iter().map(|h| h.to_string()).collect()
}

impl Default for BandmarkConfig {
    fn default() -> Self {
        BandmarkConfig {
            criteria_dir: default_criteria_dir(),
            marks_dir: default_marks_dir(),
            marks_file: default_marks_file(),
            headings: default_headings(),
        }
    }
}

impl BandmarkConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| BandmarkError::io_operation("read config", path.display(), e))?;
        let config: BandmarkConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                BandmarkError::io_operation("create config directory", dir.display(), e)
            })?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| BandmarkError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load from the explicit path, or the first config file found
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        for path in Self::search_paths(root) {
            if path.is_file() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    fn search_paths(root: &Path) -> Vec<PathBuf> {
        let mut paths = vec![root.join(LOCAL_CONFIG_FILE)];
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            paths.push(PathBuf::from(dir).join(CONFIG_FILE));
        } else if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(CONFIG_DIR).join(CONFIG_FILE));
        }
        paths
    }

    /// Resolve a possibly relative path against the directory `base`
    pub fn resolve(base: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }
}
