//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::GradebookError;
use crate::statistics::DEFAULT_RANGE_FLOOR;
use crate::traits::{default_cutoffs, Cutoff, CutoffScale};

/// Top-level gradebook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradebookConfig {
    /// Default snapshot file.
    #[serde(default)]
    pub data: Option<PathBuf>,
    /// Lowest value shown for a course's worst-case grade.
    #[serde(default = "default_range_floor")]
    pub range_floor: f64,
    /// Credits assumed for courses that do not record any.
    #[serde(default = "default_credits")]
    pub default_credits: f64,
    /// Minimum grade for a course's credits to count as earned.
    #[serde(default = "default_passing_grade")]
    pub passing_grade: f64,
    /// Percentage cutoffs for GPA conversion, highest first.
    #[serde(default = "default_cutoffs")]
    pub gpa_scale: Vec<Cutoff>,
}

fn default_range_floor() -> f64 {
    DEFAULT_RANGE_FLOOR
}
fn default_credits() -> f64 {
    0.5
}
fn default_passing_grade() -> f64 {
    50.0
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            data: None,
            range_floor: default_range_floor(),
            default_credits: default_credits(),
            passing_grade: default_passing_grade(),
            gpa_scale: default_cutoffs(),
        }
    }
}

impl GradebookConfig {
    /// Check values the engine relies on.
    pub fn validate(&self) -> Result<(), GradebookError> {
        if !(0.0..=100.0).contains(&self.range_floor) {
            return Err(GradebookError::InvalidRangeFloor(self.range_floor));
        }
        self.scale().map(|_| ())
    }

    /// GPA scale built from `gpa_scale`.
    pub fn scale(&self) -> Result<CutoffScale, GradebookError> {
        CutoffScale::new(self.gpa_scale.clone())
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `gradebook.toml` in the current directory
/// 2. `~/.config/gradebook/config.toml`
///
/// Environment variable overrides: `GRADEBOOK_DATA`, `GRADEBOOK_RANGE_FLOOR`.
pub fn load_config_from(path: Option<&Path>) -> Result<GradebookConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradebook.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradebookConfig::default(),
    };

    // Apply env var overrides
    if let Ok(data) = std::env::var("GRADEBOOK_DATA") {
        if !data.is_empty() {
            config.data = Some(PathBuf::from(data));
        }
    }
    if let Ok(floor) = std::env::var("GRADEBOOK_RANGE_FLOOR") {
        match floor.trim().parse::<f64>() {
            Ok(value) => config.range_floor = value,
            Err(_) => tracing::warn!("ignoring GRADEBOOK_RANGE_FLOOR={floor:?}: not a number"),
        }
    }

    config.validate()?;
    Ok(config)
}

/// Parse a TOML string into a `GradebookConfig` without validating it.
pub fn parse_config_str(content: &str) -> Result<GradebookConfig> {
    Ok(toml::from_str::<GradebookConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradebook"))
}
