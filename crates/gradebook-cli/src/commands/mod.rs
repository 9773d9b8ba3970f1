pub mod course;
pub mod init;
pub mod report;
pub mod term;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use gradebook_core::config::{load_config_from, GradebookConfig};
use gradebook_core::model::Snapshot;
use gradebook_core::parser::load_snapshot;

/// Config plus the snapshot it points at.
pub struct Session {
    pub config: GradebookConfig,
    pub snapshot: Snapshot,
    pub data_path: PathBuf,
}

impl Session {
    /// Resolve the snapshot path (`--data` wins over the config) and load both.
    pub fn load(data: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self> {
        let config = load_config_from(config_path.as_deref())?;
        let data_path = data
            .or_else(|| config.data.clone())
            .context("no snapshot file given; pass --data or set `data` in gradebook.toml")?;
        let snapshot = load_snapshot(&data_path)?;
        tracing::debug!(
            path = %data_path.display(),
            courses = snapshot.courses.len(),
            items = snapshot.items.len(),
            "loaded snapshot"
        );
        Ok(Self {
            config,
            snapshot,
            data_path,
        })
    }
}

pub fn today_or(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

pub fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}%"))
}
