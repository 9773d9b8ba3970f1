//! The `gradebook report` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use gradebook_core::report::GradeReport;

use super::{today_or, Session};

pub fn execute(
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    output: PathBuf,
    format: String,
    today: Option<NaiveDate>,
) -> Result<()> {
    let session = Session::load(data, config)?;
    let scale = session.config.scale()?;
    let report = GradeReport::build(&session.snapshot, &session.config, &scale, today_or(today));

    match format.as_str() {
        "json" => report.save_json(&output)?,
        "markdown" | "md" => {
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, report.to_markdown())
                .with_context(|| format!("failed to write report to {}", output.display()))?;
        }
        other => anyhow::bail!("unknown format: {other} (expected json or markdown)"),
    }

    tracing::info!(id = %report.id, courses = report.courses.len(), "report generated");
    println!("Report written to {}", output.display());
    Ok(())
}
