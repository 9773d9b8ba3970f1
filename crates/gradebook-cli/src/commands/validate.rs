//! The `gradebook validate` command.

use std::path::PathBuf;

use anyhow::Result;

use gradebook_core::parser::validate_snapshot;

use super::Session;

pub fn execute(data: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let session = Session::load(data, config)?;
    let snapshot = &session.snapshot;

    println!(
        "Snapshot: {} ({} courses, {} items)",
        session.data_path.display(),
        snapshot.courses.len(),
        snapshot.items.len()
    );

    let warnings = validate_snapshot(snapshot);
    for w in &warnings {
        let prefix = w
            .course_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Snapshot valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
