//! The `gradebook course` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradebook_core::error::GradebookError;
use gradebook_core::report::CourseReport;
use gradebook_core::results::{ComponentBasis, SchemeResult};

use super::{pct, Session};

pub fn execute(
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    course_key: String,
    target: Option<f64>,
    format: String,
) -> Result<()> {
    if let Some(t) = target {
        anyhow::ensure!(t.is_finite(), "target must be a number");
    }
    let session = Session::load(data, config)?;
    let course = session
        .snapshot
        .find_course(&course_key)
        .ok_or_else(|| GradebookError::UnknownCourse(course_key.clone()))?;

    let report = CourseReport::build(course, &session.snapshot, &session.config, target);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_course(&report),
    }

    Ok(())
}

fn print_course(report: &CourseReport) {
    let term = if report.term.is_empty() {
        "no term"
    } else {
        report.term.as_str()
    };
    println!("{} ({term}), {} credits", report.code, report.credits);

    if !report.schemes.is_empty() {
        let selected = report.standing.selection.scheme_index;
        let mut table = Table::new();
        table.set_header(vec!["Scheme", "Grade", "Graded", "Completed", "Total"]);
        for (idx, scheme) in report.schemes.iter().enumerate() {
            let marker = if selected == Some(idx) { " *" } else { "" };
            table.add_row(vec![
                Cell::new(format!("{}{marker}", idx + 1)),
                Cell::new(pct(scheme.current_grade)),
                Cell::new(format!("{:.1}", scheme.total_weight_graded)),
                Cell::new(format!("{:.1}", scheme.total_weight_completed)),
                Cell::new(format!("{:.1}", scheme.total_scheme_weight)),
            ]);
        }
        println!("\n{table}");
    }

    if let Some(result) = report.standing.tracked() {
        if !result.components.is_empty() {
            println!("\n{}", component_table(result));
        }
    }

    println!();
    let source = if report.official {
        "official".to_string()
    } else {
        report
            .standing
            .selection
            .scheme_index
            .map(|i| format!("scheme {}", i + 1))
            .unwrap_or_else(|| "no grades yet".to_string())
    };
    println!("Grade: {} ({source})", pct(report.displayed_grade));
    if report.standing.bonus_percent != 0.0 {
        println!("Bonus: {:+.1}%", report.standing.bonus_percent);
    }
    if let Some(range) = report.range {
        println!("Range: {:.1}% to {:.1}%", range.min, range.max);
    }

    if let Some(target) = report.target_grade {
        match report.required_average {
            Some(required) => {
                let status = report
                    .goal_status
                    .map(|s| format!(" ({s})"))
                    .unwrap_or_default();
                println!("Target {target:.1}%: need {required:.1}% on remaining work{status}");
            }
            None => println!("Target {target:.1}%: nothing left to grade"),
        }
    }
}

fn component_table(result: &SchemeResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Component", "Weight", "Score", "Items", "Basis"]);
    for component in &result.components {
        let basis = match &component.basis {
            ComponentBasis::Graded {
                average, dropped, ..
            } if dropped.is_empty() => format!("{:.1}%", average * 100.0),
            ComponentBasis::Graded {
                average, dropped, ..
            } => format!("{:.1}%, {} dropped", average * 100.0, dropped.len()),
            ComponentBasis::AllDropped { dropped } => {
                format!("all {} dropped", dropped.len())
            }
            ComponentBasis::Placeholder { percent } => format!("placeholder {percent:.1}%"),
            ComponentBasis::NoData => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(&component.name),
            Cell::new(format!("{:.1}", component.weight)),
            Cell::new(format!("{:.2}", component.score)),
            Cell::new(format!("{}/{}", component.graded_count, component.item_count)),
            Cell::new(basis),
        ]);
    }
    table
}
