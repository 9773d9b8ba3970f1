//! The `gradebook term` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Cell, Table};

use gradebook_core::report::{GradeReport, TermReport};
use gradebook_core::statistics::CourseStanding;

use super::{pct, today_or, Session};

pub fn execute(
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    term: Option<String>,
    goal: Option<f64>,
    today: Option<NaiveDate>,
    format: String,
) -> Result<()> {
    if let Some(g) = goal {
        anyhow::ensure!(g.is_finite(), "goal must be a number");
    }
    let session = Session::load(data, config)?;
    let scale = session.config.scale()?;
    let today = today_or(today);

    let report = GradeReport::build(&session.snapshot, &session.config, &scale, today);

    let mut terms: Vec<TermReport> = match &term {
        Some(name) => {
            let found = report
                .terms
                .iter()
                .find(|t| t.term.eq_ignore_ascii_case(name.trim()))
                .cloned();
            match found {
                Some(t) => vec![t],
                None => anyhow::bail!("no courses in term {name:?}"),
            }
        }
        None => report.terms.clone(),
    };

    if goal.is_some() {
        for t in &mut terms {
            let standings: Vec<CourseStanding> = t
                .course_ids
                .iter()
                .filter_map(|id| report.course(id))
                .map(|c| c.standing.clone())
                .collect();
            *t = TermReport::build(&t.term, &standings, goal, &scale, &session.config, today);
        }
    }

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&terms)?),
        _ => {
            for t in &terms {
                print_term(t, &report);
            }
            if term.is_none() {
                let cum = &report.cumulative;
                println!(
                    "Cumulative: average {}, GPA {}, {} of {} credits earned",
                    pct(cum.average),
                    cum.gpa.map_or_else(|| "-".to_string(), |g| format!("{g:.2}")),
                    cum.credits_earned,
                    cum.credits_attempted
                );
            }
        }
    }

    Ok(())
}

fn print_term(term: &TermReport, report: &GradeReport) {
    println!("{} ({:.0}% elapsed)", term.term, term.time_progress);

    let mut table = Table::new();
    table.set_header(vec!["Course", "Credits", "Grade", "Min", "Max", "Completed"]);
    for id in &term.course_ids {
        let Some(course) = report.course(id) else {
            continue;
        };
        let completed = course
            .standing
            .tracked()
            .and_then(|r| {
                (r.total_scheme_weight > 0.0)
                    .then(|| r.total_weight_completed / r.total_scheme_weight * 100.0)
            });
        table.add_row(vec![
            Cell::new(&course.code),
            Cell::new(course.credits),
            Cell::new(pct(course.displayed_grade)),
            Cell::new(pct(course.range.map(|r| r.min))),
            Cell::new(pct(course.range.map(|r| r.max))),
            Cell::new(pct(completed)),
        ]);
    }
    println!("{table}");

    let r = &term.result;
    println!(
        "Average: {}  GPA: {}  Range: {} to {}  Weight completed: {:.1}%",
        pct(r.average),
        r.gpa.map_or_else(|| "-".to_string(), |g| format!("{g:.2}")),
        pct(r.min),
        pct(r.max),
        r.weight_completed_percent
    );
    if let Some(goal) = term.goal {
        match r.required_average {
            Some(required) => {
                let status = term
                    .goal_status
                    .map(|s| format!(" ({s})"))
                    .unwrap_or_default();
                println!("Goal {goal:.1}%: need {required:.1}% on remaining work{status}");
            }
            None => println!("Goal {goal:.1}%: nothing left to grade"),
        }
    }
    println!();
}
