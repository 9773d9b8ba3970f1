//! Grade report assembly with JSON persistence and markdown output.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::GradebookConfig;
use crate::model::{Course, Snapshot};
use crate::results::{CourseRange, GoalStatus, SchemeResult};
use crate::selector::evaluate_all;
use crate::solver::{classify_goal, required_average};
use crate::statistics::{aggregate, cumulative, AggregateOptions, CourseStanding, CumulativeResult, TermResult};
use crate::term::{group_by_term, term_progress, UNCATEGORIZED};
use crate::traits::GpaScale;

/// Everything known about one course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseReport {
    pub course_id: String,
    pub code: String,
    pub term: String,
    pub credits: f64,
    /// Result of every scheme, in definition order.
    pub schemes: Vec<SchemeResult>,
    pub standing: CourseStanding,
    pub displayed_grade: Option<f64>,
    pub range: Option<CourseRange>,
    pub target_grade: Option<f64>,
    pub required_average: Option<f64>,
    pub goal_status: Option<GoalStatus>,
    pub official: bool,
}

impl CourseReport {
    /// Grade one course. `target` overrides the course's stored target.
    pub fn build(
        course: &Course,
        snapshot: &Snapshot,
        config: &GradebookConfig,
        target: Option<f64>,
    ) -> Self {
        let items = snapshot.items_for(&course.id);
        let schemes = evaluate_all(
            &course.schemes,
            &items,
            &course.drop_lowest,
            &course.placeholder_grades,
        );
        let standing = CourseStanding::from_course(course, &items, config.default_credits);
        let target_grade = target.or(course.grading.target_grade);

        let required = match (standing.tracked(), target_grade) {
            (Some(result), Some(t)) => required_average(result, t, standing.bonus_percent),
            _ => None,
        };
        let displayed_grade = standing.displayed_grade();
        let goal_status = required.zip(displayed_grade).map(|(r, g)| classify_goal(r, g));

        Self {
            course_id: course.id.clone(),
            code: course.code.clone(),
            term: course.term.clone(),
            credits: standing.credits,
            schemes,
            displayed_grade,
            range: standing.range(config.range_floor),
            target_grade,
            required_average: required,
            goal_status,
            official: course.grading.official_grade.is_some(),
            standing,
        }
    }
}

/// Summary of one term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermReport {
    pub term: String,
    pub course_ids: Vec<String>,
    pub goal: Option<f64>,
    pub result: TermResult,
    pub goal_status: Option<GoalStatus>,
    /// Share of the term's calendar elapsed, 0–100.
    pub time_progress: f64,
}

impl TermReport {
    pub fn build(
        term: &str,
        standings: &[CourseStanding],
        goal: Option<f64>,
        scale: &dyn GpaScale,
        config: &GradebookConfig,
        today: NaiveDate,
    ) -> Self {
        let options = AggregateOptions {
            range_floor: config.range_floor,
            target: goal,
        };
        let result = aggregate(standings, scale, &options);
        let goal_status = result
            .required_average
            .zip(result.average)
            .map(|(r, avg)| classify_goal(r, avg));
        let time_progress = if term == UNCATEGORIZED {
            0.0
        } else {
            term_progress(term, today)
        };
        Self {
            term: term.to_string(),
            course_ids: standings.iter().map(|s| s.course_id.clone()).collect(),
            goal,
            result,
            goal_status,
            time_progress,
        }
    }
}

/// A complete grade report for a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub courses: Vec<CourseReport>,
    /// Terms, newest first.
    pub terms: Vec<TermReport>,
    pub cumulative: CumulativeResult,
}

impl GradeReport {
    /// Grade every course and term in a snapshot.
    pub fn build(
        snapshot: &Snapshot,
        config: &GradebookConfig,
        scale: &dyn GpaScale,
        today: NaiveDate,
    ) -> Self {
        let courses: Vec<CourseReport> = snapshot
            .courses
            .iter()
            .map(|c| CourseReport::build(c, snapshot, config, None))
            .collect();

        let terms = group_by_term(&snapshot.courses)
            .into_iter()
            .map(|(term, members)| {
                let standings: Vec<CourseStanding> = members
                    .iter()
                    .filter_map(|m| courses.iter().find(|c| c.course_id == m.id))
                    .map(|c| c.standing.clone())
                    .collect();
                let goal = snapshot.term_goals.get(&term).copied();
                TermReport::build(&term, &standings, goal, scale, config, today)
            })
            .collect();

        let all: Vec<CourseStanding> = courses.iter().map(|c| c.standing.clone()).collect();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            cumulative: cumulative(&all, scale, config.passing_grade),
            courses,
            terms,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    pub fn course(&self, course_id: &str) -> Option<&CourseReport> {
        self.courses.iter().find(|c| c.course_id == course_id)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        let _ = writeln!(
            md,
            "**Cumulative:** average {}, GPA {}, {} of {} credits earned\n",
            pct(self.cumulative.average),
            num(self.cumulative.gpa),
            self.cumulative.credits_earned,
            self.cumulative.credits_attempted
        );

        for term in &self.terms {
            let _ = writeln!(md, "### {}\n", term.term);
            let r = &term.result;
            let _ = writeln!(
                md,
                "Average {} · GPA {} · range {}–{} · {:.1}% weight completed · {:.1}% of term elapsed\n",
                pct(r.average),
                num(r.gpa),
                pct(r.min),
                pct(r.max),
                r.weight_completed_percent,
                term.time_progress
            );
            if let (Some(goal), Some(req)) = (term.goal, r.required_average) {
                let status = term
                    .goal_status
                    .map(|s| format!(" ({s})"))
                    .unwrap_or_default();
                let _ = writeln!(md, "Goal {goal:.1}%: need {req:.1}% on remaining work{status}\n");
            }

            md.push_str("| Course | Credits | Grade | Min | Max | Scheme |\n");
            md.push_str("|--------|---------|-------|-----|-----|--------|\n");
            for id in &term.course_ids {
                let Some(c) = self.course(id) else { continue };
                let scheme = if c.official {
                    "official".to_string()
                } else {
                    c.standing
                        .selection
                        .scheme_index
                        .map(|i| (i + 1).to_string())
                        .unwrap_or_else(|| "-".into())
                };
                let _ = writeln!(
                    md,
                    "| {} | {} | {} | {} | {} | {} |",
                    c.code,
                    c.credits,
                    pct(c.displayed_grade),
                    pct(c.range.map(|r| r.min)),
                    pct(c.range.map(|r| r.max)),
                    scheme
                );
            }
            md.push('\n');
        }

        md
    }
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}%"))
}

fn num(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}
