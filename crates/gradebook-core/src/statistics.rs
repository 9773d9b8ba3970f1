//! Term and cumulative aggregation.
//!
//! Rolls per-course selections up into credit-weighted averages, GPA,
//! best/worst-case ranges and weight completion.

use serde::{Deserialize, Serialize};

use crate::model::{Course, Item};
use crate::results::{CourseRange, SchemeResult, Selection};
use crate::selector::{display_index, evaluate_all, select_from};
use crate::solver::term_required_average;
use crate::traits::GpaScale;

/// Default lower bound for the best/worst-case range.
pub const DEFAULT_RANGE_FLOOR: f64 = 32.0;

/// A course's selected result together with what aggregation needs to weigh it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStanding {
    pub course_id: String,
    pub code: String,
    pub credits: f64,
    /// Bonus applied on top of computed grades (0 under an official grade).
    pub bonus_percent: f64,
    pub selection: Selection,
    /// Result of the displayed scheme while nothing is graded yet. The
    /// course is still in progress: all of its weight remains.
    #[serde(default)]
    pub pending: Option<SchemeResult>,
}

impl CourseStanding {
    /// Grade a course and capture its standing. `items` may contain other
    /// courses' items; only this course's are used.
    pub fn from_course(course: &Course, items: &[Item], default_credits: f64) -> Self {
        let own: Vec<Item> = items
            .iter()
            .filter(|i| i.course_id == course.id)
            .cloned()
            .collect();
        tracing::debug!(course = %course.id, items = own.len(), "calculating course grade");
        let results = evaluate_all(
            &course.schemes,
            &own,
            &course.drop_lowest,
            &course.placeholder_grades,
        );
        let shown = display_index(&results, &course.grading).map(|idx| results[idx].clone());
        let selection = select_from(results, &course.grading);
        let pending = if selection.result.is_none() { shown } else { None };
        Self {
            course_id: course.id.clone(),
            code: course.code.clone(),
            credits: course.credits_or(default_credits),
            bonus_percent: course.grading.effective_bonus(),
            selection,
            pending,
        }
    }

    /// The selected result, `None` until something is graded.
    pub fn result(&self) -> Option<&SchemeResult> {
        self.selection.result.as_ref()
    }

    /// The selected result, or the displayed scheme's ungraded result.
    /// `None` only for a course without schemes.
    pub fn tracked(&self) -> Option<&SchemeResult> {
        self.result().or(self.pending.as_ref())
    }

    /// Selected grade with bonus applied, capped at 100.
    pub fn displayed_grade(&self) -> Option<f64> {
        self.result()
            .and_then(|r| r.displayed_grade(self.bonus_percent))
    }

    pub fn range(&self, floor: f64) -> Option<CourseRange> {
        self.tracked().map(|r| course_range(r, self.bonus_percent, floor))
    }
}

/// Worst and best final percentage still possible for a course.
///
/// `min` assumes zero on everything left, `max` assumes full marks. `min`
/// is raised to `floor`; both are capped at 100.
pub fn course_range(result: &SchemeResult, bonus_percent: f64, floor: f64) -> CourseRange {
    let secured = result.current_score + bonus_percent;
    CourseRange {
        min: secured.max(floor).min(100.0),
        max: (secured + result.remaining_weight()).max(0.0).min(100.0),
    }
}

/// Knobs for term aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOptions {
    pub range_floor: f64,
    /// Goal for the term average, used to solve for the required average.
    pub target: Option<f64>,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            range_floor: DEFAULT_RANGE_FLOOR,
            target: None,
        }
    }
}

/// Credit-weighted summary of one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermResult {
    pub average: Option<f64>,
    pub gpa: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub weight_completed_percent: f64,
    pub required_average: Option<f64>,
    /// Credits of courses that have a grade.
    pub graded_credits: f64,
    pub course_count: usize,
}

#[derive(Default)]
struct WeightedMean {
    sum: f64,
    credits: f64,
}

impl WeightedMean {
    fn add(&mut self, value: f64, credits: f64) {
        self.sum += value * credits;
        self.credits += credits;
    }

    fn mean(&self) -> Option<f64> {
        (self.credits > 0.0).then(|| self.sum / self.credits)
    }
}

/// Aggregate the courses of one term.
///
/// Ungraded courses with a scheme count towards the range and weight
/// completed; only graded courses count towards the average and GPA.
/// Courses without any scheme are counted in `course_count` only.
pub fn aggregate(
    standings: &[CourseStanding],
    scale: &dyn GpaScale,
    options: &AggregateOptions,
) -> TermResult {
    let mut average = WeightedMean::default();
    let mut gpa = WeightedMean::default();
    let mut min = WeightedMean::default();
    let mut max = WeightedMean::default();
    let mut completed = 0.0;
    let mut scheme_weight = 0.0;
    let mut graded_credits = 0.0;

    for standing in standings {
        let Some(result) = standing.tracked() else {
            continue;
        };
        let credits = standing.credits;

        if let Some(grade) = standing.displayed_grade() {
            graded_credits += credits;
            average.add(grade, credits);
            gpa.add(scale.grade_to_gpa(grade), credits);
        }

        let range = course_range(result, standing.bonus_percent, options.range_floor);
        min.add(range.min, credits);
        max.add(range.max, credits);

        completed += result.total_weight_completed * credits;
        scheme_weight += result.total_scheme_weight * credits;
    }

    let weight_completed_percent = if scheme_weight > 0.0 {
        completed / scheme_weight * 100.0
    } else {
        0.0
    };

    TermResult {
        average: average.mean(),
        gpa: gpa.mean(),
        min: min.mean(),
        max: max.mean(),
        weight_completed_percent,
        required_average: options
            .target
            .and_then(|t| term_required_average(standings, t)),
        graded_credits,
        course_count: standings.len(),
    }
}

/// Summary across every course a student has taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeResult {
    /// Cumulative average (CAV).
    pub average: Option<f64>,
    /// Cumulative GPA (CGPA).
    pub gpa: Option<f64>,
    pub credits_attempted: f64,
    /// Credits of courses at or above the passing grade.
    pub credits_earned: f64,
}

/// Cumulative average, GPA and earned credits.
///
/// A course counts as earned if either its displayed grade or the share of
/// the whole scheme already secured reaches `passing_grade`.
pub fn cumulative(
    standings: &[CourseStanding],
    scale: &dyn GpaScale,
    passing_grade: f64,
) -> CumulativeResult {
    let mut average = WeightedMean::default();
    let mut gpa = WeightedMean::default();
    let mut credits_earned = 0.0;

    for standing in standings {
        let Some(result) = standing.result() else {
            continue;
        };
        let grade = standing.displayed_grade();
        if let Some(grade) = grade {
            average.add(grade, standing.credits);
            gpa.add(scale.grade_to_gpa(grade), standing.credits);
        }

        let passes = grade.is_some_and(|g| g >= passing_grade)
            || result
                .secured_percent()
                .is_some_and(|p| p >= passing_grade);
        if passes {
            credits_earned += standing.credits;
        }
    }

    CumulativeResult {
        average: average.mean(),
        gpa: gpa.mean(),
        credits_attempted: average.credits,
        credits_earned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, CourseGradingConfig};
    use crate::traits::CutoffScale;

    fn result(score: f64, graded: f64, total: f64) -> SchemeResult {
        SchemeResult {
            current_grade: (graded > 0.0).then(|| score / graded * 100.0),
            current_score: score,
            total_weight_graded: graded,
            total_scheme_weight: total,
            total_weight_completed: graded,
            dropped_item_ids: vec![],
            components: vec![],
        }
    }

    fn standing(credits: f64, bonus: f64, r: Option<SchemeResult>) -> CourseStanding {
        CourseStanding {
            course_id: "c".into(),
            code: "C".into(),
            credits,
            bonus_percent: bonus,
            selection: Selection {
                result: r,
                scheme_index: Some(0),
            },
            pending: None,
        }
    }

    fn ungraded(credits: f64, total: f64) -> CourseStanding {
        CourseStanding {
            pending: Some(result(0.0, 0.0, total)),
            ..standing(credits, 0.0, None)
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn range_clamps_to_floor_and_hundred() {
        let r = result(10.0, 20.0, 100.0);
        let range = course_range(&r, 0.0, 32.0);
        assert_eq!(range.min, 32.0);
        assert_eq!(range.max, 90.0);

        let r = result(70.0, 80.0, 100.0);
        let range = course_range(&r, 15.0, 32.0);
        assert_eq!(range.min, 85.0);
        assert_eq!(range.max, 100.0);
    }

    #[test]
    fn range_floor_is_configurable() {
        let r = result(10.0, 20.0, 100.0);
        assert_eq!(course_range(&r, 0.0, 0.0).min, 10.0);
    }

    #[test]
    fn credit_weighted_average_and_gpa() {
        let courses = vec![
            standing(1.0, 0.0, Some(result(90.0, 100.0, 100.0))),
            standing(0.5, 0.0, Some(result(60.0, 100.0, 100.0))),
            standing(0.5, 0.0, None),
        ];
        let term = aggregate(&courses, &CutoffScale::default(), &AggregateOptions::default());
        assert!(close(term.average.unwrap(), 80.0));
        // (4.0*1 + 1.7*0.5) / 1.5
        assert!(close(term.gpa.unwrap(), (4.0 + 0.85) / 1.5));
        assert_eq!(term.course_count, 3);
        assert_eq!(term.graded_credits, 1.5);
        assert!(close(term.weight_completed_percent, 100.0));
        assert_eq!(term.required_average, None);
    }

    #[test]
    fn injected_gpa_scale() {
        let courses = vec![standing(1.0, 0.0, Some(result(80.0, 100.0, 100.0)))];
        let scale = |p: f64| p / 20.0;
        let term = aggregate(&courses, &scale, &AggregateOptions::default());
        assert!(close(term.gpa.unwrap(), 4.0));
    }

    #[test]
    fn weight_completed_is_credit_weighted() {
        let courses = vec![
            standing(1.0, 0.0, Some(result(40.0, 50.0, 100.0))),
            standing(0.5, 0.0, Some(result(10.0, 10.0, 100.0))),
        ];
        let term = aggregate(&courses, &CutoffScale::default(), &AggregateOptions::default());
        // (50*1 + 10*0.5) / (100*1.5) * 100
        assert!(close(term.weight_completed_percent, 55.0 / 150.0 * 100.0));
    }

    #[test]
    fn min_max_are_credit_weighted_means() {
        let courses = vec![
            standing(1.0, 0.0, Some(result(40.0, 50.0, 100.0))),
            standing(1.0, 0.0, Some(result(60.0, 60.0, 100.0))),
        ];
        let term = aggregate(&courses, &CutoffScale::default(), &AggregateOptions::default());
        assert!(close(term.min.unwrap(), 50.0));
        assert!(close(term.max.unwrap(), 95.0));
    }

    #[test]
    fn term_target_solves_required_average() {
        let courses = vec![standing(1.0, 0.0, Some(result(45.0, 50.0, 100.0)))];
        let options = AggregateOptions {
            target: Some(90.0),
            ..Default::default()
        };
        let term = aggregate(&courses, &CutoffScale::default(), &options);
        assert!(close(term.required_average.unwrap(), 90.0));
    }

    #[test]
    fn ungraded_course_counts_towards_range_and_completion() {
        let mut started = Course::new("a", "A 100", "Fall 2025");
        started.credits = Some(0.5);
        started.schemes = vec![vec![
            Component::new("Assignments", 50.0),
            Component::new("Exam", 50.0),
        ]];
        let mut fresh = Course::new("b", "B 100", "Fall 2025");
        fresh.credits = Some(0.5);
        fresh.schemes = vec![vec![Component::new("Final", 100.0)]];
        let items = vec![Item {
            id: "a1".into(),
            course_id: "a".into(),
            name: "A1".into(),
            category: "Assignments".into(),
            grade: Some(80.0),
            max_grade: Some(100.0),
            is_placeholder: false,
        }];

        let courses = vec![
            CourseStanding::from_course(&started, &items, 1.0),
            CourseStanding::from_course(&fresh, &items, 1.0),
        ];
        assert!(courses[1].result().is_none());
        assert_eq!(courses[1].selection.scheme_index, None);
        assert_eq!(courses[1].range(32.0), Some(CourseRange { min: 32.0, max: 100.0 }));

        let options = AggregateOptions {
            target: Some(85.0),
            ..Default::default()
        };
        let term = aggregate(&courses, &CutoffScale::default(), &options);
        assert!(close(term.average.unwrap(), 80.0));
        assert_eq!(term.graded_credits, 0.5);
        assert!(close(term.weight_completed_percent, 25.0));
        assert!(close(term.min.unwrap(), 36.0));
        assert!(close(term.max.unwrap(), 95.0));
        // (85 * 1.0 - 40 * 0.5) / (0.5 * 0.5 + 1.0 * 0.5)
        assert!(close(term.required_average.unwrap(), 65.0 / 0.75));
    }

    #[test]
    fn ungraded_term_has_no_average() {
        let courses = vec![ungraded(0.5, 100.0), ungraded(1.0, 100.0)];
        let term = aggregate(&courses, &CutoffScale::default(), &AggregateOptions::default());
        assert_eq!(term.average, None);
        assert_eq!(term.gpa, None);
        assert_eq!(term.graded_credits, 0.0);
        assert!(close(term.min.unwrap(), 32.0));
        assert!(close(term.max.unwrap(), 100.0));
        assert_eq!(term.weight_completed_percent, 0.0);
    }

    #[test]
    fn empty_term() {
        let term = aggregate(&[], &CutoffScale::default(), &AggregateOptions::default());
        assert_eq!(term.average, None);
        assert_eq!(term.min, None);
        assert_eq!(term.weight_completed_percent, 0.0);
    }

    #[test]
    fn cumulative_counts_earned_credits() {
        let courses = vec![
            standing(0.5, 0.0, Some(result(85.0, 100.0, 100.0))),
            standing(0.5, 0.0, Some(result(20.0, 50.0, 100.0))),
            // 40% so far but only 10 of 100 graded: secured share is 4%
            standing(0.5, 0.0, Some(result(4.0, 10.0, 100.0))),
        ];
        let cum = cumulative(&courses, &CutoffScale::default(), 50.0);
        assert_eq!(cum.credits_attempted, 1.5);
        assert_eq!(cum.credits_earned, 0.5);
        assert!(close(cum.average.unwrap(), (85.0 + 40.0 + 40.0) / 3.0));
    }

    #[test]
    fn standing_from_course_filters_items_and_applies_bonus() {
        let mut course = Course::new("c1", "CS 101", "Fall 2025");
        course.credits = Some(0.5);
        course.schemes = vec![vec![Component::new("Exam", 100.0)]];
        course.grading = CourseGradingConfig {
            bonus_percent: Some(5.0),
            ..Default::default()
        };
        let items = vec![
            Item {
                id: "e1".into(),
                course_id: "c1".into(),
                name: "Midterm".into(),
                category: "Exam".into(),
                grade: Some(78.0),
                max_grade: Some(100.0),
                is_placeholder: false,
            },
            Item {
                id: "x".into(),
                course_id: "other".into(),
                name: "Other".into(),
                category: "Exam".into(),
                grade: Some(0.0),
                max_grade: Some(100.0),
                is_placeholder: false,
            },
        ];
        let s = CourseStanding::from_course(&course, &items, 1.0);
        assert_eq!(s.credits, 0.5);
        assert!(close(s.displayed_grade().unwrap(), 83.0));
        assert!(close(s.result().unwrap().current_grade.unwrap(), 78.0));
    }
}
