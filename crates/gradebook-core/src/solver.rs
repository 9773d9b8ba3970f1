//! Goal seeking: the uniform average still needed on ungraded work.
//!
//! Results are deliberately unclamped. Above 100 means the goal can no
//! longer be reached; below 0 means it is reached whatever happens next.

use crate::results::{GoalStatus, SchemeResult};
use crate::statistics::CourseStanding;

/// Average (percent) required on the remaining weight of one scheme to
/// finish at `target_percent`.
///
/// `bonus_percent` is free credit on the final grade, so it lowers the
/// effective target. Returns `None` when no weight is left to change the
/// outcome.
pub fn required_average(
    result: &SchemeResult,
    target_percent: f64,
    bonus_percent: f64,
) -> Option<f64> {
    if !target_percent.is_finite() {
        return None;
    }
    let remaining = result.remaining_weight();
    if remaining <= 0.0 {
        return None;
    }
    let bonus = if bonus_percent.is_finite() {
        bonus_percent
    } else {
        0.0
    };
    let effective_target = target_percent - bonus;
    Some((effective_target * result.total_scheme_weight - result.current_score * 100.0) / remaining)
}

/// Uniform average required on every in-progress course of a term so the
/// credit-weighted term average lands on `target_percent`.
///
/// Finished courses contribute their final displayed grade. Each
/// in-progress course, including one with nothing graded yet, contributes
/// what it has secured so far (`score / weight * 100 + bonus`) plus the
/// unknown average scaled by its remaining share of weight. Returns `None`
/// when no course has a scheme or nothing is left to grade anywhere.
pub fn term_required_average(standings: &[CourseStanding], target_percent: f64) -> Option<f64> {
    if !target_percent.is_finite() {
        return None;
    }

    let mut total_credits = 0.0;
    let mut lhs_factor = 0.0;
    let mut rhs_current = 0.0;
    let mut any = false;

    for standing in standings {
        let Some(result) = standing.tracked() else {
            continue;
        };
        let credits = standing.credits;
        let remaining = result.remaining_weight();

        if remaining <= 0.0 || result.total_scheme_weight <= 0.0 {
            // An empty scheme has neither a grade nor remaining work.
            let Some(final_grade) = standing.displayed_grade() else {
                continue;
            };
            any = true;
            total_credits += credits;
            rhs_current += final_grade * credits;
            continue;
        }

        any = true;
        total_credits += credits;
        let weight = result.total_scheme_weight;
        lhs_factor += remaining / weight * credits;
        rhs_current +=
            (result.current_score / weight * 100.0 + standing.bonus_percent) * credits;
    }

    if !any || lhs_factor == 0.0 {
        return None;
    }
    Some((target_percent * total_credits - rhs_current) / lhs_factor)
}

/// Classify a required average against the current average.
pub fn classify_goal(required: f64, current_average: f64) -> GoalStatus {
    if required > 100.0 {
        GoalStatus::Impossible
    } else if required < 0.0 {
        GoalStatus::Achieved
    } else if required < current_average {
        GoalStatus::OnTrack
    } else {
        GoalStatus::OffTrack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Selection;

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
                scheme_index: None,
            },
            pending: None,
        }
    }

    #[test]
    fn half_done_course_needs_ninety() {
        let r = result(45.0, 50.0, 100.0);
        assert_eq!(required_average(&r, 90.0, 0.0), Some(90.0));
    }

    #[test]
    fn bonus_lowers_requirement() {
        let r = result(45.0, 50.0, 100.0);
        assert_eq!(required_average(&r, 90.0, 5.0), Some(80.0));
    }

    #[test]
    fn nothing_remaining_is_none() {
        assert_eq!(required_average(&result(80.0, 100.0, 100.0), 90.0, 0.0), None);
        assert_eq!(required_average(&result(0.0, 0.0, 0.0), 90.0, 0.0), None);
    }

    #[test]
    fn strictly_increasing_in_target() {
        let r = result(30.0, 40.0, 100.0);
        let mut last = f64::NEG_INFINITY;
        for target in [0.0, 25.0, 50.0, 75.0, 90.0, 100.0, 120.0] {
            let req = required_average(&r, target, 0.0).unwrap();
            assert!(req > last);
            last = req;
        }
    }

    #[test]
    fn unclamped_results() {
        let r = result(10.0, 50.0, 100.0);
        assert!(required_average(&r, 90.0, 0.0).unwrap() > 100.0);
        let r = result(49.0, 50.0, 100.0);
        assert!(required_average(&r, 40.0, 0.0).unwrap() < 0.0);
    }

    #[test]
    fn term_single_course_matches_scheme_solver() {
        let r = result(45.0, 50.0, 100.0);
        let single = required_average(&r, 85.0, 2.0).unwrap();
        let term = term_required_average(&[standing(0.5, 2.0, Some(r))], 85.0).unwrap();
        assert!((single - term).abs() < 1e-9);
    }

    #[test]
    fn term_folds_finished_courses() {
        let done = result(90.0, 100.0, 100.0);
        let half = result(35.0, 50.0, 100.0);
        // target 80 over 2 credits = 160; done contributes 90; half secured 35;
        // lhs = 0.5 → (160 - 90 - 35) / 0.5 = 70
        let req = term_required_average(
            &[standing(1.0, 0.0, Some(done)), standing(1.0, 0.0, Some(half))],
            80.0,
        )
        .unwrap();
        assert!((req - 70.0).abs() < 1e-9);
    }

    #[test]
    fn term_without_remaining_work_is_none() {
        let done = result(90.0, 100.0, 100.0);
        assert_eq!(term_required_average(&[standing(1.0, 0.0, Some(done))], 80.0), None);
        // no scheme at all
        assert_eq!(term_required_average(&[standing(1.0, 0.0, None)], 80.0), None);
        assert_eq!(term_required_average(&[], 80.0), None);
    }

    #[test]
    fn term_counts_ungraded_courses_as_in_progress() {
        let fresh = CourseStanding {
            pending: Some(result(0.0, 0.0, 100.0)),
            ..standing(0.5, 0.0, None)
        };
        let half = standing(0.5, 0.0, Some(result(40.0, 50.0, 100.0)));
        // (85 * 1.0 - 40 * 0.5) / (0.5 * 0.5 + 1.0 * 0.5)
        let req = term_required_average(&[half, fresh.clone()], 85.0).unwrap();
        assert!((req - 65.0 / 0.75).abs() < 1e-9);

        // an ungraded course alone still needs the target everywhere
        let alone = term_required_average(&[fresh], 85.0).unwrap();
        assert!((alone - 85.0).abs() < 1e-9);
    }

    #[test]
    fn term_increasing_in_target() {
        let courses = vec![
            standing(0.5, 0.0, Some(result(20.0, 30.0, 100.0))),
            standing(1.0, 3.0, Some(result(50.0, 60.0, 100.0))),
        ];
        let low = term_required_average(&courses, 70.0).unwrap();
        let high = term_required_average(&courses, 71.0).unwrap();
        assert!(high > low);
    }

    #[test]
    fn goal_tiers() {
        assert_eq!(classify_goal(120.0, 80.0), GoalStatus::Impossible);
        assert_eq!(classify_goal(-3.0, 80.0), GoalStatus::Achieved);
        assert_eq!(classify_goal(70.0, 80.0), GoalStatus::OnTrack);
        assert_eq!(classify_goal(85.0, 80.0), GoalStatus::OffTrack);
        assert_eq!(classify_goal(80.0, 80.0), GoalStatus::OffTrack);
    }
}
