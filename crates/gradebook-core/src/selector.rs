//! Picks the scheme a course is graded by.

use crate::model::{CourseGradingConfig, DropRules, Item, MarkingScheme, PlaceholderGrades};
use crate::results::{SchemeResult, Selection};
use crate::scheme::evaluate;

/// Evaluate every scheme of a course, in order.
pub fn evaluate_all(
    schemes: &[MarkingScheme],
    items: &[Item],
    drop_lowest: &DropRules,
    placeholders: &PlaceholderGrades,
) -> Vec<SchemeResult> {
    schemes
        .iter()
        .map(|scheme| evaluate(scheme, items, drop_lowest, placeholders))
        .collect()
}

/// Index of the highest `current_grade`, ignoring ungraded schemes.
/// Ties keep the earliest scheme.
pub fn best_index(results: &[SchemeResult]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, result) in results.iter().enumerate() {
        let Some(grade) = result.current_grade else {
            continue;
        };
        if best.map_or(true, |(_, g)| grade > g) {
            best = Some((idx, grade));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Scheme shown for a course: the valid preferred one, else the best
/// graded one, else the first.
pub fn display_index(results: &[SchemeResult], config: &CourseGradingConfig) -> Option<usize> {
    config
        .preferred_scheme
        .filter(|&idx| idx < results.len())
        .or_else(|| best_index(results))
        .or((!results.is_empty()).then_some(0))
}

/// Choose the result a course is graded by.
///
/// An official grade wins outright and yields a fully weighted synthetic
/// result with no active scheme. Otherwise a valid preferred scheme is
/// used, falling back to the best-scoring one.
pub fn select_best(
    schemes: &[MarkingScheme],
    items: &[Item],
    drop_lowest: &DropRules,
    placeholders: &PlaceholderGrades,
    config: &CourseGradingConfig,
) -> Selection {
    let results = evaluate_all(schemes, items, drop_lowest, placeholders);
    select_from(results, config)
}

/// Same as [`select_best`] over already evaluated schemes.
pub fn select_from(mut results: Vec<SchemeResult>, config: &CourseGradingConfig) -> Selection {
    let preferred = config.preferred_scheme.filter(|&idx| idx < results.len());
    let best = best_index(&results);

    if let Some(official) = config.official_grade.filter(|g| g.is_finite()) {
        let shown = display_index(&results, config);
        let base = shown.map(|idx| results.swap_remove(idx));
        tracing::debug!(official, ?shown, "official grade overrides computed schemes");
        return Selection {
            result: Some(official_result(official, base)),
            scheme_index: None,
        };
    }

    let chosen = preferred.or(best);
    let Some(idx) = chosen else {
        return Selection::default();
    };
    let result = results.swap_remove(idx);
    tracing::debug!(scheme = idx, grade = ?result.current_grade, "selected marking scheme");
    Selection {
        result: result.current_grade.is_some().then_some(result),
        scheme_index: Some(idx),
    }
}

fn official_result(official: f64, base: Option<SchemeResult>) -> SchemeResult {
    let weight = base
        .as_ref()
        .map(|b| b.total_scheme_weight)
        .filter(|w| *w > 0.0)
        .unwrap_or(100.0);
    let (dropped_item_ids, components) = base
        .map(|b| (b.dropped_item_ids, b.components))
        .unwrap_or_default();
    SchemeResult {
        current_grade: Some(official),
        current_score: official / 100.0 * weight,
        total_weight_graded: weight,
        total_scheme_weight: weight,
        total_weight_completed: weight,
        dropped_item_ids,
        components,
    }
}
