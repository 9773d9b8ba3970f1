//! Marking-scheme evaluation.
//!
//! Scores one weighted scheme against a course's items, applying
//! drop-lowest rules and placeholder grades per component.

use crate::model::{Component, DropRules, Item, PlaceholderGrades};
use crate::results::{ComponentBasis, ComponentOutcome, SchemeResult};

struct ScoredItem<'a> {
    id: &'a str,
    grade: f64,
    max: f64,
    ratio: f64,
}

/// Evaluate a marking scheme against a snapshot of items.
///
/// Items are matched to components by category name; items for other
/// courses should already be filtered out by the caller.
///
/// Per component:
/// - a weight that is not a finite number skips the component entirely;
/// - with no graded items, a placeholder percentage (if any) stands in for
///   the category average, otherwise the component counts towards neither
///   total;
/// - graded items are sorted by `grade / max` (stable) and the lowest
///   `drop_lowest[name]` are removed; if that removes all of them the
///   component earns full marks;
/// - the kept items contribute `sum(grade) / sum(max) * weight`.
pub fn evaluate(
    scheme: &[Component],
    items: &[Item],
    drop_lowest: &DropRules,
    placeholders: &PlaceholderGrades,
) -> SchemeResult {
    let mut score = 0.0;
    let mut total_weight_graded = 0.0;
    let mut total_scheme_weight = 0.0;
    let mut total_weight_completed = 0.0;
    let mut dropped_item_ids = Vec::new();
    let mut components = Vec::with_capacity(scheme.len());

    for component in scheme {
        let Some(weight) = component.weight.filter(|w| w.is_finite()) else {
            tracing::debug!(component = %component.name, "skipping component without a numeric weight");
            continue;
        };
        total_scheme_weight += weight;

        let in_category: Vec<&Item> = items
            .iter()
            .filter(|i| i.category == component.name)
            .collect();
        let mut scored: Vec<ScoredItem<'_>> = in_category
            .iter()
            .filter_map(|i| {
                i.scored().map(|(grade, max)| ScoredItem {
                    id: i.id.as_str(),
                    grade,
                    max,
                    ratio: grade / max,
                })
            })
            .collect();

        let item_count = in_category.len();
        let graded_count = scored.len();
        let outcome = |score: f64, basis: ComponentBasis| ComponentOutcome {
            name: component.name.clone(),
            weight,
            score,
            item_count,
            graded_count,
            basis,
        };

        if scored.is_empty() {
            match placeholders
                .get(&component.name)
                .copied()
                .filter(|p| p.is_finite())
            {
                Some(percent) => {
                    let earned = percent / 100.0 * weight;
                    score += earned;
                    total_weight_graded += weight;
                    total_weight_completed += weight;
                    components.push(outcome(earned, ComponentBasis::Placeholder { percent }));
                }
                None => components.push(outcome(0.0, ComponentBasis::NoData)),
            }
            continue;
        }

        let drop_count = drop_lowest.get(&component.name).copied().unwrap_or(0) as usize;

        // Completion counts every item in the category, graded or not.
        let max_counted = item_count.saturating_sub(drop_count);
        if max_counted > 0 {
            let effective = graded_count.min(max_counted);
            total_weight_completed += weight * (effective as f64 / max_counted as f64);
        }

        // `sort_by` is stable: equal ratios keep their stored order.
        scored.sort_by(|a, b| a.ratio.total_cmp(&b.ratio));
        let split = drop_count.min(scored.len());
        let (dropped, kept) = scored.split_at(split);
        let dropped: Vec<String> = dropped.iter().map(|s| s.id.to_string()).collect();
        dropped_item_ids.extend(dropped.iter().cloned());

        if kept.is_empty() {
            score += weight;
            total_weight_graded += weight;
            components.push(outcome(weight, ComponentBasis::AllDropped { dropped }));
            continue;
        }

        let sum_grade: f64 = kept.iter().map(|s| s.grade).sum();
        let sum_max: f64 = kept.iter().map(|s| s.max).sum();
        if sum_max > 0.0 {
            let average = sum_grade / sum_max;
            let earned = average * weight;
            score += earned;
            total_weight_graded += weight;
            components.push(outcome(
                earned,
                ComponentBasis::Graded {
                    average,
                    kept: kept.iter().map(|s| s.id.to_string()).collect(),
                    dropped,
                },
            ));
        } else {
            components.push(outcome(0.0, ComponentBasis::NoData));
        }
    }

    let current_grade =
        (total_weight_graded > 0.0).then(|| score / total_weight_graded * 100.0);

    tracing::debug!(
        components = components.len(),
        total_scheme_weight,
        total_weight_graded,
        ?current_grade,
        "evaluated marking scheme"
    );

    SchemeResult {
        current_grade,
        current_score: score,
        total_weight_graded,
        total_scheme_weight,
        total_weight_completed,
        dropped_item_ids,
        components,
    }
}
