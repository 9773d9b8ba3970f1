//! JSON snapshot parser.
//!
//! Loads course and item records in the shape the persistence layer stores
//! them (string-encoded numbers, `"marking-schemes"` of `{Component, Weight}`
//! rows) and validates them.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Component, Course, CourseGradingConfig, Item, Snapshot};

/// Intermediate structure for parsing snapshot files.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    courses: Vec<RawCourse>,
    #[serde(default)]
    items: Vec<RawItem>,
    #[serde(default)]
    term_goals: HashMap<String, RawNumber>,
}

#[derive(Debug, Deserialize)]
struct RawCourse {
    id: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    term: Option<String>,
    #[serde(default)]
    credits: Option<RawNumber>,
    #[serde(default)]
    data: RawCourseData,
}

#[derive(Debug, Default, Deserialize)]
struct RawCourseData {
    #[serde(default, rename = "marking-schemes")]
    marking_schemes: Option<Vec<Vec<RawComponent>>>,
    #[serde(default)]
    drop_lowest: Option<HashMap<String, RawNumber>>,
    #[serde(default)]
    placeholder_grades: Option<HashMap<String, RawNumber>>,
    #[serde(default)]
    bonus_percent: Option<RawNumber>,
    #[serde(default)]
    official_grade: Option<RawNumber>,
    #[serde(default)]
    target_grade: Option<RawNumber>,
    #[serde(default, rename = "preferred-marking-scheme")]
    preferred_marking_scheme: Option<RawNumber>,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    #[serde(rename = "Component", default)]
    component: String,
    #[serde(rename = "Weight", default)]
    weight: Option<RawNumber>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: String,
    course_id: String,
    #[serde(default)]
    data: RawItemData,
}

#[derive(Debug, Default, Deserialize)]
struct RawItemData {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    category: String,
    #[serde(default)]
    grade: Option<RawNumber>,
    #[serde(default)]
    max_grade: Option<RawNumber>,
    #[serde(default, rename = "isPlaceholder")]
    is_placeholder: bool,
}

/// Numbers arrive either as JSON numbers or as strings typed into a form.
/// Anything else is kept so one bad field does not reject the snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawNumber {
    fn value(&self) -> Option<f64> {
        match self {
            RawNumber::Number(n) => Some(*n).filter(|n| n.is_finite()),
            RawNumber::Text(s) => parse_number(s),
            RawNumber::Other(_) => None,
        }
    }
}

/// Parse a user-entered number: trimmed, an optional trailing `%` ignored.
/// Empty or non-finite input yields `None`.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn number(raw: &Option<RawNumber>) -> Option<f64> {
    raw.as_ref().and_then(RawNumber::value)
}

fn number_map<T>(
    raw: Option<HashMap<String, RawNumber>>,
    convert: impl Fn(f64) -> Option<T>,
) -> HashMap<String, T> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.value().and_then(&convert).map(|v| (k, v)))
        .collect()
}

fn convert_course(raw: RawCourse) -> Course {
    let data = raw.data;
    let schemes = data
        .marking_schemes
        .unwrap_or_default()
        .into_iter()
        .map(|scheme| {
            scheme
                .into_iter()
                .map(|c| Component {
                    name: c.component,
                    weight: number(&c.weight),
                })
                .collect()
        })
        .collect();

    let drop_lowest = number_map(data.drop_lowest, |n| {
        (n >= 0.0).then(|| n.floor().min(u32::MAX as f64) as u32)
    });
    let placeholder_grades = number_map(data.placeholder_grades, Some);

    let preferred_scheme = number(&data.preferred_marking_scheme)
        .filter(|n| n.fract() == 0.0 && *n >= 0.0)
        .map(|n| n as usize);

    Course {
        id: raw.id,
        code: raw.code,
        term: raw.term.unwrap_or_default(),
        credits: number(&raw.credits),
        schemes,
        drop_lowest,
        placeholder_grades,
        grading: CourseGradingConfig {
            bonus_percent: number(&data.bonus_percent),
            official_grade: number(&data.official_grade),
            target_grade: number(&data.target_grade),
            preferred_scheme,
        },
    }
}

fn convert_item(raw: RawItem) -> Item {
    Item {
        id: raw.id,
        course_id: raw.course_id,
        name: raw.data.name,
        category: raw.data.category,
        grade: number(&raw.data.grade),
        max_grade: number(&raw.data.max_grade),
        is_placeholder: raw.data.is_placeholder,
    }
}

/// Parse a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file: {}", path.display()))?;

    parse_snapshot_str(&content, path)
}

/// Parse a JSON string into a `Snapshot` (useful for testing).
pub fn parse_snapshot_str(content: &str, source_path: &Path) -> Result<Snapshot> {
    let parsed: RawSnapshot = serde_json::from_str(content)
        .with_context(|| format!("failed to parse snapshot JSON: {}", source_path.display()))?;

    let term_goals = parsed
        .term_goals
        .into_iter()
        .filter_map(|(term, goal)| match goal.value() {
            Some(g) => Some((term, g)),
            None => {
                tracing::warn!("ignoring non-numeric goal for term {term}");
                None
            }
        })
        .collect();

    Ok(Snapshot {
        courses: parsed.courses.into_iter().map(convert_course).collect(),
        items: parsed.items.into_iter().map(convert_item).collect(),
        term_goals,
    })
}

/// A warning from snapshot validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The course ID (if applicable).
    pub course_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn course(id: &str, message: String) -> Self {
        Self {
            course_id: Some(id.to_string()),
            message,
        }
    }
}

/// Validate a snapshot for common data-entry issues.
///
/// None of these stop grading; they explain results that may look odd.
pub fn validate_snapshot(snapshot: &Snapshot) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Check for duplicate course IDs
    let mut seen_ids = HashSet::new();
    for course in &snapshot.courses {
        if !seen_ids.insert(course.id.as_str()) {
            warnings.push(ValidationWarning::course(
                &course.id,
                format!("duplicate course ID: {}", course.id),
            ));
        }
    }

    // Items pointing at courses that do not exist
    for item in &snapshot.items {
        if !seen_ids.contains(item.course_id.as_str()) {
            warnings.push(ValidationWarning {
                course_id: None,
                message: format!(
                    "item {} belongs to unknown course {}",
                    item.id, item.course_id
                ),
            });
        }
    }

    for course in &snapshot.courses {
        let items: Vec<&Item> = snapshot
            .items
            .iter()
            .filter(|i| i.course_id == course.id)
            .collect();

        for (idx, scheme) in course.schemes.iter().enumerate() {
            let mut total = 0.0;
            for component in scheme {
                match component.weight {
                    None => warnings.push(ValidationWarning::course(
                        &course.id,
                        format!(
                            "scheme {}: weight for {:?} is not a number and will be ignored",
                            idx + 1,
                            component.name
                        ),
                    )),
                    Some(w) if w < 0.0 => warnings.push(ValidationWarning::course(
                        &course.id,
                        format!("scheme {}: {:?} has a negative weight", idx + 1, component.name),
                    )),
                    Some(w) => total += w,
                }
            }
            if (total - 100.0).abs() > 0.01 {
                warnings.push(ValidationWarning::course(
                    &course.id,
                    format!("scheme {} weights sum to {total}, not 100", idx + 1),
                ));
            }
        }

        if let Some(pref) = course.grading.preferred_scheme {
            if pref >= course.schemes.len() {
                warnings.push(ValidationWarning::course(
                    &course.id,
                    format!(
                        "preferred scheme {} does not exist ({} defined)",
                        pref + 1,
                        course.schemes.len()
                    ),
                ));
            }
        }

        if let Some(official) = course.grading.official_grade {
            if !(0.0..=100.0).contains(&official) {
                warnings.push(ValidationWarning::course(
                    &course.id,
                    format!("official grade {official} is outside 0-100"),
                ));
            }
        }

        let categories = course.categories();
        if !categories.is_empty() {
            let mut unmatched: Vec<&str> = items
                .iter()
                .map(|i| i.category.as_str())
                .filter(|c| !categories.contains(c))
                .collect();
            unmatched.sort_unstable();
            unmatched.dedup();
            for category in unmatched {
                warnings.push(ValidationWarning::course(
                    &course.id,
                    format!("items in category {category:?} match no scheme component"),
                ));
            }
        }

        let mut placeholder_names: Vec<&String> = course.placeholder_grades.keys().collect();
        placeholder_names.sort();
        for name in placeholder_names {
            if items
                .iter()
                .any(|i| &i.category == name && i.scored().is_some())
            {
                warnings.push(ValidationWarning::course(
                    &course.id,
                    format!("placeholder for {name:?} is ignored because real grades exist"),
                ));
            }
        }

        let mut drop_rules: Vec<(&String, &u32)> = course.drop_lowest.iter().collect();
        drop_rules.sort();
        for (name, &count) in drop_rules {
            let graded = items
                .iter()
                .filter(|i| &i.category == name && i.scored().is_some())
                .count();
            if count > 0 && graded > 0 && count as usize >= graded {
                warnings.push(ValidationWarning::course(
                    &course.id,
                    format!(
                        "dropping {count} of {graded} graded {name:?} items; the category counts as full marks"
                    ),
                ));
            }
        }
    }

    warnings
}
