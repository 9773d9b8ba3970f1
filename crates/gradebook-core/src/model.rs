//! Core data model types for gradebook.
//!
//! These are immutable snapshots of what the persistence layer stores:
//! courses with their alternative marking schemes, and graded items.
//! The engine only ever reads them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Category name → number of lowest-ratio items to exclude.
pub type DropRules = HashMap<String, u32>;

/// Category name → assumed percentage (0–100) used while a category has no grades.
pub type PlaceholderGrades = HashMap<String, f64>;

/// One weighted slice of a marking scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Category name, matched against `Item::category`.
    pub name: String,
    /// Percentage-point contribution to the scheme total. `None` when the
    /// stored weight did not parse as a finite number.
    pub weight: Option<f64>,
}

impl Component {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight: Some(weight),
        }
    }
}

/// An ordered list of components. Weights are not required to sum to 100.
pub type MarkingScheme = Vec<Component>;

/// A single graded (or not yet graded) deliverable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub course_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Category this item counts towards.
    pub category: String,
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub max_grade: Option<f64>,
    /// Marked as a what-if entry by the user. Placeholder items still carry
    /// a grade and are scored like any other item.
    #[serde(default)]
    pub is_placeholder: bool,
}

impl Item {
    /// Returns `(grade, max_grade)` when both are finite and `max_grade > 0`.
    pub fn scored(&self) -> Option<(f64, f64)> {
        match (self.grade, self.max_grade) {
            (Some(g), Some(m)) if g.is_finite() && m.is_finite() && m > 0.0 => Some((g, m)),
            _ => None,
        }
    }
}

/// Per-course grading options that sit next to the schemes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseGradingConfig {
    /// Flat addition to the displayed percentage.
    #[serde(default)]
    pub bonus_percent: Option<f64>,
    /// Externally recorded final grade; overrides every computed result.
    #[serde(default)]
    pub official_grade: Option<f64>,
    /// Goal the student is working towards.
    #[serde(default)]
    pub target_grade: Option<f64>,
    /// Scheme the student pinned; used instead of the best scheme when valid.
    #[serde(default)]
    pub preferred_scheme: Option<usize>,
}

impl CourseGradingConfig {
    /// Bonus that applies to displayed grades. An official grade already
    /// includes everything, so no bonus is layered on top of it.
    pub fn effective_bonus(&self) -> f64 {
        if self.official_grade.is_some() {
            return 0.0;
        }
        self.bonus_percent.filter(|b| b.is_finite()).unwrap_or(0.0)
    }
}

/// A course and everything the engine needs to grade it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    /// Short code shown to the user, e.g. "CS 136".
    #[serde(default)]
    pub code: String,
    /// Term label, e.g. "Fall 2025". Empty when uncategorized.
    #[serde(default)]
    pub term: String,
    /// Credit weight; `None` falls back to the configured default.
    #[serde(default)]
    pub credits: Option<f64>,
    #[serde(default)]
    pub schemes: Vec<MarkingScheme>,
    #[serde(default)]
    pub drop_lowest: DropRules,
    #[serde(default)]
    pub placeholder_grades: PlaceholderGrades,
    #[serde(default)]
    pub grading: CourseGradingConfig,
}

impl Course {
    pub fn new(id: impl Into<String>, code: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            term: term.into(),
            credits: None,
            schemes: Vec::new(),
            drop_lowest: DropRules::new(),
            placeholder_grades: PlaceholderGrades::new(),
            grading: CourseGradingConfig::default(),
        }
    }

    pub fn credits_or(&self, default_credits: f64) -> f64 {
        self.credits
            .filter(|c| c.is_finite() && *c >= 0.0)
            .unwrap_or(default_credits)
    }

    /// Every distinct component name across all schemes, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for component in self.schemes.iter().flatten() {
            if !component.name.is_empty() && !seen.contains(&component.name.as_str()) {
                seen.push(component.name.as_str());
            }
        }
        seen
    }
}

/// Everything loaded from one data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Term label → goal average for that term.
    #[serde(default)]
    pub term_goals: HashMap<String, f64>,
}

impl Snapshot {
    /// Items belonging to one course, in stored order.
    pub fn items_for(&self, course_id: &str) -> Vec<Item> {
        self.items
            .iter()
            .filter(|i| i.course_id == course_id)
            .cloned()
            .collect()
    }

    /// Look a course up by id first, then by code (case-insensitive).
    pub fn find_course(&self, key: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == key).or_else(|| {
            self.courses
                .iter()
                .find(|c| c.code.eq_ignore_ascii_case(key.trim()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(grade: Option<f64>, max: Option<f64>) -> Item {
        Item {
            id: "i".into(),
            course_id: "c".into(),
            name: String::new(),
            category: "Quiz".into(),
            grade,
            max_grade: max,
            is_placeholder: false,
        }
    }

    #[test]
    fn scored_requires_positive_max() {
        assert_eq!(item(Some(8.0), Some(10.0)).scored(), Some((8.0, 10.0)));
        assert_eq!(item(Some(8.0), Some(0.0)).scored(), None);
        assert_eq!(item(Some(8.0), None).scored(), None);
        assert_eq!(item(None, Some(10.0)).scored(), None);
        assert_eq!(item(Some(f64::NAN), Some(10.0)).scored(), None);
    }

    #[test]
    fn zero_grade_still_counts() {
        assert_eq!(item(Some(0.0), Some(10.0)).scored(), Some((0.0, 10.0)));
    }

    #[test]
    fn official_grade_suppresses_bonus() {
        let mut cfg = CourseGradingConfig {
            bonus_percent: Some(5.0),
            ..Default::default()
        };
        assert_eq!(cfg.effective_bonus(), 5.0);
        cfg.official_grade = Some(88.0);
        assert_eq!(cfg.effective_bonus(), 0.0);
    }

    #[test]
    fn credits_fall_back_to_default() {
        let mut course = Course::new("c1", "CS 101", "Fall 2025");
        assert_eq!(course.credits_or(0.5), 0.5);
        course.credits = Some(1.0);
        assert_eq!(course.credits_or(0.5), 1.0);
    }

    #[test]
    fn find_course_by_code() {
        let snapshot = Snapshot {
            courses: vec![Course::new("abc", "MATH 135", "Fall 2025")],
            ..Default::default()
        };
        assert!(snapshot.find_course("abc").is_some());
        assert!(snapshot.find_course("math 135").is_some());
        assert!(snapshot.find_course("MATH 136").is_none());
    }

    #[test]
    fn categories_deduplicated_across_schemes() {
        let mut course = Course::new("c1", "CS 101", "Fall 2025");
        course.schemes = vec![
            vec![Component::new("Assignments", 40.0), Component::new("Exam", 60.0)],
            vec![Component::new("Exam", 100.0)],
        ];
        assert_eq!(course.categories(), vec!["Assignments", "Exam"]);
    }
}
