//! Result types produced by the grading engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a single component arrived at its contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentBasis {
    /// Backed by real graded items.
    Graded {
        /// `sum(grade) / sum(max)` over the kept items, as a fraction.
        average: f64,
        kept: Vec<String>,
        dropped: Vec<String>,
    },
    /// Drop-lowest removed every graded item; counted as full marks.
    AllDropped { dropped: Vec<String> },
    /// No graded items; the placeholder percentage stands in.
    Placeholder { percent: f64 },
    /// Nothing graded and no placeholder. Contributes to neither total.
    NoData,
}

/// Outcome of one scheme component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentOutcome {
    pub name: String,
    pub weight: f64,
    /// Weighted points earned by this component.
    pub score: f64,
    /// Items in the category, graded or not.
    pub item_count: usize,
    /// Items in the category with a usable grade.
    pub graded_count: usize,
    pub basis: ComponentBasis,
}

/// Evaluation of one marking scheme against a set of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeResult {
    /// `current_score / total_weight_graded * 100`, or `None` when nothing is graded.
    pub current_grade: Option<f64>,
    /// Sum of weighted points earned so far.
    pub current_score: f64,
    /// Scheme weight that has a grade (real or placeholder).
    pub total_weight_graded: f64,
    /// Sum of every parseable component weight.
    pub total_scheme_weight: f64,
    /// Scheme weight whose items have been handed back, pro-rated by item count.
    pub total_weight_completed: f64,
    pub dropped_item_ids: Vec<String>,
    #[serde(default)]
    pub components: Vec<ComponentOutcome>,
}

impl SchemeResult {
    /// Scheme weight with no grade yet.
    pub fn remaining_weight(&self) -> f64 {
        self.total_scheme_weight - self.total_weight_graded
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_weight() <= 0.0
    }

    /// Grade with the course bonus applied, capped at 100.
    pub fn displayed_grade(&self, bonus_percent: f64) -> Option<f64> {
        self.current_grade.map(|g| (g + bonus_percent).min(100.0))
    }

    /// Points earned as a share of the whole scheme, as if everything left scored zero.
    pub fn secured_percent(&self) -> Option<f64> {
        (self.total_scheme_weight > 0.0)
            .then(|| self.current_score / self.total_scheme_weight * 100.0)
    }
}

/// Which scheme a course is graded by, and its result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// `None` for an ungraded course.
    pub result: Option<SchemeResult>,
    /// Index of the active scheme. `None` when nothing is graded or an
    /// official grade overrides every scheme.
    pub scheme_index: Option<usize>,
}

/// Best-case and worst-case final percentage for a course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseRange {
    pub min: f64,
    pub max: f64,
}

/// Where a student stands relative to a goal, given the required average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Goal is reached even with zero on everything left.
    Achieved,
    /// Required average is below the current average.
    OnTrack,
    /// Required average is at or above the current average.
    OffTrack,
    /// More than 100% would be needed.
    Impossible,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Achieved => write!(f, "achieved"),
            GoalStatus::OnTrack => write!(f, "on track"),
            GoalStatus::OffTrack => write!(f, "off track"),
            GoalStatus::Impossible => write!(f, "impossible"),
        }
    }
}
