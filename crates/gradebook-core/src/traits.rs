//! Seams for institution-specific lookups.
//!
//! The engine never hard-codes a grade-point scale. Term aggregation takes
//! any [`GpaScale`]; [`CutoffScale`] is the table-driven implementation the
//! CLI configures from `gradebook.toml`.

use serde::{Deserialize, Serialize};

use crate::error::GradebookError;

/// Converts a percentage grade into grade points.
pub trait GpaScale {
    fn grade_to_gpa(&self, percent: f64) -> f64;
}

impl<F> GpaScale for F
where
    F: Fn(f64) -> f64,
{
    fn grade_to_gpa(&self, percent: f64) -> f64 {
        self(percent)
    }
}

/// One row of a cutoff table: grades at or above `min_percent` earn `gpa`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cutoff {
    pub min_percent: f64,
    pub gpa: f64,
}

/// A grade-point scale defined by descending percentage cutoffs.
///
/// The default is the 4.0 scale:
///
/// | Percent | GPA |
/// |---------|-----|
/// | >= 90   | 4.0 |
/// | >= 85   | 3.9 |
/// | >= 80   | 3.5 |
/// | >= 77   | 3.3 |
/// | >= 73   | 3.0 |
/// | >= 70   | 2.7 |
/// | >= 67   | 2.3 |
/// | >= 63   | 2.0 |
/// | >= 60   | 1.7 |
/// | >= 57   | 1.3 |
/// | >= 53   | 1.0 |
/// | >= 50   | 0.7 |
/// | < 50    | 0.0 |
#[derive(Debug, Clone, PartialEq)]
pub struct CutoffScale {
    cutoffs: Vec<Cutoff>,
}

impl CutoffScale {
    /// Build a scale, checking that cutoffs are finite and strictly descending.
    pub fn new(cutoffs: Vec<Cutoff>) -> Result<Self, GradebookError> {
        if cutoffs
            .iter()
            .any(|c| !c.min_percent.is_finite() || !c.gpa.is_finite())
        {
            return Err(GradebookError::InvalidCutoffs(
                "cutoffs must be finite numbers".into(),
            ));
        }
        if let Some(pair) = cutoffs
            .windows(2)
            .find(|w| w[1].min_percent >= w[0].min_percent)
        {
            return Err(GradebookError::InvalidCutoffs(format!(
                "cutoff {} is not below {}",
                pair[1].min_percent, pair[0].min_percent
            )));
        }
        Ok(Self { cutoffs })
    }

    pub fn cutoffs(&self) -> &[Cutoff] {
        &self.cutoffs
    }
}

impl Default for CutoffScale {
    fn default() -> Self {
        Self {
            cutoffs: default_cutoffs(),
        }
    }
}

impl GpaScale for CutoffScale {
    fn grade_to_gpa(&self, percent: f64) -> f64 {
        self.cutoffs
            .iter()
            .find(|c| percent >= c.min_percent)
            .map_or(0.0, |c| c.gpa)
    }
}

pub fn default_cutoffs() -> Vec<Cutoff> {
    [
        (90.0, 4.0),
        (85.0, 3.9),
        (80.0, 3.5),
        (77.0, 3.3),
        (73.0, 3.0),
        (70.0, 2.7),
        (67.0, 2.3),
        (63.0, 2.0),
        (60.0, 1.7),
        (57.0, 1.3),
        (53.0, 1.0),
        (50.0, 0.7),
    ]
    .into_iter()
    .map(|(min_percent, gpa)| Cutoff { min_percent, gpa })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_boundaries() {
        let scale = CutoffScale::default();
        assert_eq!(scale.grade_to_gpa(100.0), 4.0);
        assert_eq!(scale.grade_to_gpa(90.0), 4.0);
        assert_eq!(scale.grade_to_gpa(89.99), 3.9);
        assert_eq!(scale.grade_to_gpa(80.0), 3.5);
        assert_eq!(scale.grade_to_gpa(73.0), 3.0);
        assert_eq!(scale.grade_to_gpa(50.0), 0.7);
        assert_eq!(scale.grade_to_gpa(49.9), 0.0);
        assert_eq!(scale.grade_to_gpa(0.0), 0.0);
    }

    #[test]
    fn closures_are_scales() {
        let linear = |p: f64| p / 25.0;
        assert_eq!(linear.grade_to_gpa(100.0), 4.0);
    }

    #[test]
    fn rejects_unordered_cutoffs() {
        let err = CutoffScale::new(vec![
            Cutoff {
                min_percent: 50.0,
                gpa: 1.0,
            },
            Cutoff {
                min_percent: 80.0,
                gpa: 3.0,
            },
        ])
        .unwrap_err();
        assert!(err.to_string().contains("not below"));
    }

    #[test]
    fn empty_scale_is_all_zero() {
        let scale = CutoffScale::new(vec![]).unwrap();
        assert_eq!(scale.grade_to_gpa(99.0), 0.0);
    }
}
