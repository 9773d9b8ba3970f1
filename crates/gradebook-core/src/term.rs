//! Academic terms: labels, calendar ranges and grouping.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::GradebookError;
use crate::model::Course;

/// Folder name for courses without a term.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Winter => write!(f, "Winter"),
            Season::Spring => write!(f, "Spring"),
            Season::Summer => write!(f, "Summer"),
            Season::Fall => write!(f, "Fall"),
        }
    }
}

impl FromStr for Season {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            _ => Err(GradebookError::InvalidTerm(s.to_string())),
        }
    }
}

/// A term label such as "Fall 2025". Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub season: Season,
    pub year: i32,
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then(self.season.cmp(&other.season))
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}

impl FromStr for Term {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GradebookError::InvalidTerm(s.to_string());
        let mut parts = s.split_whitespace();
        let (Some(season), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        Ok(Term {
            season: season.parse().map_err(|_| invalid())?,
            year: year.parse().map_err(|_| invalid())?,
        })
    }
}

impl Term {
    /// First and last calendar day of the term.
    ///
    /// Spring and Summer share the May–August block.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let (start, end) = match self.season {
            Season::Winter => ((1, 1), (4, 30)),
            Season::Spring | Season::Summer => ((5, 1), (8, 31)),
            Season::Fall => ((9, 1), (12, 31)),
        };
        let date = |(m, d): (u32, u32)| {
            NaiveDate::from_ymd_opt(self.year, m, d).unwrap_or(NaiveDate::MIN)
        };
        (date(start), date(end))
    }

    /// Share of the term's days elapsed by `today`, clamped to 0–100.
    pub fn progress(&self, today: NaiveDate) -> f64 {
        let (start, end) = self.date_range();
        let total = (end - start).num_days() as f64;
        if total <= 0.0 {
            return 0.0;
        }
        let elapsed = (today - start).num_days() as f64;
        (elapsed / total * 100.0).clamp(0.0, 100.0)
    }
}

/// Progress through a term given its label; 0 for labels that do not parse.
pub fn term_progress(label: &str, today: NaiveDate) -> f64 {
    label.parse::<Term>().map_or(0.0, |t| t.progress(today))
}

fn folder_name(course: &Course) -> &str {
    let term = course.term.trim();
    if term.is_empty() {
        UNCATEGORIZED
    } else {
        term
    }
}

fn folder_order(a: &str, b: &str) -> Ordering {
    let rank = |label: &str| -> (u8, Option<Term>) {
        if label == UNCATEGORIZED {
            (2, None)
        } else {
            match label.parse::<Term>() {
                Ok(t) => (0, Some(t)),
                Err(_) => (1, None),
            }
        }
    };
    let (ra, ta) = rank(a);
    let (rb, tb) = rank(b);
    ra.cmp(&rb)
        .then_with(|| tb.cmp(&ta))
        .then_with(|| b.cmp(a))
}

/// Group courses by term label, newest term first.
///
/// Parsed terms come first (newest first), then unrecognised labels in
/// reverse lexical order, then [`UNCATEGORIZED`].
pub fn group_by_term(courses: &[Course]) -> Vec<(String, Vec<&Course>)> {
    let mut groups: Vec<(String, Vec<&Course>)> = Vec::new();
    for course in courses {
        let folder = folder_name(course);
        match groups.iter_mut().find(|(name, _)| name == folder) {
            Some((_, members)) => members.push(course),
            None => groups.push((folder.to_string(), vec![course])),
        }
    }
    groups.sort_by(|(a, _), (b, _)| folder_order(a, b));
    groups
}
