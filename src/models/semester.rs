use serde::{Deserialize, Serialize};

use super::PlannedCourse;

/// An academic term.
///
/// Variants are declared in calendar order so that `(year, term)` pairs sort
/// chronologically, e.g. `2025-fall < 2026-spring < 2026-summer`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Spring,
    Summer,
    Fall,
}

impl Term {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "fall" => Some(Self::Fall),
            _ => None,
        }
    }

    /// Capitalized display name, e.g. `Fall`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        }
    }
}

/// One semester slot in a roadmap.
///
/// `total_credits` is a cache of the sum of the contained courses' credits
/// and must be recomputed after every change to `courses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: String,
    pub term: Term,
    pub year: i32,
    #[serde(default)]
    pub courses: Vec<PlannedCourse>,
    #[serde(default)]
    pub total_credits: u32,
}

impl Semester {
    pub fn new(year: i32, term: Term) -> Self {
        Self {
            id: Self::make_id(year, term),
            term,
            year,
            courses: Vec::new(),
            total_credits: 0,
        }
    }

    pub fn make_id(year: i32, term: Term) -> String {
        format!("{}-{}", year, term.as_str())
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.courses.iter().any(|c| c.id() == course_id)
    }

    pub fn recompute_credits(&mut self) {
        self.total_credits = self
            .courses
            .iter()
            .map(PlannedCourse::credits)
            .fold(0, u32::saturating_add);
    }

    /// Display label such as `Fall 2025`, or just `Fall` when years are hidden.
    pub fn label(&self, show_year: bool) -> String {
        if show_year {
            format!("{} {}", self.term.display_name(), self.year)
        } else {
            self.term.display_name().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_derived_from_year_and_term() {
        let semester = Semester::new(2025, Term::Fall);
        assert_eq!(semester.id, "2025-fall");
        assert_eq!(semester.total_credits, 0);
        assert!(semester.courses.is_empty());
    }

    #[test]
    fn terms_sort_in_calendar_order() {
        assert!((2025, Term::Fall) < (2026, Term::Spring));
        assert!((2026, Term::Spring) < (2026, Term::Summer));
        assert!((2026, Term::Summer) < (2026, Term::Fall));
    }

    #[test]
    fn label_respects_show_year() {
        let semester = Semester::new(2027, Term::Spring);
        assert_eq!(semester.label(true), "Spring 2027");
        assert_eq!(semester.label(false), "Spring");
    }
}
