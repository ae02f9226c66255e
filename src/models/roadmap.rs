use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::{Container, PlannedCourse, Semester, Term};

/// Shape of the semester sequence.
///
/// Only replaced wholesale through a settings update, which regenerates the
/// semester list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapConfig {
    /// Program length in years. Must be positive.
    pub total_years: i32,
    pub includes_summer: bool,
    /// Calendar year of the first semester.
    pub start_year: i32,
    /// `fall` or `spring`; a summer start is rejected.
    pub start_semester: Term,
    /// Display calendar years in semester labels.
    #[serde(default)]
    pub show_years: bool,
}

impl RoadmapConfig {
    /// Four years, no summer, fall start in the given calendar year.
    pub fn baseline(start_year: i32) -> Self {
        Self {
            total_years: 4,
            includes_summer: false,
            start_year,
            start_semester: Term::Fall,
            show_years: false,
        }
    }

    pub fn semesters_per_year(&self) -> usize {
        if self.includes_summer {
            3
        } else {
            2
        }
    }
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self::baseline(Utc::now().year())
    }
}

/// The aggregate root of a student's multi-year plan.
///
/// Owns every [`Semester`] and [`PlannedCourse`] reachable through it. The
/// available-course pool is not stored here; it is derived from the enrolled
/// courses and whatever is already placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub config: RoadmapConfig,
    pub semesters: Vec<Semester>,
    #[serde(default)]
    pub transfer_credits: Vec<PlannedCourse>,
    pub last_modified: DateTime<Utc>,
}

impl Roadmap {
    pub fn semester(&self, id: &str) -> Option<&Semester> {
        self.semesters.iter().find(|s| s.id == id)
    }

    pub fn semester_mut(&mut self, id: &str) -> Option<&mut Semester> {
        self.semesters.iter_mut().find(|s| s.id == id)
    }

    /// Find the container currently holding a course, scanning semesters
    /// before the transfer bucket.
    pub fn locate(&self, course_id: &str) -> Option<Container> {
        if let Some(semester) = self.semesters.iter().find(|s| s.contains(course_id)) {
            return Some(Container::Semester(semester.id.clone()));
        }
        self.transfer_credits
            .iter()
            .any(|c| c.id() == course_id)
            .then_some(Container::TransferBucket)
    }

    /// Ids of every course placed in a semester or the transfer bucket.
    pub fn placed_ids(&self) -> HashSet<&str> {
        self.semesters
            .iter()
            .flat_map(|s| s.courses.iter())
            .chain(self.transfer_credits.iter())
            .map(PlannedCourse::id)
            .collect()
    }

    pub fn planned_credits(&self) -> u32 {
        self.semesters
            .iter()
            .map(|s| s.total_credits)
            .fold(0, u32::saturating_add)
    }

    pub fn transfer_credit_total(&self) -> u32 {
        self.transfer_credits
            .iter()
            .map(PlannedCourse::credits)
            .fold(0, u32::saturating_add)
    }

    pub fn total_credits(&self) -> u32 {
        self.planned_credits()
            .saturating_add(self.transfer_credit_total())
    }
}
