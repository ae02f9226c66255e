//! Moving courses between the pool, semesters and the transfer bucket.
//!
//! Every function here is pure: it takes the current aggregate and returns
//! the next one (or `None` when the gesture has no effect). Persisting the
//! result is the store's job.

use serde::Serialize;

use super::validation::validate;
use crate::models::{
    Container, CourseStatus, PlannedCourse, Roadmap, ValidationWarning,
};

/// What a placement or removal did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// Nothing matched, or the course was already where it was dropped.
    Unchanged,
    Moved {
        course_id: String,
        from: Container,
        to: Container,
        /// Advisories raised for the target semester. Never blocking.
        warnings: Vec<ValidationWarning>,
    },
    Removed {
        course_id: String,
        from: Container,
    },
}

impl PlacementOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Enrolled courses that are not placed anywhere.
pub fn available_courses(enrolled: &[PlannedCourse], roadmap: &Roadmap) -> Vec<PlannedCourse> {
    let placed = roadmap.placed_ids();
    enrolled
        .iter()
        .filter(|c| !placed.contains(c.id()))
        .cloned()
        .collect()
}

/// Find a course by scanning the pool, then every semester, then the
/// transfer bucket. The first match wins.
pub fn resolve(
    pool: &[PlannedCourse],
    roadmap: &Roadmap,
    course_id: &str,
) -> Option<(PlannedCourse, Container)> {
    if let Some(course) = pool.iter().find(|c| c.id() == course_id) {
        return Some((course.clone(), Container::Pool));
    }

    for semester in &roadmap.semesters {
        if let Some(course) = semester.courses.iter().find(|c| c.id() == course_id) {
            return Some((course.clone(), Container::Semester(semester.id.clone())));
        }
    }

    roadmap
        .transfer_credits
        .iter()
        .find(|c| c.id() == course_id)
        .map(|c| (c.clone(), Container::TransferBucket))
}

/// Move `course_id` into `target`.
///
/// `pool` is the derived pool for the current roadmap. Returns `None` when
/// the course cannot be found, when it already sits in `target`, or when
/// `target` names a semester that does not exist.
pub fn place(
    roadmap: &Roadmap,
    pool: &[PlannedCourse],
    course_id: &str,
    target: &Container,
) -> Option<(Roadmap, PlacementOutcome)> {
    let (course, source) = resolve(pool, roadmap, course_id)?;
    if &source == target {
        return None;
    }
    if let Container::Semester(id) = target {
        roadmap.semester(id)?;
    }

    let mut next = roadmap.clone();
    detach(&mut next, course_id);

    let warnings = match target {
        Container::Pool => Vec::new(),
        Container::TransferBucket => {
            if !next.transfer_credits.iter().any(|c| c.id() == course_id) {
                next.transfer_credits.push(PlannedCourse {
                    status: CourseStatus::Completed,
                    container: Container::TransferBucket,
                    is_transfer: true,
                    warnings: Vec::new(),
                    ..course
                });
            }
            Vec::new()
        }
        Container::Semester(id) => {
            let semester = next.semester_mut(id)?;
            let warnings = validate(&course, semester);
            if !semester.contains(course_id) {
                semester.courses.push(PlannedCourse {
                    container: target.clone(),
                    is_transfer: false,
                    warnings: warnings.clone(),
                    ..course
                });
                semester.recompute_credits();
            }
            warnings
        }
    };

    tracing::debug!(course_id, from = %source, to = %target, "Placed course");

    Some((
        next,
        PlacementOutcome::Moved {
            course_id: course_id.to_string(),
            from: source,
            to: target.clone(),
            warnings,
        },
    ))
}

/// Delete `course_id` from one semester or the transfer bucket.
///
/// Returns `None` when the container does not hold the course. Removing
/// from the pool is meaningless and also returns `None`.
pub fn remove(
    roadmap: &Roadmap,
    container: &Container,
    course_id: &str,
) -> Option<(Roadmap, PlacementOutcome)> {
    let mut next = roadmap.clone();

    match container {
        Container::Pool => return None,
        Container::Semester(id) => {
            let semester = next.semester_mut(id)?;
            let before = semester.courses.len();
            semester.courses.retain(|c| c.id() != course_id);
            if semester.courses.len() == before {
                return None;
            }
            semester.recompute_credits();
        }
        Container::TransferBucket => {
            let before = next.transfer_credits.len();
            next.transfer_credits.retain(|c| c.id() != course_id);
            if next.transfer_credits.len() == before {
                return None;
            }
        }
    }

    Some((
        next,
        PlacementOutcome::Removed {
            course_id: course_id.to_string(),
            from: container.clone(),
        },
    ))
}

/// Take a course out of every container, recomputing the totals of any
/// semester that changed.
pub(crate) fn detach(roadmap: &mut Roadmap, course_id: &str) {
    for semester in &mut roadmap.semesters {
        if semester.contains(course_id) {
            semester.courses.retain(|c| c.id() != course_id);
            semester.recompute_credits();
        }
    }
    roadmap.transfer_credits.retain(|c| c.id() != course_id);
}
