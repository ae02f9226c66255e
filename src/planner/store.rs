//! The authoritative in-memory roadmap and its persistence.

use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use super::generator::{generate_default_roadmap, generate_semesters, next_semester};
use super::placement::{self, PlacementOutcome};
use super::storage::RoadmapStorage;
use super::validation::{validate, validate_config, ConfigError};
use crate::models::{
    Container, Course, PlannedCourse, Roadmap, RoadmapConfig, Semester, ValidationWarning,
};

/// Errors a store mutation can report. Placement no-ops are not errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to persist roadmap: {0:#}")]
    Persistence(anyhow::Error),
}

/// Why a persisted roadmap was discarded during load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum LoadIssue {
    #[error("stored roadmap could not be read: {0}")]
    Unreadable(String),

    #[error("stored roadmap is malformed: {0}")]
    Malformed(String),

    #[error("stored roadmap has an invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result of replacing the roadmap configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsOutcome {
    pub semester_count: usize,
    /// Courses whose semester no longer exists; they are back in the pool.
    pub returned_to_pool: Vec<String>,
}

/// Owns the current [`Roadmap`] and writes it through a [`RoadmapStorage`]
/// after every mutation.
///
/// Mutations build the next aggregate from a copy, persist it whole, and
/// only then swap it in. A failed write leaves the in-memory roadmap as it
/// was.
pub struct RoadmapStore<S> {
    storage: S,
    roadmap: Roadmap,
    enrolled: Vec<PlannedCourse>,
    active_drag: Option<String>,
    load_issue: Option<LoadIssue>,
}

impl<S: RoadmapStorage> RoadmapStore<S> {
    /// Restore the persisted roadmap, or start from the baseline plan.
    ///
    /// A record that cannot be read or parsed is discarded and reported via
    /// [`RoadmapStore::load_issue`]; loading itself never fails.
    pub fn load(storage: S) -> Self {
        let (roadmap, load_issue) = match storage.read() {
            Ok(Some(body)) => match decode(&body) {
                Ok(roadmap) => {
                    tracing::debug!(
                        semesters = roadmap.semesters.len(),
                        "Restored persisted roadmap"
                    );
                    (roadmap, None)
                }
                Err(issue) => {
                    tracing::warn!("{}; starting from the default roadmap", issue);
                    if let Err(e) = storage.clear() {
                        tracing::error!("Failed to discard bad roadmap record: {:#}", e);
                    }
                    (baseline_roadmap(), Some(issue))
                }
            },
            Ok(None) => (baseline_roadmap(), None),
            Err(e) => {
                let issue = LoadIssue::Unreadable(format!("{:#}", e));
                tracing::warn!("{}; starting from the default roadmap", issue);
                (baseline_roadmap(), Some(issue))
            }
        };

        Self {
            storage,
            roadmap,
            enrolled: Vec::new(),
            active_drag: None,
            load_issue,
        }
    }

    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    /// Set when the persisted record had to be discarded on load.
    pub fn load_issue(&self) -> Option<&LoadIssue> {
        self.load_issue.as_ref()
    }

    pub fn take_load_issue(&mut self) -> Option<LoadIssue> {
        self.load_issue.take()
    }

    pub fn active_drag(&self) -> Option<&str> {
        self.active_drag.as_deref()
    }

    pub fn enrolled(&self) -> &[PlannedCourse] {
        &self.enrolled
    }

    /// Replace the enrolled-course input. Each course enters the planning
    /// domain as `planned` and unassigned.
    pub fn set_enrolled_courses(&mut self, courses: Vec<Course>) {
        self.enrolled = courses.into_iter().map(PlannedCourse::from_enrolled).collect();
    }

    /// Enrolled courses not yet placed in a semester or the transfer bucket.
    pub fn available_courses(&self) -> Vec<PlannedCourse> {
        placement::available_courses(&self.enrolled, &self.roadmap)
    }

    /// Move a course into `target`, persisting the result.
    pub fn place(
        &mut self,
        course_id: &str,
        target: &Container,
    ) -> Result<PlacementOutcome, StoreError> {
        let pool = self.available_courses();
        match placement::place(&self.roadmap, &pool, course_id, target) {
            Some((next, outcome)) => {
                self.commit(next)?;
                Ok(outcome)
            }
            None => {
                tracing::debug!(course_id, target = %target, "Placement had no effect");
                Ok(PlacementOutcome::Unchanged)
            }
        }
    }

    /// Delete a course from one semester or the transfer bucket.
    pub fn remove(
        &mut self,
        container: &Container,
        course_id: &str,
    ) -> Result<PlacementOutcome, StoreError> {
        match placement::remove(&self.roadmap, container, course_id) {
            Some((next, outcome)) => {
                self.commit(next)?;
                Ok(outcome)
            }
            None => Ok(PlacementOutcome::Unchanged),
        }
    }

    pub fn remove_transfer_credit(
        &mut self,
        course_id: &str,
    ) -> Result<PlacementOutcome, StoreError> {
        self.remove(&Container::TransferBucket, course_id)
    }

    /// Append one semester after the last one.
    pub fn add_semester(&mut self) -> Result<Semester, StoreError> {
        let semester = next_semester(&self.roadmap)?;
        let mut next = self.roadmap.clone();
        next.semesters.push(semester.clone());
        self.commit(next)?;
        tracing::info!(semester = %semester.id, "Added semester");
        Ok(semester)
    }

    /// Replace the configuration and regenerate the semester sequence.
    ///
    /// Courses in semesters that still exist stay put. Courses in semesters
    /// that disappear return to the pool and are listed in the outcome, even
    /// when they are no longer among the enrolled courses. The transfer
    /// bucket is untouched. An invalid config leaves everything as it was.
    pub fn update_config(&mut self, config: RoadmapConfig) -> Result<SettingsOutcome, StoreError> {
        let mut next = generate_default_roadmap(config)?;
        next.transfer_credits = self.roadmap.transfer_credits.clone();

        let mut orphans = Vec::new();
        for old in &self.roadmap.semesters {
            match next.semester_mut(&old.id) {
                Some(kept) => {
                    kept.courses = old.courses.clone();
                    kept.recompute_credits();
                }
                None => orphans.extend(old.courses.iter().cloned()),
            }
        }

        let semester_count = next.semesters.len();
        self.commit(next)?;

        let returned_to_pool: Vec<String> = orphans.iter().map(|c| c.id().to_string()).collect();
        for orphan in orphans {
            if !self.enrolled.iter().any(|c| c.id() == orphan.id()) {
                self.enrolled.push(PlannedCourse::from_enrolled(orphan.course));
            }
        }

        if !returned_to_pool.is_empty() {
            tracing::info!(
                count = returned_to_pool.len(),
                "Returned courses from removed semesters to the pool"
            );
        }

        Ok(SettingsOutcome {
            semester_count,
            returned_to_pool,
        })
    }

    /// Start a drag gesture. Returns the dragged course if it exists.
    pub fn drag_started(&mut self, course_id: &str) -> Option<PlannedCourse> {
        let pool = self.available_courses();
        let found = placement::resolve(&pool, &self.roadmap, course_id).map(|(course, _)| course);
        self.active_drag = found.as_ref().map(|c| c.id().to_string());
        found
    }

    /// Finish a drag gesture. A missing drop target cancels it.
    pub fn drag_ended(
        &mut self,
        course_id: &str,
        target: Option<&Container>,
    ) -> Result<PlacementOutcome, StoreError> {
        self.active_drag = None;
        match target {
            Some(target) => self.place(course_id, target),
            None => Ok(PlacementOutcome::Unchanged),
        }
    }

    /// Advisories for dropping a known course into a known semester.
    pub fn validate_placement(
        &self,
        course_id: &str,
        semester_id: &str,
    ) -> Option<Vec<ValidationWarning>> {
        let pool = self.available_courses();
        let (course, _) = placement::resolve(&pool, &self.roadmap, course_id)?;
        let semester = self.roadmap.semester(semester_id)?;
        Some(validate(&course, semester))
    }

    /// Throw the current plan away and start over from the baseline.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.commit(baseline_roadmap())?;
        tracing::info!("Roadmap reset to default");
        Ok(())
    }

    fn commit(&mut self, mut next: Roadmap) -> Result<(), StoreError> {
        next.last_modified = Utc::now();
        let body =
            serde_json::to_string(&next).map_err(|e| StoreError::Persistence(e.into()))?;
        self.storage.write(&body).map_err(StoreError::Persistence)?;
        self.roadmap = next;
        Ok(())
    }
}

/// Four years, no summer, fall of the current calendar year.
fn baseline_roadmap() -> Roadmap {
    let config = RoadmapConfig::default();
    let semesters = generate_semesters(&config).unwrap_or_default();
    Roadmap {
        config,
        semesters,
        transfer_credits: Vec::new(),
        last_modified: Utc::now(),
    }
}

fn decode(body: &str) -> Result<Roadmap, LoadIssue> {
    let mut roadmap: Roadmap =
        serde_json::from_str(body).map_err(|e| LoadIssue::Malformed(e.to_string()))?;

    validate_config(&roadmap.config).map_err(|e| LoadIssue::InvalidConfig(e.to_string()))?;

    let mut seen = HashSet::new();
    for semester in &roadmap.semesters {
        if semester.id != Semester::make_id(semester.year, semester.term) {
            return Err(LoadIssue::Malformed(format!(
                "semester id {} does not match its term",
                semester.id
            )));
        }
        if !seen.insert(semester.id.clone()) {
            return Err(LoadIssue::Malformed(format!(
                "duplicate semester {}",
                semester.id
            )));
        }
    }

    normalize(&mut roadmap);
    Ok(roadmap)
}

/// Re-establish the aggregate invariants on a restored record: container
/// tags match their location, a course id occurs once, and semester totals
/// equal the sum of their courses.
fn normalize(roadmap: &mut Roadmap) {
    let mut seen: HashSet<String> = HashSet::new();

    for semester in &mut roadmap.semesters {
        semester
            .courses
            .retain(|c| seen.insert(c.id().to_string()));
        for course in &mut semester.courses {
            course.container = Container::Semester(semester.id.clone());
        }
        semester.recompute_credits();
    }

    roadmap
        .transfer_credits
        .retain(|c| seen.insert(c.id().to_string()));
    for course in &mut roadmap.transfer_credits {
        course.container = Container::TransferBucket;
        course.is_transfer = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Term;
    use crate::planner::MemoryStorage;

    struct BrokenStorage;

    impl RoadmapStorage for BrokenStorage {
        fn read(&self) -> anyhow::Result<Option<String>> {
            anyhow::bail!("disk unavailable")
        }

        fn write(&self, _body: &str) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }

        fn clear(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn one_year() -> RoadmapConfig {
        RoadmapConfig {
            total_years: 1,
            includes_summer: false,
            start_year: 2025,
            start_semester: Term::Fall,
            show_years: true,
        }
    }

    #[test]
    fn unreadable_storage_falls_back_to_default() {
        let store = RoadmapStore::load(BrokenStorage);
        assert_eq!(store.roadmap().semesters.len(), 8);
        assert!(matches!(store.load_issue(), Some(LoadIssue::Unreadable(_))));
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let mut store = RoadmapStore::load(BrokenStorage);
        let before = store.roadmap().clone();

        let result = store.add_semester();

        assert!(matches!(result, Err(StoreError::Persistence(_))));
        assert_eq!(store.roadmap(), &before);
    }

    #[test]
    fn normalize_collapses_duplicates_and_fixes_totals() {
        let mut store = RoadmapStore::load(MemoryStorage::new());
        store.update_config(one_year()).unwrap();
        let mut roadmap = store.roadmap().clone();

        let course = PlannedCourse::from_enrolled(Course::new("CAS CS 111", "Intro", 4));
        roadmap.semesters[0].courses.push(course.clone());
        roadmap.semesters[1].courses.push(course.clone());
        roadmap.transfer_credits.push(course);
        roadmap.semesters[0].total_credits = 99;

        normalize(&mut roadmap);

        assert_eq!(roadmap.semesters[0].total_credits, 4);
        assert_eq!(
            roadmap.semesters[0].courses[0].container,
            Container::semester("2025-fall")
        );
        assert!(roadmap.semesters[1].courses.is_empty());
        assert!(roadmap.transfer_credits.is_empty());
    }

    #[test]
    fn decode_rejects_mismatched_semester_id() {
        let mut roadmap = baseline_roadmap();
        roadmap.semesters[0].id = "1999-fall".to_string();
        let body = serde_json::to_string(&roadmap).unwrap();

        assert!(matches!(decode(&body), Err(LoadIssue::Malformed(_))));
    }
}
