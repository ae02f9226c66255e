use serde::{Deserialize, Serialize};

use super::Container;

/// Largest credit value a single enrolled course may carry.
pub const MAX_COURSE_CREDITS: u32 = 30;

/// An immutable catalog fact about a course.
///
/// Course metadata is copied into the planning domain when a course is
/// enrolled and is never re-fetched afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course code, e.g. `CAS CS 111`.
    pub course_id: String,
    #[serde(rename = "course")]
    pub title: String,
    pub credits: u32,
    /// Hub requirement categories the course satisfies.
    #[serde(default)]
    pub hub_requirements: Vec<String>,
    /// Where an externally earned credit came from (AP, IB, another school).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_source: Option<String>,
}

impl Course {
    pub fn new(course_id: impl Into<String>, title: impl Into<String>, credits: u32) -> Self {
        Self {
            course_id: course_id.into(),
            title: title.into(),
            credits,
            hub_requirements: Vec::new(),
            transfer_source: None,
        }
    }

    pub fn with_hubs<I, T>(mut self, hubs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.hub_requirements = hubs.into_iter().map(Into::into).collect();
        self
    }
}

/// The lifecycle status of a course inside a roadmap.
///
/// - `Completed`: Already taken, or credited through transfer
/// - `InProgress`: Currently being taken
/// - `Planned`: Scheduled for a future semester
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CourseStatus {
    Completed,
    InProgress,
    Planned,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::Planned => "planned",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            "in-progress" => Some(Self::InProgress),
            "planned" => Some(Self::Planned),
            _ => None,
        }
    }
}

/// A course as it lives inside the roadmap.
///
/// The `container` is serialized as `semesterId` so persisted records keep
/// the flat shape the planner UI reads: an empty string for the pool,
/// `transfer-credits` for the transfer bucket, otherwise a semester id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedCourse {
    #[serde(flatten)]
    pub course: Course,
    pub status: CourseStatus,
    #[serde(rename = "semesterId", default)]
    pub container: Container,
    #[serde(default)]
    pub is_transfer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationWarning>,
}

impl PlannedCourse {
    /// Bring an enrolled course into the planning domain, unassigned.
    pub fn from_enrolled(course: Course) -> Self {
        Self {
            course,
            status: CourseStatus::Planned,
            container: Container::Pool,
            is_transfer: false,
            grade: None,
            warnings: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.course.course_id
    }

    pub fn credits(&self) -> u32 {
        self.course.credits
    }
}

impl From<Course> for PlannedCourse {
    fn from(course: Course) -> Self {
        Self::from_enrolled(course)
    }
}

/// How serious an advisory is. Advisories never block a placement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// An advisory attached to a course placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
