//! Soft constraints on placements and hard constraints on configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PlannedCourse, RoadmapConfig, Semester, Severity, Term, ValidationWarning};

/// Semester credit total above which a placement is flagged.
pub const CREDIT_OVERLOAD_THRESHOLD: u32 = 20;

/// Longest program the settings surface accepts.
pub const MAX_TOTAL_YEARS: i32 = 10;

/// Latest calendar year a roadmap may start in.
pub const MAX_START_YEAR: i32 = 9999;

/// A configuration rejected before any semester is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("program length must be at least one year (got {0})")]
    NonPositiveDuration(i32),

    #[error("program length may not exceed {MAX_TOTAL_YEARS} years (got {0})")]
    DurationTooLong(i32),

    #[error("start year must be between 1 and {MAX_START_YEAR} (got {0})")]
    InvalidStartYear(i32),

    #[error("no term follows year {0}")]
    YearOverflow(i32),

    #[error("a roadmap must start in fall or spring (got {0})")]
    InvalidStartTerm(&'static str),
}

pub fn validate_config(config: &RoadmapConfig) -> Result<(), ConfigError> {
    if config.total_years <= 0 {
        return Err(ConfigError::NonPositiveDuration(config.total_years));
    }
    if config.total_years > MAX_TOTAL_YEARS {
        return Err(ConfigError::DurationTooLong(config.total_years));
    }
    if !(1..=MAX_START_YEAR).contains(&config.start_year) {
        return Err(ConfigError::InvalidStartYear(config.start_year));
    }
    if config.start_semester == Term::Summer {
        return Err(ConfigError::InvalidStartTerm(config.start_semester.as_str()));
    }
    Ok(())
}

/// Advisories for dropping `course` into `target`.
///
/// Only the credit load is checked. Advisories never block a placement;
/// duplicates are prevented structurally by the placement engine.
pub fn validate(course: &PlannedCourse, target: &Semester) -> Vec<ValidationWarning> {
    let prospective = target.total_credits.saturating_add(course.credits());
    if prospective > CREDIT_OVERLOAD_THRESHOLD {
        vec![ValidationWarning {
            severity: Severity::Warning,
            message: "Credit overload".to_string(),
            details: Some(format!("Total credits would be {}.", prospective)),
        }]
    } else {
        Vec::new()
    }
}

/// How heavy a semester's credit load is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CreditLoad {
    Empty,
    Light,
    Normal,
    Heavy,
}

impl CreditLoad {
    pub fn classify(total_credits: u32) -> Self {
        match total_credits {
            0 => Self::Empty,
            1..=11 => Self::Light,
            12..=18 => Self::Normal,
            _ => Self::Heavy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;

    fn course(credits: u32) -> PlannedCourse {
        PlannedCourse::from_enrolled(Course::new("CAS CS 111", "Intro to CS", credits))
    }

    fn semester_with(total: u32) -> Semester {
        let mut semester = Semester::new(2025, Term::Fall);
        semester.total_credits = total;
        semester
    }

    #[test]
    fn no_warning_at_threshold() {
        assert!(validate(&course(4), &semester_with(16)).is_empty());
    }

    #[test]
    fn warns_above_threshold_with_prospective_total() {
        let warnings = validate(&course(4), &semester_with(18));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
        assert_eq!(warnings[0].message, "Credit overload");
        assert_eq!(
            warnings[0].details.as_deref(),
            Some("Total credits would be 22.")
        );
    }

    #[test]
    fn rejects_non_positive_duration() {
        let mut config = RoadmapConfig::baseline(2025);
        config.total_years = 0;
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::NonPositiveDuration(0))
        );
    }

    #[test]
    fn rejects_start_year_outside_calendar_range() {
        let mut config = RoadmapConfig::baseline(2025);
        config.start_year = i32::MAX;
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::InvalidStartYear(i32::MAX))
        );

        config.start_year = 0;
        assert!(validate_config(&config).is_err());

        config.start_year = MAX_START_YEAR;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn huge_credit_values_saturate_instead_of_overflowing() {
        let warnings = validate(&course(1), &semester_with(u32::MAX));
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].details.as_deref(),
            Some(format!("Total credits would be {}.", u32::MAX).as_str())
        );
    }

    #[test]
    fn rejects_summer_start() {
        let mut config = RoadmapConfig::baseline(2025);
        config.start_semester = Term::Summer;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidStartTerm("summer"))
        ));
    }

    #[test]
    fn classifies_credit_load() {
        assert_eq!(CreditLoad::classify(0), CreditLoad::Empty);
        assert_eq!(CreditLoad::classify(8), CreditLoad::Light);
        assert_eq!(CreditLoad::classify(16), CreditLoad::Normal);
        assert_eq!(CreditLoad::classify(18), CreditLoad::Normal);
        assert_eq!(CreditLoad::classify(19), CreditLoad::Heavy);
    }
}
