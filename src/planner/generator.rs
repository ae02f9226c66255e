//! Semester sequence generation.

use chrono::Utc;

use super::validation::{validate_config, ConfigError};
use crate::models::{Roadmap, RoadmapConfig, Semester, Term};

/// The term that follows `(year, term)`, or `None` when the year would
/// overflow.
///
/// Terms advance `fall → spring → summer → fall`, skipping summer when it is
/// disabled. The calendar year increments exactly when wrapping from fall to
/// spring.
pub fn advance(year: i32, term: Term, includes_summer: bool) -> Option<(i32, Term)> {
    match term {
        Term::Fall => year.checked_add(1).map(|next| (next, Term::Spring)),
        Term::Spring if includes_summer => Some((year, Term::Summer)),
        Term::Spring | Term::Summer => Some((year, Term::Fall)),
    }
}

/// Build `total_years × semesters_per_year` empty semesters.
pub fn generate_semesters(config: &RoadmapConfig) -> Result<Vec<Semester>, ConfigError> {
    validate_config(config)?;

    let count = config.total_years as usize * config.semesters_per_year();
    let mut semesters = Vec::with_capacity(count);
    let (mut year, mut term) = (config.start_year, config.start_semester);

    for index in 0..count {
        semesters.push(Semester::new(year, term));
        if index + 1 < count {
            (year, term) = advance(year, term, config.includes_summer)
                .ok_or(ConfigError::YearOverflow(year))?;
        }
    }

    Ok(semesters)
}

/// A fresh roadmap with an empty transfer bucket.
pub fn generate_default_roadmap(config: RoadmapConfig) -> Result<Roadmap, ConfigError> {
    let semesters = generate_semesters(&config)?;
    Ok(Roadmap {
        config,
        semesters,
        transfer_credits: Vec::new(),
        last_modified: Utc::now(),
    })
}

/// The slot appended when the roadmap is extended by one semester.
///
/// Follows the last existing semester, or starts at the configured start
/// when the roadmap has no semesters yet.
pub fn next_semester(roadmap: &Roadmap) -> Result<Semester, ConfigError> {
    match roadmap.semesters.last() {
        Some(last) => {
            let (year, term) = advance(last.year, last.term, roadmap.config.includes_summer)
                .ok_or(ConfigError::YearOverflow(last.year))?;
            Ok(Semester::new(year, term))
        }
        None => Ok(Semester::new(
            roadmap.config.start_year,
            roadmap.config.start_semester,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::validation::MAX_START_YEAR;
    use std::collections::HashSet;

    fn config(total_years: i32, includes_summer: bool, start: Term) -> RoadmapConfig {
        RoadmapConfig {
            total_years,
            includes_summer,
            start_year: 2025,
            start_semester: start,
            show_years: false,
        }
    }

    fn ids(semesters: &[Semester]) -> Vec<&str> {
        semesters.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn one_year_without_summer() {
        let semesters = generate_semesters(&config(1, false, Term::Fall)).unwrap();
        assert_eq!(ids(&semesters), vec!["2025-fall", "2026-spring"]);
    }

    #[test]
    fn summer_follows_spring() {
        let semesters = generate_semesters(&config(2, true, Term::Fall)).unwrap();
        assert_eq!(
            ids(&semesters),
            vec![
                "2025-fall",
                "2026-spring",
                "2026-summer",
                "2026-fall",
                "2027-spring",
                "2027-summer",
            ]
        );
    }

    #[test]
    fn spring_start_stays_in_start_year_until_fall() {
        let semesters = generate_semesters(&config(1, false, Term::Spring)).unwrap();
        assert_eq!(ids(&semesters), vec!["2025-spring", "2025-fall"]);
    }

    #[test]
    fn count_order_and_uniqueness_hold_for_every_shape() {
        for years in 1..=10 {
            for summer in [false, true] {
                for start in [Term::Fall, Term::Spring] {
                    let cfg = config(years, summer, start);
                    let semesters = generate_semesters(&cfg).unwrap();
                    assert_eq!(
                        semesters.len(),
                        years as usize * if summer { 3 } else { 2 }
                    );

                    let unique: HashSet<_> = semesters.iter().map(|s| &s.id).collect();
                    assert_eq!(unique.len(), semesters.len());

                    for pair in semesters.windows(2) {
                        assert!((pair[0].year, pair[0].term) < (pair[1].year, pair[1].term));
                    }
                }
            }
        }
    }

    #[test]
    fn zero_years_is_a_config_error() {
        assert_eq!(
            generate_semesters(&config(0, false, Term::Fall)),
            Err(ConfigError::NonPositiveDuration(0))
        );
    }

    #[test]
    fn next_semester_continues_the_sequence() {
        let roadmap = generate_default_roadmap(config(1, true, Term::Fall)).unwrap();
        assert_eq!(roadmap.semesters.last().unwrap().id, "2026-summer");
        assert_eq!(next_semester(&roadmap).unwrap().id, "2026-fall");

        let roadmap = generate_default_roadmap(config(1, false, Term::Fall)).unwrap();
        assert_eq!(next_semester(&roadmap).unwrap().id, "2026-fall");
    }

    #[test]
    fn next_semester_on_empty_roadmap_uses_config_start() {
        let mut roadmap = generate_default_roadmap(config(1, false, Term::Spring)).unwrap();
        roadmap.semesters.clear();
        assert_eq!(next_semester(&roadmap).unwrap().id, "2025-spring");
    }

    #[test]
    fn advance_stops_at_the_last_representable_year() {
        assert_eq!(advance(i32::MAX, Term::Fall, false), None);
        assert_eq!(
            advance(i32::MAX, Term::Spring, false),
            Some((i32::MAX, Term::Fall))
        );
    }

    #[test]
    fn extending_past_the_last_year_is_an_error() {
        let mut roadmap = generate_default_roadmap(config(1, false, Term::Fall)).unwrap();
        roadmap.semesters.push(Semester::new(i32::MAX, Term::Fall));

        assert_eq!(
            next_semester(&roadmap),
            Err(ConfigError::YearOverflow(i32::MAX))
        );
    }

    #[test]
    fn latest_start_year_still_generates() {
        let mut latest = config(10, true, Term::Fall);
        latest.start_year = MAX_START_YEAR;

        let semesters = generate_semesters(&latest).unwrap();
        assert_eq!(semesters.last().unwrap().id, "10009-summer");
    }
}
