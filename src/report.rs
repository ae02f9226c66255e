//! Read-only views over a roadmap: totals, academic-year grouping, hub
//! coverage and a plain-text export.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{PlannedCourse, Roadmap, Semester, Term};
use crate::planner::CreditLoad;

/// One academic year's worth of semesters.
#[derive(Debug, Clone, Serialize)]
pub struct AcademicYear<'a> {
    /// 1-based position in the program.
    pub number: usize,
    pub semesters: Vec<&'a Semester>,
}

impl AcademicYear<'_> {
    pub fn total_credits(&self) -> u32 {
        self.semesters
            .iter()
            .map(|s| s.total_credits)
            .fold(0, u32::saturating_add)
    }
}

/// Per-semester line of a [`RoadmapSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterLoad {
    pub id: String,
    pub label: String,
    pub total_credits: u32,
    pub course_count: usize,
    pub load: CreditLoad,
}

/// Credit totals and hub coverage for a roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadmapSummary {
    pub total_credits: u32,
    pub planned_credits: u32,
    pub transfer_credits: u32,
    pub course_count: usize,
    pub semesters: Vec<SemesterLoad>,
    /// Number of placed courses (semesters and transfer) tagged with each hub.
    pub hub_coverage: BTreeMap<String, usize>,
}

/// Group semesters into academic years. A new year begins every time the
/// configured starting term comes round again.
pub fn group_by_academic_year(semesters: &[Semester], start: Term) -> Vec<AcademicYear<'_>> {
    let mut years: Vec<AcademicYear<'_>> = Vec::new();

    for (index, semester) in semesters.iter().enumerate() {
        let starts_year = index == 0 || semester.term == start;
        if let (false, Some(year)) = (starts_year, years.last_mut()) {
            year.semesters.push(semester);
            continue;
        }
        years.push(AcademicYear {
            number: years.len() + 1,
            semesters: vec![semester],
        });
    }

    years
}

/// Calendar span of a group of semesters, e.g. `2025-2026`. Empty when years
/// are hidden.
pub fn academic_year_label(semesters: &[&Semester], show_years: bool) -> String {
    if !show_years {
        return String::new();
    }
    let first = semesters.iter().map(|s| s.year).min();
    let last = semesters.iter().map(|s| s.year).max();
    match (first, last) {
        (Some(first), Some(last)) if first == last => first.to_string(),
        (Some(first), Some(last)) => format!("{}-{}", first, last),
        _ => String::new(),
    }
}

pub fn summarize(roadmap: &Roadmap) -> RoadmapSummary {
    let show_years = roadmap.config.show_years;

    let semesters = roadmap
        .semesters
        .iter()
        .map(|s| SemesterLoad {
            id: s.id.clone(),
            label: s.label(show_years),
            total_credits: s.total_credits,
            course_count: s.courses.len(),
            load: CreditLoad::classify(s.total_credits),
        })
        .collect();

    let placed: Vec<&PlannedCourse> = roadmap
        .semesters
        .iter()
        .flat_map(|s| s.courses.iter())
        .chain(roadmap.transfer_credits.iter())
        .collect();

    let mut hub_coverage = BTreeMap::new();
    for course in &placed {
        for hub in &course.course.hub_requirements {
            *hub_coverage.entry(hub.clone()).or_insert(0) += 1;
        }
    }

    RoadmapSummary {
        total_credits: roadmap.total_credits(),
        planned_credits: roadmap.planned_credits(),
        transfer_credits: roadmap.transfer_credit_total(),
        course_count: placed.len(),
        semesters,
        hub_coverage,
    }
}

/// Render the roadmap as plain text for printing or sharing.
pub fn render_text(roadmap: &Roadmap) -> String {
    let show_years = roadmap.config.show_years;
    let mut out = String::new();

    out.push_str("MY ACADEMIC ROADMAP\n");
    out.push_str(&"=".repeat(51));
    out.push_str("\n\n");

    if !roadmap.transfer_credits.is_empty() {
        out.push_str("TRANSFER CREDITS (AP/IB/Other)\n");
        out.push_str(&"-".repeat(50));
        out.push('\n');
        for course in &roadmap.transfer_credits {
            out.push_str(&course_line(course));
            if let Some(source) = &course.course.transfer_source {
                out.push_str(&format!(" [{}]", source));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "Total Transfer Credits: {}\n\n",
            roadmap.transfer_credit_total()
        ));
    }

    for year in group_by_academic_year(&roadmap.semesters, roadmap.config.start_semester) {
        out.push_str(&format!("YEAR {}", year.number));
        let label = academic_year_label(&year.semesters, show_years);
        if !label.is_empty() {
            out.push_str(&format!(" ({})", label));
        }
        out.push('\n');
        out.push_str(&"=".repeat(50));
        out.push_str("\n\n");

        for semester in &year.semesters {
            out.push_str(&semester.label(show_years));
            out.push('\n');
            out.push_str(&"-".repeat(30));
            out.push('\n');

            if semester.courses.is_empty() {
                out.push_str("  No courses planned\n");
            } else {
                for course in &semester.courses {
                    out.push_str("  ");
                    out.push_str(&course_line(course));
                    out.push('\n');
                }
                out.push_str(&format!(
                    "  Semester Total: {} credits\n",
                    semester.total_credits
                ));
            }
            out.push('\n');
        }
    }

    out.push_str("SUMMARY\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    out.push_str(&format!(
        "Transfer Credits: {}\n",
        roadmap.transfer_credit_total()
    ));
    out.push_str(&format!("Planned Credits: {}\n", roadmap.planned_credits()));
    out.push_str(&format!("Total Credits: {}\n", roadmap.total_credits()));

    out
}

fn course_line(course: &PlannedCourse) -> String {
    format!(
        "{} - {} ({} cr)",
        course.course.course_id, course.course.title, course.course.credits
    )
}
