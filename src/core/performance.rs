//! Detailed per-section performance rows
//!
//! Callers apply access scoping before handing records over; this module only
//! shapes the rows. Scores are rounded half-up to one decimal and a missing
//! score shows as `--`, so "not graded yet" never reads as a zero.

use crate::core::grading::GradeCell;
use crate::core::models::{Activity, EnrollmentRecord, SectionId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Absences allowed per section
pub const ALLOWED_ABSENCES: u32 = 3;

/// Activity counts grouped by section, then by period code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    by_section: HashMap<SectionId, BTreeMap<String, usize>>,
}

impl ActivityCounts {
    /// Create an empty tally
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally a list of activities
    #[must_use]
    pub fn from_activities(activities: &[Activity]) -> Self {
        let mut counts = Self::new();
        for activity in activities {
            counts.add(activity.section_id, &activity.period, 1);
        }
        counts
    }

    /// Add `count` activities for a section in a period
    pub fn add(&mut self, section_id: SectionId, period: &str, count: usize) {
        *self
            .by_section
            .entry(section_id)
            .or_default()
            .entry(period.to_string())
            .or_insert(0) += count;
    }

    /// Activities of a section in one period
    #[must_use]
    pub fn count(&self, section_id: SectionId, period: &str) -> usize {
        self.by_section
            .get(&section_id)
            .and_then(|periods| periods.get(period))
            .copied()
            .unwrap_or(0)
    }

    /// Activities of a section across all periods
    #[must_use]
    pub fn total_for(&self, section_id: SectionId) -> usize {
        self.by_section
            .get(&section_id)
            .map_or(0, |periods| periods.values().sum())
    }
}

/// One row of the detailed performance report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPerformanceRow {
    /// Section identifier
    pub section_id: SectionId,
    /// Academic period code
    pub period: String,
    /// Course code
    pub code: String,
    /// Course name
    pub course_name: String,
    /// Number of activities assigned in the section
    pub assignments: usize,
    /// First partial score
    pub p1: GradeCell,
    /// Second partial score
    pub p2: GradeCell,
    /// Third partial score
    pub p3: GradeCell,
    /// Final exam score
    #[serde(rename = "final")]
    pub exam: GradeCell,
    /// Final grade
    pub total: GradeCell,
    /// Recorded absences. Attendance is not tracked yet, so this is always 0.
    pub absences: u32,
    /// Absences allowed in the section
    pub allowed_absences: u32,
}

impl SectionPerformanceRow {
    /// Build the row for one record
    #[must_use]
    pub fn from_record(record: &EnrollmentRecord, counts: &ActivityCounts) -> Self {
        Self {
            section_id: record.section_id,
            period: record.academic_period.clone(),
            code: record.course_code.clone(),
            course_name: record.course_name.clone(),
            assignments: counts.total_for(record.section_id),
            p1: GradeCell::rounded(record.scores.p1, 1),
            p2: GradeCell::rounded(record.scores.p2, 1),
            p3: GradeCell::rounded(record.scores.p3, 1),
            exam: GradeCell::rounded(record.scores.exam, 1),
            total: GradeCell::rounded(record.final_grade, 1),
            absences: 0,
            allowed_absences: ALLOWED_ABSENCES,
        }
    }
}

/// Build performance rows for the given records, optionally keeping only
/// one academic period. Rows follow input order.
#[must_use]
pub fn build_detailed_performance(
    records: &[EnrollmentRecord],
    counts: &ActivityCounts,
    period: Option<&str>,
) -> Vec<SectionPerformanceRow> {
    records
        .iter()
        .filter(|r| period.is_none_or(|p| r.academic_period == p))
        .map(|r| SectionPerformanceRow::from_record(r, counts))
        .collect()
}
