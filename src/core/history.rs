//! Academic history: per-period GPA and standing
//!
//! A student's enrollment records are grouped by raw period code (no
//! distinction between quadrimester and semester periods), periods are
//! ordered by code, and each period gets a credit-weighted GPA from the
//! letter-grade point table.

use crate::core::grading::{grade_points, round_half_up, GradeCell, UNGRADED};
use crate::core::models::EnrollmentRecord;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// GPA at or above which a period is in good standing
pub const NORMAL_GPA: f64 = 2.0;

/// GPA at or above which a period is a warning rather than probation
pub const WARNING_GPA: f64 = 1.5;

/// Academic standing of a period, derived from its GPA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcademicStanding {
    /// GPA ≥ 2.0
    Normal,
    /// 1.5 ≤ GPA < 2.0
    Warning,
    /// GPA < 1.5
    Probation,
}

impl AcademicStanding {
    /// Standing for a (rounded) period GPA
    #[must_use]
    pub fn for_gpa(gpa: f64) -> Self {
        if gpa >= NORMAL_GPA {
            Self::Normal
        } else if gpa >= WARNING_GPA {
            Self::Warning
        } else {
            Self::Probation
        }
    }

    /// Label printed on transcripts
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Warning => "Advertencia",
            Self::Probation => "Probatoria",
        }
    }
}

impl fmt::Display for AcademicStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for AcademicStanding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One course line of a period summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRow {
    /// Course code
    pub code: String,
    /// Course name
    pub name: String,
    /// Course credits
    pub credits: u32,
    /// Final grade rounded to a whole number, or `--`
    pub grade: GradeCell,
    /// Letter grade, or `--`
    pub letter: String,
    /// Credits times the numeric final grade (0 when ungraded)
    pub points: f64,
    /// Credits times the letter's grade points
    pub quality_points: f64,
}

/// Derived summary of one academic period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    /// Period code
    pub period: String,
    /// Program (career) name
    pub career: String,
    /// Standing derived from the GPA
    pub condition: AcademicStanding,
    /// Sum of credits over the period's courses
    pub credits: u32,
    /// Sum of quality points over the period's courses
    pub quality_points: f64,
    /// Quality points over credits, rounded to two decimals
    pub gpa: f64,
    /// Courses in input order
    pub courses: Vec<CourseRow>,
}

/// Build a course row from a record
#[must_use]
pub fn course_row(record: &EnrollmentRecord) -> CourseRow {
    let credits = f64::from(record.credits);
    CourseRow {
        code: record.course_code.clone(),
        name: record.course_name.clone(),
        credits: record.credits,
        grade: GradeCell::rounded(record.final_grade, 0),
        letter: record
            .letter_grade
            .map_or_else(|| UNGRADED.to_string(), |l| l.to_string()),
        points: credits * record.final_grade.unwrap_or(0.0),
        quality_points: credits * grade_points(record.letter_grade),
    }
}

/// Summarize one period's records
#[must_use]
pub fn summarize_period(
    period: &str,
    records: &[&EnrollmentRecord],
    program_name: &str,
) -> PeriodSummary {
    let courses: Vec<CourseRow> = records.iter().map(|r| course_row(r)).collect();
    let credits: u32 = courses.iter().map(|c| c.credits).sum();
    let quality_points: f64 = courses.iter().map(|c| c.quality_points).sum();

    let gpa = if credits > 0 {
        round_half_up(quality_points / f64::from(credits), 2)
    } else {
        0.0
    };

    PeriodSummary {
        period: period.to_string(),
        career: program_name.to_string(),
        condition: AcademicStanding::for_gpa(gpa),
        credits,
        quality_points,
        gpa,
        courses,
    }
}

/// Group one student's records into per-period summaries.
///
/// Periods come out in ascending code order; courses inside a period keep
/// their input order. No records gives an empty history.
#[must_use]
pub fn build_history(records: &[EnrollmentRecord], program_name: &str) -> Vec<PeriodSummary> {
    let mut by_period: BTreeMap<&str, Vec<&EnrollmentRecord>> = BTreeMap::new();
    for record in records {
        by_period
            .entry(record.academic_period.as_str())
            .or_default()
            .push(record);
    }

    by_period
        .into_iter()
        .map(|(period, rows)| summarize_period(period, &rows, program_name))
        .collect()
}

/// Credit-weighted GPA across a whole history, rounded to two decimals
#[must_use]
pub fn cumulative_gpa(history: &[PeriodSummary]) -> f64 {
    let credits: u32 = history.iter().map(|p| p.credits).sum();
    if credits == 0 {
        return 0.0;
    }
    let quality_points: f64 = history.iter().map(|p| p.quality_points).sum();
    round_half_up(quality_points / f64::from(credits), 2)
}
