//! Academic period model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Length class of an academic period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodKind {
    /// Four-month term ("cuatrimestre")
    #[serde(rename = "cuatrimestre")]
    Quadrimester,
    /// Six-month term ("semestre")
    #[serde(rename = "semestre")]
    Semester,
}

/// A term in the academic calendar
///
/// Periods are referenced everywhere by their `code`; the catalog entry only
/// adds calendar data. History aggregation groups by the raw code and does
/// not look at `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicPeriod {
    /// Period code (e.g., "2025-C1")
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Quadrimester or semester
    pub kind: PeriodKind,
    /// Calendar year
    pub year: i32,
    /// Ordinal of the period within the year
    pub number: u32,
    /// First day of classes
    pub start_date: NaiveDate,
    /// Last day of classes
    pub end_date: NaiveDate,
    /// First day students may request enrollment
    #[serde(default)]
    pub enrollment_start_date: Option<NaiveDate>,
    /// Last day students may request enrollment
    #[serde(default)]
    pub enrollment_end_date: Option<NaiveDate>,
}

impl AcademicPeriod {
    /// Whether `today` falls inside the enrollment window (bounds inclusive).
    ///
    /// A period without both bounds never accepts enrollment.
    #[must_use]
    pub fn is_enrollment_open(&self, today: NaiveDate) -> bool {
        match (self.enrollment_start_date, self.enrollment_end_date) {
            (Some(start), Some(end)) => start <= today && today <= end,
            _ => false,
        }
    }

    /// Whether `day` falls between the first and last day of classes
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period() -> AcademicPeriod {
        AcademicPeriod {
            code: "2025-C1".to_string(),
            name: "First Quadrimester 2025".to_string(),
            kind: PeriodKind::Quadrimester,
            year: 2025,
            number: 1,
            start_date: date(2025, 1, 13),
            end_date: date(2025, 4, 30),
            enrollment_start_date: Some(date(2025, 1, 2)),
            enrollment_end_date: Some(date(2025, 1, 10)),
        }
    }

    #[test]
    fn test_enrollment_window_inclusive() {
        let p = period();
        assert!(p.is_enrollment_open(date(2025, 1, 2)));
        assert!(p.is_enrollment_open(date(2025, 1, 10)));
        assert!(!p.is_enrollment_open(date(2025, 1, 11)));
        assert!(!p.is_enrollment_open(date(2024, 12, 31)));
    }

    #[test]
    fn test_missing_window_is_closed() {
        let mut p = period();
        p.enrollment_end_date = None;
        assert!(!p.is_enrollment_open(date(2025, 1, 5)));
    }

    #[test]
    fn test_contains() {
        let p = period();
        assert!(p.contains(date(2025, 2, 1)));
        assert!(!p.contains(date(2025, 5, 1)));
    }
}
