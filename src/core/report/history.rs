//! Academic history report

use super::{ReportFormat, ReportGenerator};
use crate::core::history::{cumulative_gpa, PeriodSummary};
use crate::core::models::{Student, StudentId};
use askama::Template;
use serde::Serialize;
use std::error::Error;

/// A student's per-period history with the cumulative GPA
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryReport {
    /// Student identifier
    pub student_id: StudentId,
    /// Student name
    pub student_name: String,
    /// Program name, or `N/A`
    pub program: String,
    /// Credit-weighted GPA over every period
    pub cumulative_gpa: f64,
    /// Period summaries in ascending period order
    pub periods: Vec<PeriodSummary>,
}

impl HistoryReport {
    /// Wrap a computed history for `student`
    #[must_use]
    pub fn new(student: &Student, periods: Vec<PeriodSummary>) -> Self {
        Self {
            student_id: student.id,
            student_name: student.name.clone(),
            program: student.program_name().to_string(),
            cumulative_gpa: cumulative_gpa(&periods),
            periods,
        }
    }
}

#[derive(Template)]
#[template(path = "history.md")]
struct HistoryTemplate<'a> {
    report: &'a HistoryReport,
}

impl ReportGenerator for HistoryReport {
    fn render(&self, format: ReportFormat) -> Result<String, Box<dyn Error>> {
        match format {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ReportFormat::Markdown => Ok(HistoryTemplate { report: self }.render()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::build_history;

    fn student() -> Student {
        Student {
            id: 5,
            name: "Ana Torres".to_string(),
            program: None,
        }
    }

    #[test]
    fn test_empty_history_renders() {
        let report = HistoryReport::new(&student(), build_history(&[], "N/A"));
        assert_eq!(report.program, "N/A");
        assert!(report.cumulative_gpa.abs() < f64::EPSILON);

        let md = report.render(ReportFormat::Markdown).unwrap();
        assert!(md.contains("Ana Torres"));
        assert!(md.contains("No enrollments on record"));

        let json: serde_json::Value =
            serde_json::from_str(&report.render(ReportFormat::Json).unwrap()).unwrap();
        assert_eq!(json["student_id"], 5);
        assert!(json["periods"].as_array().unwrap().is_empty());
    }
}
