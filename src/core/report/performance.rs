//! Detailed performance report

use super::{ReportFormat, ReportGenerator};
use crate::core::models::StudentId;
use crate::core::performance::SectionPerformanceRow;
use askama::Template;
use serde::Serialize;
use std::error::Error;

/// Per-section performance rows for one student, optionally one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Student the rows belong to, when a single student was selected
    pub student_id: Option<StudentId>,
    /// Period filter, if any
    pub period: Option<String>,
    /// Rows in enrollment order
    pub rows: Vec<SectionPerformanceRow>,
}

impl PerformanceReport {
    /// Wrap computed rows
    #[must_use]
    pub const fn new(
        student_id: Option<StudentId>,
        period: Option<String>,
        rows: Vec<SectionPerformanceRow>,
    ) -> Self {
        Self {
            student_id,
            period,
            rows,
        }
    }
}

#[derive(Template)]
#[template(path = "performance.md")]
struct PerformanceTemplate<'a> {
    student: String,
    period: &'a str,
    rows: &'a [SectionPerformanceRow],
}

impl ReportGenerator for PerformanceReport {
    fn render(&self, format: ReportFormat) -> Result<String, Box<dyn Error>> {
        match format {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ReportFormat::Markdown => {
                let template = PerformanceTemplate {
                    student: self
                        .student_id
                        .map_or_else(|| "all".to_string(), |id| id.to_string()),
                    period: self.period.as_deref().unwrap_or("all"),
                    rows: &self.rows,
                };
                Ok(template.render()?)
            }
        }
    }
}
