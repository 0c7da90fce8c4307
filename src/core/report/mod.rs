//! Report generation for academic records
//!
//! Reports wrap the derived rows produced by the gradebook and render them as
//! JSON (for other tools) or Markdown (for people). Markdown output goes
//! through the askama templates under `templates/`.

pub mod history;
pub mod performance;

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use history::HistoryReport;
pub use performance::PerformanceReport;

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Markdown tables
    Markdown,
}

impl ReportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if serialization or template rendering fails
    fn render(&self, format: ReportFormat) -> Result<String, Box<dyn Error>>;

    /// Generate a report to a file, creating parent directories as needed
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, format: ReportFormat, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(format)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse(), Ok(ReportFormat::Json));
        assert_eq!("md".parse(), Ok(ReportFormat::Markdown));
        assert_eq!("markdown".parse(), Ok(ReportFormat::Markdown));
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_format_extension_and_display() {
        assert_eq!(ReportFormat::Json.extension(), "json");
        assert_eq!(ReportFormat::Markdown.extension(), "md");
        assert_eq!(ReportFormat::Markdown.to_string(), "markdown");
    }
}
