//! Student model

use super::StudentId;
use serde::{Deserialize, Serialize};

/// A student and the academic program they follow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Student identifier
    pub id: StudentId,

    /// Full name
    pub name: String,

    /// Academic program (career) name, if assigned
    #[serde(default)]
    pub program: Option<String>,
}

impl Student {
    /// Program name shown on reports when none is assigned
    pub const NO_PROGRAM: &'static str = "N/A";

    /// Program name for display, falling back to `N/A`
    #[must_use]
    pub fn program_name(&self) -> &str {
        self.program.as_deref().unwrap_or(Self::NO_PROGRAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_fallback() {
        let mut student = Student {
            id: 7,
            name: "Ana Torres".to_string(),
            program: None,
        };
        assert_eq!(student.program_name(), "N/A");

        student.program = Some("Software Engineering".to_string());
        assert_eq!(student.program_name(), "Software Engineering");
    }
}
