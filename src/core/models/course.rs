//! Course model

use serde::{Deserialize, Serialize};

/// A catalog course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Catalog code, unique across the catalog (e.g., "MATH101")
    pub code: String,

    /// Course name (e.g., "Calculus I")
    pub name: String,

    /// Credit count, at least 1. Used as the weight of the course in GPA.
    pub credits: u32,

    /// Recommended semester within the program, if any
    #[serde(default)]
    pub semester: Option<u32>,

    /// Whether the course is offered
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl Course {
    /// Create a new active course.
    ///
    /// # Arguments
    /// * `code` - Catalog code
    /// * `name` - Full course name
    /// * `credits` - Credit count
    #[must_use]
    pub fn new(code: String, name: String, credits: u32) -> Self {
        Self {
            code,
            name,
            credits,
            semester: None,
            active: true,
        }
    }

    /// Set the recommended semester
    #[must_use]
    pub const fn with_semester(mut self, semester: u32) -> Self {
        self.semester = Some(semester);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_creation() {
        let course = Course::new("MATH101".to_string(), "Calculus I".to_string(), 4);

        assert_eq!(course.code, "MATH101");
        assert_eq!(course.name, "Calculus I");
        assert_eq!(course.credits, 4);
        assert!(course.semester.is_none());
        assert!(course.active);
    }

    #[test]
    fn test_with_semester() {
        let course =
            Course::new("PHYS101".to_string(), "Physics I".to_string(), 3).with_semester(2);
        assert_eq!(course.semester, Some(2));
    }
}
