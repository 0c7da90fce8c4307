//! Section model

use super::{ProfessorId, SectionId};
use serde::{Deserialize, Serialize};

/// Default seat limit of a section
pub const DEFAULT_MAX_STUDENTS: u32 = 30;

/// A scheduled offering of a course in one academic period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section identifier
    pub id: SectionId,

    /// Code of the course being taught
    pub course_code: String,

    /// Professor in charge of the section
    pub professor_id: ProfessorId,

    /// Academic period code (e.g., "2025-C1")
    pub academic_period: String,

    /// Seat limit for enrolled students
    #[serde(default = "default_max_students")]
    pub max_students: u32,
}

const fn default_max_students() -> u32 {
    DEFAULT_MAX_STUDENTS
}

impl Section {
    /// Create a section with the default seat limit
    #[must_use]
    pub const fn new(
        id: SectionId,
        course_code: String,
        professor_id: ProfessorId,
        academic_period: String,
    ) -> Self {
        Self {
            id,
            course_code,
            professor_id,
            academic_period,
            max_students: DEFAULT_MAX_STUDENTS,
        }
    }
}
