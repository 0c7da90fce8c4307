//! Data models for `academic-records`

pub mod activity;
pub mod course;
pub mod enrollment;
pub mod period;
pub mod section;
pub mod student;

pub use activity::{Activity, ActivityKind};
pub use course::Course;
pub use enrollment::{Enrollment, EnrollmentRecord, EnrollmentStatus};
pub use period::{AcademicPeriod, PeriodKind};
pub use section::Section;
pub use student::Student;

/// Identifier of a student account
pub type StudentId = u64;

/// Identifier of a professor account
pub type ProfessorId = u64;

/// Identifier of a course section
pub type SectionId = u64;
