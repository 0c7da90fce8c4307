//! Enrollment model
//!
//! An [`Enrollment`] is one student's seat in one section. Its letter grade is
//! derived from the final grade and can only change through
//! [`Enrollment::set_final_grade`], so the two never drift apart.

use super::{Course, ProfessorId, Section, SectionId, StudentId};
use crate::core::grading::{letter_from_numeric, LetterGrade, PeriodScores};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    /// Requested, awaiting approval
    Pending,
    /// Approved and attending
    Enrolled,
    /// Left the section
    Dropped,
    /// Finished the section
    Completed,
    /// Request denied
    Rejected,
}

impl EnrollmentStatus {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// `pending → enrolled | rejected`, `enrolled → dropped | completed`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Enrolled | Self::Rejected)
                | (Self::Enrolled, Self::Dropped | Self::Completed)
        )
    }

    /// Whether the enrollment is closed for further changes
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Dropped | Self::Completed | Self::Rejected)
    }

    /// Lowercase name as stored
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Enrolled => "enrolled",
            Self::Dropped => "dropped",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "enrolled" => Ok(Self::Enrolled),
            "dropped" => Ok(Self::Dropped),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Unknown enrollment status: '{s}'")),
        }
    }
}

/// A student's enrollment in a section, with its grades
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    /// Enrolled student
    pub student_id: StudentId,
    /// Section enrolled in
    pub section_id: SectionId,
    /// Lifecycle state
    pub status: EnrollmentStatus,
    /// Partial period and exam scores
    pub scores: PeriodScores,
    /// Running grade accumulated from the graded components
    pub current_grade: Option<f64>,
    final_grade: Option<f64>,
    letter_grade: Option<LetterGrade>,
}

impl Enrollment {
    /// Create a new enrollment with no grades
    #[must_use]
    pub fn new(student_id: StudentId, section_id: SectionId, status: EnrollmentStatus) -> Self {
        Self {
            student_id,
            section_id,
            status,
            scores: PeriodScores::default(),
            current_grade: None,
            final_grade: None,
            letter_grade: None,
        }
    }

    /// Final grade, if finalized
    #[must_use]
    pub const fn final_grade(&self) -> Option<f64> {
        self.final_grade
    }

    /// Letter grade derived from the final grade
    #[must_use]
    pub const fn letter_grade(&self) -> Option<LetterGrade> {
        self.letter_grade
    }

    /// Set the final grade and re-derive the letter in the same step.
    pub fn set_final_grade(&mut self, final_grade: Option<f64>) {
        self.final_grade = final_grade;
        self.letter_grade = letter_from_numeric(final_grade);
    }
}

/// Read-only join of an enrollment with its section and course.
///
/// This is the row shape the history aggregator and the performance report
/// consume.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRecord {
    /// Enrolled student
    pub student_id: StudentId,
    /// Section enrolled in
    pub section_id: SectionId,
    /// Professor teaching the section
    pub professor_id: ProfessorId,
    /// Academic period code of the section
    pub academic_period: String,
    /// Course code
    pub course_code: String,
    /// Course name
    pub course_name: String,
    /// Course credits
    pub credits: u32,
    /// Lifecycle state
    pub status: EnrollmentStatus,
    /// Partial period and exam scores
    pub scores: PeriodScores,
    /// Running grade
    pub current_grade: Option<f64>,
    /// Final grade
    pub final_grade: Option<f64>,
    /// Letter grade
    pub letter_grade: Option<LetterGrade>,
}

impl EnrollmentRecord {
    /// Join an enrollment with the section and course it refers to
    #[must_use]
    pub fn join(enrollment: &Enrollment, section: &Section, course: &Course) -> Self {
        Self {
            student_id: enrollment.student_id,
            section_id: enrollment.section_id,
            professor_id: section.professor_id,
            academic_period: section.academic_period.clone(),
            course_code: course.code.clone(),
            course_name: course.name.clone(),
            credits: course.credits,
            status: enrollment.status,
            scores: enrollment.scores,
            current_grade: enrollment.current_grade,
            final_grade: enrollment.final_grade(),
            letter_grade: enrollment.letter_grade(),
        }
    }

    /// Whether this record approves its course for prerequisite purposes:
    /// completed with an A, B or C.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == EnrollmentStatus::Completed
            && self.letter_grade.is_some_and(LetterGrade::is_approving)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_follows_final_grade() {
        let mut enrollment = Enrollment::new(1, 10, EnrollmentStatus::Enrolled);
        assert_eq!(enrollment.letter_grade(), None);

        enrollment.set_final_grade(Some(91.0));
        assert_eq!(enrollment.letter_grade(), Some(LetterGrade::A));

        enrollment.set_final_grade(Some(90.0));
        assert_eq!(enrollment.letter_grade(), Some(LetterGrade::B));

        enrollment.set_final_grade(None);
        assert_eq!(enrollment.letter_grade(), None);
        assert_eq!(enrollment.final_grade(), None);
    }

    #[test]
    fn test_status_transitions() {
        use EnrollmentStatus::{Completed, Dropped, Enrolled, Pending, Rejected};

        assert!(Pending.can_transition_to(Enrolled));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Enrolled.can_transition_to(Completed));
        assert!(Enrolled.can_transition_to(Dropped));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Enrolled));
        assert!(!Rejected.can_transition_to(Enrolled));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Completed".parse(), Ok(EnrollmentStatus::Completed));
        assert_eq!(EnrollmentStatus::Dropped.to_string(), "dropped");
        assert!("graduated".parse::<EnrollmentStatus>().is_err());
    }

    #[test]
    fn test_record_approval() {
        let section = Section::new(10, "MATH101".to_string(), 3, "2025-C1".to_string());
        let course = Course::new("MATH101".to_string(), "Calculus I".to_string(), 4);
        let mut enrollment = Enrollment::new(1, 10, EnrollmentStatus::Completed);

        enrollment.set_final_grade(Some(75.0));
        assert!(EnrollmentRecord::join(&enrollment, &section, &course).is_approved());

        enrollment.set_final_grade(Some(60.0));
        assert!(!EnrollmentRecord::join(&enrollment, &section, &course).is_approved());

        enrollment.set_final_grade(Some(95.0));
        enrollment.status = EnrollmentStatus::Enrolled;
        assert!(!EnrollmentRecord::join(&enrollment, &section, &course).is_approved());
    }
}
