//! Authorization policy for the academic reports
//!
//! Each report asks [`scope_for_role`] for a [`RecordScope`] before touching
//! any data, then filters records through [`RecordScope::allows`]. The grading
//! core never sees records outside the caller's scope.

use crate::core::models::{EnrollmentRecord, ProfessorId, StudentId};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Full access
    Admin,
    /// Access limited to sections the professor teaches
    Professor,
    /// Access limited to the student's own records
    Student,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "professor" => Ok(Self::Professor),
            "student" => Ok(Self::Student),
            _ => Err(format!("Unknown role: '{s}'")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Professor => write!(f, "professor"),
            Self::Student => write!(f, "student"),
        }
    }
}

/// Who is asking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// Caller's role
    pub role: Role,
    /// Caller's account id
    pub id: u64,
}

impl Caller {
    /// Create a caller
    #[must_use]
    pub const fn new(role: Role, id: u64) -> Self {
        Self { role, id }
    }
}

/// Reports guarded by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    /// Per-section scores (students, professors, admins)
    DetailedPerformance,
    /// Full grouped history with GPA (students and admins only)
    AcademicHistory,
    /// Period codes a caller can filter by
    AvailablePeriods,
}

/// Access refusals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The role may not see this report at all
    #[error("Role '{role}' may not view this report")]
    Forbidden {
        /// Role that was refused
        role: Role,
    },

    /// A non-student caller did not say which student to report on
    #[error("No student selected")]
    NoStudentSelected,
}

/// Filter predicate produced by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordScope {
    /// Only this student's records, when set
    pub student_id: Option<StudentId>,
    /// Only sections taught by this professor, when set
    pub professor_id: Option<ProfessorId>,
}

impl RecordScope {
    /// Scope that lets every record through
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self {
            student_id: None,
            professor_id: None,
        }
    }

    /// Scope limited to one student
    #[must_use]
    pub const fn student(student_id: StudentId) -> Self {
        Self {
            student_id: Some(student_id),
            professor_id: None,
        }
    }

    /// Whether a record falls inside this scope
    #[must_use]
    pub fn allows(&self, record: &EnrollmentRecord) -> bool {
        self.student_id.is_none_or(|id| record.student_id == id)
            && self.professor_id.is_none_or(|id| record.professor_id == id)
    }
}

/// Resolve the scope a caller gets for a report.
///
/// - Students always get their own records; `requested_student` is ignored.
/// - Admins get the requested student.
/// - Professors get the requested student restricted to their own sections,
///   and may not see academic history.
///
/// Listing available periods does not need a student: admins see all
/// periods and professors the periods of their sections.
///
/// # Errors
/// [`AccessError::Forbidden`] for a professor asking for history and
/// [`AccessError::NoStudentSelected`] when a student-level report has no
/// target.
pub fn scope_for_role(
    caller: &Caller,
    report: Report,
    requested_student: Option<StudentId>,
) -> Result<RecordScope, AccessError> {
    match (caller.role, report) {
        (Role::Student, _) => Ok(RecordScope::student(caller.id)),
        (Role::Professor, Report::AcademicHistory) => Err(AccessError::Forbidden {
            role: caller.role,
        }),
        (Role::Admin, Report::AvailablePeriods) => Ok(RecordScope {
            student_id: requested_student,
            professor_id: None,
        }),
        (Role::Professor, Report::AvailablePeriods) => Ok(RecordScope {
            student_id: requested_student,
            professor_id: Some(caller.id),
        }),
        (Role::Admin, _) => requested_student
            .map(RecordScope::student)
            .ok_or(AccessError::NoStudentSelected),
        (Role::Professor, Report::DetailedPerformance) => requested_student
            .map(|student| RecordScope {
                student_id: Some(student),
                professor_id: Some(caller.id),
            })
            .ok_or(AccessError::NoStudentSelected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grading::PeriodScores;
    use crate::core::models::EnrollmentStatus;

    fn record(student_id: StudentId, professor_id: ProfessorId) -> EnrollmentRecord {
        EnrollmentRecord {
            student_id,
            section_id: 1,
            professor_id,
            academic_period: "2025-C1".to_string(),
            course_code: "CS101".to_string(),
            course_name: "Programming I".to_string(),
            credits: 4,
            status: EnrollmentStatus::Enrolled,
            scores: PeriodScores::default(),
            current_grade: None,
            final_grade: None,
            letter_grade: None,
        }
    }

    #[test]
    fn test_student_sees_only_self() {
        let caller = Caller::new(Role::Student, 5);
        let scope = scope_for_role(&caller, Report::AcademicHistory, Some(6)).unwrap();

        assert_eq!(scope, RecordScope::student(5));
        assert!(scope.allows(&record(5, 9)));
        assert!(!scope.allows(&record(6, 9)));
    }

    #[test]
    fn test_admin_needs_student() {
        let caller = Caller::new(Role::Admin, 1);
        assert_eq!(
            scope_for_role(&caller, Report::AcademicHistory, None),
            Err(AccessError::NoStudentSelected)
        );
        let scope = scope_for_role(&caller, Report::DetailedPerformance, Some(6)).unwrap();
        assert!(scope.allows(&record(6, 9)));
        assert!(scope.allows(&record(6, 10)));
    }

    #[test]
    fn test_professor_limited_to_own_sections() {
        let caller = Caller::new(Role::Professor, 9);
        let scope = scope_for_role(&caller, Report::DetailedPerformance, Some(6)).unwrap();

        assert!(scope.allows(&record(6, 9)));
        assert!(!scope.allows(&record(6, 10)));
        assert!(!scope.allows(&record(7, 9)));
    }

    #[test]
    fn test_professor_forbidden_from_history() {
        let caller = Caller::new(Role::Professor, 9);
        let err = scope_for_role(&caller, Report::AcademicHistory, Some(6)).unwrap_err();
        assert_eq!(err, AccessError::Forbidden { role: Role::Professor });
        assert_eq!(err.to_string(), "Role 'professor' may not view this report");
    }

    #[test]
    fn test_available_periods_scopes() {
        let admin =
            scope_for_role(&Caller::new(Role::Admin, 1), Report::AvailablePeriods, None).unwrap();
        assert_eq!(admin, RecordScope::unrestricted());

        let professor = scope_for_role(
            &Caller::new(Role::Professor, 9),
            Report::AvailablePeriods,
            None,
        )
        .unwrap();
        assert!(professor.allows(&record(3, 9)));
        assert!(!professor.allows(&record(3, 8)));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Admin".parse(), Ok(Role::Admin));
        assert!("dean".parse::<Role>().is_err());
    }
}
