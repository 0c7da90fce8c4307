//! In-memory gradebook
//!
//! Owns the catalog, sections, students and enrollment rows, and is the only
//! place that mutates them. Every write names the cache keys it invalidates.
//! Reports go through the access policy first and only then reach the pure
//! history and performance builders.

use crate::core::access::{scope_for_role, AccessError, Caller, RecordScope, Report};
use crate::core::cache::{Cache, EntityKind, Invalidation, MemoryCache};
use crate::core::grading::{current_grade, validate_score, GradeWeights, PeriodScores};
use crate::core::history::{build_history, PeriodSummary};
use crate::core::models::{
    AcademicPeriod, Activity, Course, Enrollment, EnrollmentRecord, EnrollmentStatus, Section,
    SectionId, Student, StudentId,
};
use crate::core::performance::{
    build_detailed_performance, ActivityCounts, SectionPerformanceRow,
};
use crate::core::prerequisites::{approved_courses, GraphError, PrerequisiteEdge, PrerequisiteGraph};
use crate::{debug, info};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::time::Duration;
use thiserror::Error;

/// How long a cached history stays valid
pub const HISTORY_TTL: Duration = Duration::from_secs(300);

/// Failures of gradebook writes and reads
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradebookError {
    /// No section with this id
    #[error("Unknown section {0}")]
    UnknownSection(SectionId),

    /// No course with this code
    #[error("Unknown course '{0}'")]
    UnknownCourse(String),

    /// No student with this id
    #[error("Unknown student {0}")]
    UnknownStudent(StudentId),

    /// An open enrollment for the pair already exists
    #[error("Student {student} is already enrolled in section {section}")]
    AlreadyEnrolled {
        /// Student
        student: StudentId,
        /// Section
        section: SectionId,
    },

    /// No matching enrollment for the pair
    #[error("Student {student} is not enrolled in section {section}")]
    NotEnrolled {
        /// Student
        student: StudentId,
        /// Section
        section: SectionId,
    },

    /// The section has no free seats
    #[error("Section {0} is full")]
    SectionFull(SectionId),

    /// Today is outside the period's enrollment window
    #[error("Enrollment for period '{0}' is closed")]
    EnrollmentClosed(String),

    /// Mandatory prerequisites not approved yet
    #[error("Missing prerequisites for {course}: {}", .missing.join(", "))]
    PrerequisitesNotMet {
        /// Course being enrolled in
        course: String,
        /// Mandatory prerequisites the student lacks
        missing: Vec<String>,
    },

    /// Status change not allowed from the current status
    #[error("Cannot change enrollment from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: EnrollmentStatus,
        /// Requested status
        to: EnrollmentStatus,
    },

    /// Score outside the valid range
    #[error("{0}")]
    InvalidScore(String),

    /// Refused by the access policy
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Bad prerequisite edge
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// All academic records plus the cache of derived histories
#[derive(Debug)]
pub struct Gradebook {
    courses: BTreeMap<String, Course>,
    sections: BTreeMap<SectionId, Section>,
    periods: BTreeMap<String, AcademicPeriod>,
    students: HashMap<StudentId, Student>,
    enrollments: Vec<Enrollment>,
    prerequisites: PrerequisiteGraph,
    activities: Vec<Activity>,
    weights: GradeWeights,
    cache: MemoryCache<Vec<PeriodSummary>>,
}

impl Default for Gradebook {
    fn default() -> Self {
        Self::new(GradeWeights::default())
    }
}

fn history_key(student: StudentId) -> String {
    format!("history:{student}")
}

impl Gradebook {
    /// Create an empty gradebook using `weights` for running grades
    #[must_use]
    pub fn new(weights: GradeWeights) -> Self {
        Self {
            courses: BTreeMap::new(),
            sections: BTreeMap::new(),
            periods: BTreeMap::new(),
            students: HashMap::new(),
            enrollments: Vec::new(),
            prerequisites: PrerequisiteGraph::new(),
            activities: Vec::new(),
            weights,
            cache: MemoryCache::new(),
        }
    }

    fn invalidate(&mut self, kind: EntityKind, student: Option<StudentId>) {
        match (kind.invalidation(), student) {
            (Invalidation::All, _) => {
                if !self.cache.is_empty() {
                    debug!("{:?} changed, dropping {} cached histories", kind, self.cache.len());
                }
                self.cache.clear();
            }
            (Invalidation::Student, Some(student)) => {
                if self.cache.invalidate(&history_key(student)) {
                    debug!("Invalidated cached history of student {}", student);
                }
            }
            (Invalidation::Student, None) => {}
        }
    }

    // ---- catalog ----

    /// Add or replace a course
    pub fn add_course(&mut self, course: Course) {
        self.prerequisites.add_course(&course.code);
        self.courses.insert(course.code.clone(), course);
        self.invalidate(EntityKind::Course, None);
    }

    /// Add or replace a section. Replacing one drops every cached history,
    /// since its period or course may have changed.
    ///
    /// # Errors
    /// [`GradebookError::UnknownCourse`] if the section's course is not in the catalog.
    pub fn add_section(&mut self, section: Section) -> Result<(), GradebookError> {
        if !self.courses.contains_key(&section.course_code) {
            return Err(GradebookError::UnknownCourse(section.course_code));
        }
        if self.sections.insert(section.id, section).is_some() {
            self.invalidate(EntityKind::Section, None);
        }
        Ok(())
    }

    /// Add or replace an academic period
    pub fn add_period(&mut self, period: AcademicPeriod) {
        self.periods.insert(period.code.clone(), period);
    }

    /// Add or replace a student
    pub fn add_student(&mut self, student: Student) {
        let id = student.id;
        self.students.insert(id, student);
        self.invalidate(EntityKind::Student, Some(id));
    }

    /// Add an activity to a section
    ///
    /// # Errors
    /// [`GradebookError::UnknownSection`] if the section does not exist.
    pub fn add_activity(&mut self, activity: Activity) -> Result<(), GradebookError> {
        if !self.sections.contains_key(&activity.section_id) {
            return Err(GradebookError::UnknownSection(activity.section_id));
        }
        self.activities.push(activity);
        Ok(())
    }

    /// Add a prerequisite edge between two catalog courses
    ///
    /// # Errors
    /// [`GradebookError::UnknownCourse`] for an unknown endpoint and
    /// [`GradebookError::Graph`] for a course requiring itself.
    pub fn add_prerequisite(&mut self, edge: PrerequisiteEdge) -> Result<(), GradebookError> {
        for code in [&edge.course, &edge.prerequisite] {
            if !self.courses.contains_key(code) {
                return Err(GradebookError::UnknownCourse(code.clone()));
            }
        }
        self.prerequisites.add_prerequisite(edge)?;
        Ok(())
    }

    /// Store an enrollment row as-is, skipping the enrollment rules.
    ///
    /// Used when loading existing records. The section must exist and the
    /// pair must not already have a row.
    ///
    /// # Errors
    /// [`GradebookError::UnknownSection`] or [`GradebookError::AlreadyEnrolled`].
    pub fn insert_enrollment(&mut self, enrollment: Enrollment) -> Result<(), GradebookError> {
        if !self.sections.contains_key(&enrollment.section_id) {
            return Err(GradebookError::UnknownSection(enrollment.section_id));
        }
        if self
            .enrollments
            .iter()
            .any(|e| e.student_id == enrollment.student_id && e.section_id == enrollment.section_id)
        {
            return Err(GradebookError::AlreadyEnrolled {
                student: enrollment.student_id,
                section: enrollment.section_id,
            });
        }
        let student = enrollment.student_id;
        self.enrollments.push(enrollment);
        self.invalidate(EntityKind::Enrollment, Some(student));
        Ok(())
    }

    // ---- lookups ----

    /// Course by code
    #[must_use]
    pub fn course(&self, code: &str) -> Option<&Course> {
        self.courses.get(code)
    }

    /// Section by id
    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    /// Student by id
    #[must_use]
    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.get(&id)
    }

    /// Period catalog entry by code
    #[must_use]
    pub fn period(&self, code: &str) -> Option<&AcademicPeriod> {
        self.periods.get(code)
    }

    /// Enrollment row for a student and section
    #[must_use]
    pub fn enrollment(&self, student: StudentId, section: SectionId) -> Option<&Enrollment> {
        self.enrollments
            .iter()
            .find(|e| e.student_id == student && e.section_id == section)
    }

    /// The prerequisite graph
    #[must_use]
    pub const fn prerequisites(&self) -> &PrerequisiteGraph {
        &self.prerequisites
    }

    /// Number of enrollment rows
    #[must_use]
    pub fn enrollment_count(&self) -> usize {
        self.enrollments.len()
    }

    // ---- enrollment lifecycle ----

    /// Request a seat in a section. Creates a `pending` row.
    ///
    /// # Arguments
    /// * `student` - Student requesting the seat
    /// * `section` - Section requested
    /// * `today` - Date checked against the period's enrollment window
    ///
    /// # Errors
    /// - [`GradebookError::UnknownStudent`] / [`GradebookError::UnknownSection`]
    /// - [`GradebookError::AlreadyEnrolled`] if an open row exists
    /// - [`GradebookError::SectionFull`] when enrolled rows reach the seat limit
    /// - [`GradebookError::EnrollmentClosed`] when the period is known and its
    ///   window does not include `today`
    /// - [`GradebookError::PrerequisitesNotMet`] listing missing mandatory courses
    pub fn enroll(
        &mut self,
        student: StudentId,
        section: SectionId,
        today: NaiveDate,
    ) -> Result<(), GradebookError> {
        if !self.students.contains_key(&student) {
            return Err(GradebookError::UnknownStudent(student));
        }
        let target = self
            .sections
            .get(&section)
            .ok_or(GradebookError::UnknownSection(section))?;

        if self
            .enrollments
            .iter()
            .any(|e| {
                e.student_id == student && e.section_id == section && !e.status.is_closed()
            })
        {
            return Err(GradebookError::AlreadyEnrolled { student, section });
        }

        let seated = self
            .enrollments
            .iter()
            .filter(|e| e.section_id == section && e.status == EnrollmentStatus::Enrolled)
            .count();
        if seated >= target.max_students as usize {
            return Err(GradebookError::SectionFull(section));
        }

        if let Some(period) = self.periods.get(&target.academic_period) {
            if !period.is_enrollment_open(today) {
                return Err(GradebookError::EnrollmentClosed(period.code.clone()));
            }
        }

        let missing = self.missing_prerequisites(student, &target.course_code);
        if !missing.is_empty() {
            return Err(GradebookError::PrerequisitesNotMet {
                course: target.course_code.clone(),
                missing,
            });
        }

        // Closed rows for the pair are replaced by the new request.
        self.enrollments
            .retain(|e| !(e.student_id == student && e.section_id == section));
        self.enrollments
            .push(Enrollment::new(student, section, EnrollmentStatus::Pending));
        self.invalidate(EntityKind::Enrollment, Some(student));
        info!("Student {} requested section {}", student, section);
        Ok(())
    }

    fn open_enrollment_mut(
        &mut self,
        student: StudentId,
        section: SectionId,
    ) -> Result<&mut Enrollment, GradebookError> {
        self.enrollments
            .iter_mut()
            .find(|e| {
                e.student_id == student && e.section_id == section && !e.status.is_closed()
            })
            .ok_or(GradebookError::NotEnrolled { student, section })
    }

    fn transition(
        &mut self,
        student: StudentId,
        section: SectionId,
        to: EnrollmentStatus,
    ) -> Result<(), GradebookError> {
        let enrollment = self.open_enrollment_mut(student, section)?;
        let from = enrollment.status;
        if !from.can_transition_to(to) {
            return Err(GradebookError::InvalidTransition { from, to });
        }
        if to == EnrollmentStatus::Enrolled {
            let section_ref = self
                .sections
                .get(&section)
                .ok_or(GradebookError::UnknownSection(section))?;
            let limit = section_ref.max_students as usize;
            let seated = self
                .enrollments
                .iter()
                .filter(|e| e.section_id == section && e.status == EnrollmentStatus::Enrolled)
                .count();
            if seated >= limit {
                return Err(GradebookError::SectionFull(section));
            }
        }

        self.open_enrollment_mut(student, section)?.status = to;
        self.invalidate(EntityKind::Enrollment, Some(student));
        info!("Enrollment {}/{}: {} -> {}", student, section, from, to);
        Ok(())
    }

    /// Approve a pending request
    ///
    /// # Errors
    /// [`GradebookError::NotEnrolled`], [`GradebookError::InvalidTransition`]
    /// or [`GradebookError::SectionFull`].
    pub fn approve(
        &mut self,
        student: StudentId,
        section: SectionId,
    ) -> Result<(), GradebookError> {
        self.transition(student, section, EnrollmentStatus::Enrolled)
    }

    /// Reject a pending request
    ///
    /// # Errors
    /// [`GradebookError::NotEnrolled`] or [`GradebookError::InvalidTransition`].
    pub fn reject(
        &mut self,
        student: StudentId,
        section: SectionId,
    ) -> Result<(), GradebookError> {
        self.transition(student, section, EnrollmentStatus::Rejected)
    }

    /// Drop an enrolled student
    ///
    /// # Errors
    /// [`GradebookError::NotEnrolled`] or [`GradebookError::InvalidTransition`].
    pub fn drop_enrollment(
        &mut self,
        student: StudentId,
        section: SectionId,
    ) -> Result<(), GradebookError> {
        self.transition(student, section, EnrollmentStatus::Dropped)
    }

    /// Close an enrolled row as completed
    ///
    /// # Errors
    /// [`GradebookError::NotEnrolled`] or [`GradebookError::InvalidTransition`].
    pub fn complete(
        &mut self,
        student: StudentId,
        section: SectionId,
    ) -> Result<(), GradebookError> {
        self.transition(student, section, EnrollmentStatus::Completed)
    }

    // ---- grade entry ----

    fn graded_enrollment_mut(
        &mut self,
        student: StudentId,
        section: SectionId,
    ) -> Result<&mut Enrollment, GradebookError> {
        self.enrollments
            .iter_mut()
            .find(|e| {
                e.student_id == student
                    && e.section_id == section
                    && matches!(e.status, EnrollmentStatus::Enrolled | EnrollmentStatus::Completed)
            })
            .ok_or(GradebookError::NotEnrolled { student, section })
    }

    /// Record period scores. Only the components present in `scores` are
    /// written; the running grade is recomputed in the same step.
    ///
    /// # Errors
    /// [`GradebookError::InvalidScore`] for a value outside `0..=100`, and
    /// [`GradebookError::NotEnrolled`] when the pair is not enrolled or completed.
    pub fn record_scores(
        &mut self,
        student: StudentId,
        section: SectionId,
        scores: PeriodScores,
    ) -> Result<(), GradebookError> {
        for score in [scores.p1, scores.p2, scores.p3, scores.exam].into_iter().flatten() {
            validate_score(score).map_err(GradebookError::InvalidScore)?;
        }

        let weights = self.weights;
        let enrollment = self.graded_enrollment_mut(student, section)?;
        let merged = PeriodScores {
            p1: scores.p1.or(enrollment.scores.p1),
            p2: scores.p2.or(enrollment.scores.p2),
            p3: scores.p3.or(enrollment.scores.p3),
            exam: scores.exam.or(enrollment.scores.exam),
        };
        enrollment.scores = merged;
        enrollment.current_grade = current_grade(&merged, &weights);
        debug!(
            "Scores for {}/{} now {:?}, running grade {:?}",
            student, section, merged, enrollment.current_grade
        );

        self.invalidate(EntityKind::Grade, Some(student));
        Ok(())
    }

    /// Set (or clear) the final grade; the letter is re-derived in the same
    /// mutation.
    ///
    /// # Errors
    /// [`GradebookError::InvalidScore`] or [`GradebookError::NotEnrolled`].
    pub fn record_final_grade(
        &mut self,
        student: StudentId,
        section: SectionId,
        final_grade: Option<f64>,
    ) -> Result<(), GradebookError> {
        if let Some(score) = final_grade {
            validate_score(score).map_err(GradebookError::InvalidScore)?;
        }

        let enrollment = self.graded_enrollment_mut(student, section)?;
        enrollment.set_final_grade(final_grade);
        info!(
            "Final grade for {}/{}: {:?} ({:?})",
            student,
            section,
            enrollment.final_grade(),
            enrollment.letter_grade()
        );

        self.invalidate(EntityKind::Grade, Some(student));
        Ok(())
    }

    // ---- reads ----

    /// Join enrollments with their section and course, keeping rows the
    /// scope allows. Rows follow insertion order.
    #[must_use]
    pub fn records(&self, scope: &RecordScope) -> Vec<EnrollmentRecord> {
        self.enrollments
            .iter()
            .filter_map(|enrollment| {
                let section = self.sections.get(&enrollment.section_id)?;
                let course = self.courses.get(&section.course_code)?;
                Some(EnrollmentRecord::join(enrollment, section, course))
            })
            .filter(|record| scope.allows(record))
            .collect()
    }

    /// Courses the student has approved (completed with A, B or C)
    #[must_use]
    pub fn approved_courses(&self, student: StudentId) -> HashSet<String> {
        let records = self.records(&RecordScope::student(student));
        approved_courses(&records)
    }

    /// Mandatory prerequisites of `course` the student has not approved
    #[must_use]
    pub fn missing_prerequisites(&self, student: StudentId, course: &str) -> Vec<String> {
        let approved = self.approved_courses(student);
        self.prerequisites.missing_prerequisites(course, &approved)
    }

    /// Whether the student may take `course`
    ///
    /// # Errors
    /// [`GradebookError::UnknownCourse`] / [`GradebookError::UnknownStudent`].
    pub fn check_prerequisites(
        &self,
        student: StudentId,
        course: &str,
    ) -> Result<bool, GradebookError> {
        if !self.courses.contains_key(course) {
            return Err(GradebookError::UnknownCourse(course.to_string()));
        }
        if !self.students.contains_key(&student) {
            return Err(GradebookError::UnknownStudent(student));
        }
        let approved = self.approved_courses(student);
        Ok(self.prerequisites.meets_prerequisites(course, &approved))
    }

    /// Activity counts for every section
    #[must_use]
    pub fn activity_counts(&self) -> ActivityCounts {
        ActivityCounts::from_activities(&self.activities)
    }

    /// Period codes the caller can filter by, ascending and deduplicated.
    ///
    /// Without a student, admins get the periods of every section and
    /// professors those of the sections they teach, enrolled or not. With a
    /// student (always the case for students) the periods come from that
    /// student's enrollments.
    ///
    /// # Errors
    /// [`GradebookError::Access`] when the policy refuses the caller.
    pub fn available_periods(
        &self,
        caller: &Caller,
        student: Option<StudentId>,
    ) -> Result<Vec<String>, GradebookError> {
        let scope = scope_for_role(caller, Report::AvailablePeriods, student)?;
        let periods: BTreeSet<String> = if scope.student_id.is_some() {
            self.records(&scope)
                .into_iter()
                .map(|r| r.academic_period)
                .collect()
        } else {
            self.sections
                .values()
                .filter(|s| scope.professor_id.is_none_or(|id| s.professor_id == id))
                .map(|s| s.academic_period.clone())
                .collect()
        };
        Ok(periods.into_iter().filter(|p| !p.is_empty()).collect())
    }

    /// Per-period history of a student, memoized until a write touches it
    ///
    /// # Errors
    /// [`GradebookError::Access`] when the policy refuses the caller.
    pub fn academic_history(
        &mut self,
        caller: &Caller,
        student: Option<StudentId>,
    ) -> Result<Vec<PeriodSummary>, GradebookError> {
        let scope = scope_for_role(caller, Report::AcademicHistory, student)?;
        let target = scope.student_id.ok_or(AccessError::NoStudentSelected)?;

        let key = history_key(target);
        if let Some(history) = self.cache.get(&key) {
            debug!("History of student {} served from cache", target);
            return Ok(history);
        }

        let records = self.records(&scope);
        let program = self
            .students
            .get(&target)
            .map_or(Student::NO_PROGRAM, Student::program_name);
        let history = build_history(&records, program);
        self.cache.put(&key, history.clone(), HISTORY_TTL);
        Ok(history)
    }

    /// Per-section performance rows visible to the caller
    ///
    /// # Errors
    /// [`GradebookError::Access`] when the policy refuses the caller.
    pub fn detailed_performance(
        &self,
        caller: &Caller,
        student: Option<StudentId>,
        period: Option<&str>,
    ) -> Result<Vec<SectionPerformanceRow>, GradebookError> {
        let scope = scope_for_role(caller, Report::DetailedPerformance, student)?;
        let records = self.records(&scope);
        Ok(build_detailed_performance(&records, &self.activity_counts(), period))
    }
}
