//! CSV records loader
//!
//! A data directory holds one CSV file per table:
//!
//! | file                | required | columns |
//! |---------------------|----------|---------|
//! | `courses.csv`       | yes | `code,name,credits[,semester][,active]` |
//! | `sections.csv`      | yes | `id,course_code,professor_id,academic_period[,max_students]` |
//! | `students.csv`      | yes | `id,name[,program]` |
//! | `enrollments.csv`   | yes | `student_id,section_id,status,grade_p1,grade_p2,grade_p3,grade_exam,current_grade,final_grade,letter_grade` |
//! | `prerequisites.csv` | no  | `course,prerequisite[,is_mandatory]` |
//! | `activities.csv`    | no  | `id,section_id,title,kind,period` |
//! | `periods.csv`       | no  | `code,name,kind,year,number,start_date,end_date[,enrollment_start_date][,enrollment_end_date]` |
//!
//! Empty cells are read as missing values. Stored letter grades are never
//! trusted: the letter is derived again from `final_grade` and a mismatch is
//! reported with `warn!`.

use crate::core::gradebook::{Gradebook, GradebookError};
use crate::core::grading::{
    current_grade, letter_from_numeric, validate_score, GradeWeights, LetterGrade, PeriodScores,
};
use crate::core::models::{
    AcademicPeriod, Activity, Course, Enrollment, EnrollmentStatus, Section, SectionId, Student,
    StudentId,
};
use crate::core::prerequisites::PrerequisiteEdge;
use crate::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Catalog of courses
pub const COURSES_FILE: &str = "courses.csv";
/// Course sections
pub const SECTIONS_FILE: &str = "sections.csv";
/// Student accounts
pub const STUDENTS_FILE: &str = "students.csv";
/// Enrollment rows with grades
pub const ENROLLMENTS_FILE: &str = "enrollments.csv";
/// Prerequisite edges
pub const PREREQUISITES_FILE: &str = "prerequisites.csv";
/// Section activities
pub const ACTIVITIES_FILE: &str = "activities.csv";
/// Academic period calendar
pub const PERIODS_FILE: &str = "periods.csv";

/// Errors raised while loading a data directory
#[derive(Debug, Error)]
pub enum RecordsError {
    /// A required file is absent
    #[error("Required file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The file could not be opened or is not valid CSV for its table
    #[error("Failed to read {path}: {source}")]
    Csv {
        /// File being read
        path: String,
        /// Underlying parser error
        #[source]
        source: csv::Error,
    },

    /// A row parsed but its content is rejected
    #[error("{file} line {line}: {message}")]
    InvalidRecord {
        /// File name
        file: &'static str,
        /// 1-based line number
        line: u64,
        /// What is wrong with the row
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct CourseRow {
    code: String,
    name: String,
    credits: u32,
    #[serde(default)]
    semester: Option<u32>,
    #[serde(default)]
    active: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SectionRow {
    id: SectionId,
    course_code: String,
    professor_id: u64,
    academic_period: String,
    #[serde(default)]
    max_students: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EnrollmentRow {
    student_id: StudentId,
    section_id: SectionId,
    status: String,
    #[serde(default)]
    grade_p1: Option<f64>,
    #[serde(default)]
    grade_p2: Option<f64>,
    #[serde(default)]
    grade_p3: Option<f64>,
    #[serde(default)]
    grade_exam: Option<f64>,
    #[serde(default)]
    current_grade: Option<f64>,
    #[serde(default)]
    final_grade: Option<f64>,
    #[serde(default)]
    letter_grade: Option<String>,
}

/// Read every row of a CSV file, paired with its line number
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<(u64, T)>, RecordsError> {
    let csv_error = |source| RecordsError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map_or(0, csv::Position::line);
        let row = record.deserialize(Some(&headers)).map_err(csv_error)?;
        rows.push((line, row));
    }
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn required(dir: &Path, name: &str) -> Result<PathBuf, RecordsError> {
    let path = dir.join(name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(RecordsError::MissingFile(path))
    }
}

fn optional(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    if path.is_file() {
        Some(path)
    } else {
        debug!("Optional file {} not present", path.display());
        None
    }
}

fn invalid(file: &'static str, line: u64, err: impl ToString) -> RecordsError {
    RecordsError::InvalidRecord {
        file,
        line,
        message: err.to_string(),
    }
}

fn build_enrollment(
    row: EnrollmentRow,
    line: u64,
    weights: &GradeWeights,
) -> Result<Enrollment, RecordsError> {
    let status: EnrollmentStatus = row
        .status
        .parse()
        .map_err(|e| invalid(ENROLLMENTS_FILE, line, e))?;

    let scores = PeriodScores {
        p1: row.grade_p1,
        p2: row.grade_p2,
        p3: row.grade_p3,
        exam: row.grade_exam,
    };
    for score in [scores.p1, scores.p2, scores.p3, scores.exam, row.current_grade, row.final_grade]
        .into_iter()
        .flatten()
    {
        validate_score(score).map_err(|e| invalid(ENROLLMENTS_FILE, line, e))?;
    }

    let mut enrollment = Enrollment::new(row.student_id, row.section_id, status);
    enrollment.scores = scores;
    enrollment.current_grade = row.current_grade.or_else(|| current_grade(&scores, weights));
    enrollment.set_final_grade(row.final_grade);

    let stored = row
        .letter_grade
        .as_deref()
        .filter(|letter| !letter.is_empty());
    if let Some(stored) = stored {
        let derived = enrollment.letter_grade();
        if stored.parse::<LetterGrade>().ok() != derived {
            warn!(
                "{} line {}: stored letter '{}' does not match final grade {:?}; using {}",
                ENROLLMENTS_FILE,
                line,
                stored,
                row.final_grade,
                derived.map_or("--", LetterGrade::as_str)
            );
        }
    }

    Ok(enrollment)
}

/// Load a data directory into a [`Gradebook`]
///
/// # Arguments
/// * `dir` - Directory holding the CSV files
/// * `weights` - Component weights used when a row has no stored running grade
///
/// # Errors
/// - [`RecordsError::MissingFile`] when a required file is absent
/// - [`RecordsError::Csv`] for unreadable or malformed files
/// - [`RecordsError::InvalidRecord`] for rows referring to unknown entities,
///   unknown statuses, out-of-range scores, or courses without credits
pub fn load_gradebook(dir: &Path, weights: GradeWeights) -> Result<Gradebook, RecordsError> {
    info!("Loading records from {}", dir.display());
    let mut book = Gradebook::new(weights);

    for (line, row) in read_rows::<CourseRow>(&required(dir, COURSES_FILE)?)? {
        if row.credits == 0 {
            return Err(invalid(
                COURSES_FILE,
                line,
                format!("course {} must have at least one credit", row.code),
            ));
        }
        let mut course = Course::new(row.code, row.name, row.credits);
        course.semester = row.semester;
        course.active = row.active.unwrap_or(true);
        book.add_course(course);
    }

    for (line, row) in read_rows::<SectionRow>(&required(dir, SECTIONS_FILE)?)? {
        let mut section =
            Section::new(row.id, row.course_code, row.professor_id, row.academic_period);
        if let Some(max) = row.max_students {
            section.max_students = max;
        }
        book.add_section(section)
            .map_err(|e| invalid(SECTIONS_FILE, line, e))?;
    }

    for (_, student) in read_rows::<Student>(&required(dir, STUDENTS_FILE)?)? {
        book.add_student(student);
    }

    if let Some(path) = optional(dir, PERIODS_FILE) {
        for (_, period) in read_rows::<AcademicPeriod>(&path)? {
            book.add_period(period);
        }
    }

    if let Some(path) = optional(dir, PREREQUISITES_FILE) {
        for (line, edge) in read_rows::<PrerequisiteEdge>(&path)? {
            match book.add_prerequisite(edge) {
                Ok(()) => {}
                Err(GradebookError::Graph(err)) => {
                    warn!("{} line {}: {}; edge skipped", PREREQUISITES_FILE, line, err);
                }
                Err(err) => return Err(invalid(PREREQUISITES_FILE, line, err)),
            }
        }
        if let Err(err) = book.prerequisites().validate() {
            warn!("{}", err);
        }
    }

    for (line, row) in read_rows::<EnrollmentRow>(&required(dir, ENROLLMENTS_FILE)?)? {
        if book.student(row.student_id).is_none() {
            return Err(invalid(
                ENROLLMENTS_FILE,
                line,
                GradebookError::UnknownStudent(row.student_id),
            ));
        }
        let enrollment = build_enrollment(row, line, &weights)?;
        book.insert_enrollment(enrollment)
            .map_err(|e| invalid(ENROLLMENTS_FILE, line, e))?;
    }

    if let Some(path) = optional(dir, ACTIVITIES_FILE) {
        for (line, activity) in read_rows::<Activity>(&path)? {
            book.add_activity(activity)
                .map_err(|e| invalid(ACTIVITIES_FILE, line, e))?;
        }
    }

    info!(
        "Loaded {} enrollments over {} courses",
        book.enrollment_count(),
        book.prerequisites().course_count()
    );
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(final_grade: Option<f64>, letter: Option<&str>) -> EnrollmentRow {
        EnrollmentRow {
            student_id: 1,
            section_id: 1,
            status: "completed".to_string(),
            grade_p1: Some(80.0),
            grade_p2: Some(90.0),
            grade_p3: None,
            grade_exam: None,
            current_grade: None,
            final_grade,
            letter_grade: letter.map(str::to_string),
        }
    }

    #[test]
    fn test_letter_rederived_from_final_grade() {
        let enrollment =
            build_enrollment(row(Some(90.0), Some("A")), 2, &GradeWeights::default()).unwrap();
        assert_eq!(enrollment.letter_grade(), Some(LetterGrade::B));
        assert_eq!(enrollment.status, EnrollmentStatus::Completed);
    }

    #[test]
    fn test_running_grade_filled_in() {
        let enrollment = build_enrollment(row(None, None), 2, &GradeWeights::default()).unwrap();
        assert_eq!(enrollment.current_grade, Some(85.0));
        assert_eq!(enrollment.letter_grade(), None);
    }

    #[test]
    fn test_bad_status_and_score() {
        let mut bad_status = row(None, None);
        bad_status.status = "graduated".to_string();
        let err = build_enrollment(bad_status, 7, &GradeWeights::default()).unwrap_err();
        assert!(err.to_string().starts_with("enrollments.csv line 7:"));

        let err =
            build_enrollment(row(Some(140.0), None), 3, &GradeWeights::default()).unwrap_err();
        assert!(matches!(err, RecordsError::InvalidRecord { line: 3, .. }));
    }

    #[test]
    fn test_missing_directory() {
        let err =
            load_gradebook(Path::new("/definitely/not/here"), GradeWeights::default()).unwrap_err();
        assert!(matches!(err, RecordsError::MissingFile(_)));
    }
}
