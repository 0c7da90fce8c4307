//! Prerequisites command handler

use academic_records::config::Config;
use academic_records::error;

/// Print whether a student may take a course, and what is missing
pub fn run(student: u64, course: &str, config: &Config) {
    if let Err(err) = check(student, course, config) {
        error!("Prerequisite check failed: {err}");
        super::fail(&err);
    }
}

fn check(student: u64, course: &str, config: &Config) -> Result<(), String> {
    let book = super::load_records(config)?;

    let eligible = book
        .check_prerequisites(student, course)
        .map_err(|e| format!("✗ {e}"))?;

    let graph = book.prerequisites();
    let optional = graph.optional_prerequisites(course);

    if eligible {
        println!("✓ Student {student} may enroll in {course}");
    } else {
        let missing = book.missing_prerequisites(student, course);
        println!("✗ Student {student} may not enroll in {course}");
        println!("  Missing: {}", missing.join(", "));
    }
    if !optional.is_empty() {
        println!("  Recommended: {}", optional.join(", "));
    }
    Ok(())
}
