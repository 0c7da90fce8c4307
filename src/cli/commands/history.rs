//! History command handler

use crate::args::ReportArgs;
use academic_records::config::Config;
use academic_records::core::access::Role;
use academic_records::core::models::Student;
use academic_records::core::report::HistoryReport;
use academic_records::{error, info, verbose};

/// Build and deliver the academic history report.
pub fn run(args: &ReportArgs, config: &Config) {
    if let Err(err) = history(args, config) {
        error!("History report failed: {err}");
        super::fail(&err);
    }
}

fn history(args: &ReportArgs, config: &Config) -> Result<(), String> {
    let mut book = super::load_records(config)?;
    let caller = args.caller();

    let periods = book
        .academic_history(&caller, args.student)
        .map_err(|e| format!("✗ {e}"))?;

    // The policy has already resolved who the history belongs to
    let student_id = if caller.role == Role::Student {
        caller.id
    } else {
        args.student.unwrap_or(caller.id)
    };
    let student = book.student(student_id).cloned().unwrap_or_else(|| Student {
        id: student_id,
        name: format!("Student {student_id}"),
        program: None,
    });

    info!(
        "History for student {}: {} period(s)",
        student_id,
        periods.len()
    );
    verbose!("Loaded {} enrollment rows", book.enrollment_count());

    let report = HistoryReport::new(&student, periods);
    super::deliver(&report, args, &format!("history-{student_id}"), config)
}
