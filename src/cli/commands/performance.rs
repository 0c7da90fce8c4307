//! Performance command handler

use crate::args::ReportArgs;
use academic_records::config::Config;
use academic_records::core::access::Role;
use academic_records::core::report::PerformanceReport;
use academic_records::{error, info};

/// Build and deliver the detailed performance report.
pub fn run(args: &ReportArgs, period: Option<&str>, config: &Config) {
    if let Err(err) = performance(args, period, config) {
        error!("Performance report failed: {err}");
        super::fail(&err);
    }
}

fn performance(args: &ReportArgs, period: Option<&str>, config: &Config) -> Result<(), String> {
    let book = super::load_records(config)?;
    let caller = args.caller();

    let rows = book
        .detailed_performance(&caller, args.student, period)
        .map_err(|e| format!("✗ {e}"))?;
    info!("Performance report: {} row(s)", rows.len());

    let student = if caller.role == Role::Student {
        Some(caller.id)
    } else {
        args.student
    };
    let name = match (student, period) {
        (Some(id), Some(p)) => format!("performance-{id}-{p}"),
        (Some(id), None) => format!("performance-{id}"),
        (None, _) => "performance".to_string(),
    };

    let report = PerformanceReport::new(student, period.map(str::to_string), rows);
    super::deliver(&report, args, &name, config)
}
