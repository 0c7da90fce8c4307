//! CLI command handlers for `academics`.
//!
//! Each command is implemented in its own submodule; the helpers here load
//! the records directory and deliver rendered reports.

pub mod config;
pub mod grade;
pub mod history;
pub mod performance;
pub mod periods;
pub mod prereqs;

use crate::args::ReportArgs;
use academic_records::config::Config;
use academic_records::core::gradebook::Gradebook;
use academic_records::core::records::load_gradebook;
use academic_records::core::report::{ReportFormat, ReportGenerator};
use academic_records::{error, info};
use std::path::{Path, PathBuf};

/// Load the configured records directory
///
/// # Errors
/// Returns a printable message when the directory cannot be loaded.
pub fn load_records(config: &Config) -> Result<Gradebook, String> {
    let dir = Path::new(&config.paths.data_dir);
    load_gradebook(dir, config.grade_weights()).map_err(|e| {
        error!("Failed to load records from {}: {e}", dir.display());
        format!("✗ Failed to load records from {}: {e}", dir.display())
    })
}

/// Print a report to stdout, or write it where `--output`/`--save` point
///
/// # Errors
/// Returns a printable message when rendering or writing fails.
pub fn deliver(
    report: &impl ReportGenerator,
    args: &ReportArgs,
    default_name: &str,
    config: &Config,
) -> Result<(), String> {
    let format: ReportFormat = args.format.into();

    let target: Option<PathBuf> = if args.save {
        let file_name = format!("{default_name}.{}", format.extension());
        Some(Path::new(&config.paths.reports_dir).join(file_name))
    } else {
        args.output.clone()
    };

    match target {
        Some(path) => {
            report
                .generate(format, &path)
                .map_err(|e| format!("✗ Failed to write {format} report: {e}"))?;
            info!("Report written to {}", path.display());
            println!("✓ Report generated: {}", path.display());
        }
        None => {
            let content = report
                .render(format)
                .map_err(|e| format!("✗ Failed to render {format} report: {e}"))?;
            print!("{content}");
        }
    }
    Ok(())
}

/// Report a command failure and exit with status 1
pub fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
