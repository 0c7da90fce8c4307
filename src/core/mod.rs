//! Core module: grading engine, record collaborators and reports

pub mod access;
pub mod cache;
pub mod config;
pub mod gradebook;
pub mod grading;
pub mod history;
pub mod models;
pub mod performance;
pub mod prerequisites;
pub mod records;
pub mod report;

/// Returns the current version of the `academic-records` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
