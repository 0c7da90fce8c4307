//! Shared library for `academic-records`
//! Contains the grading core and the collaborators the CLI drives it with

pub mod core;
pub mod logger;

pub use core::{config, get_version};
