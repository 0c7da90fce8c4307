//! CLI argument definitions for `academics`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use academic_records::config::ConfigOverrides;
use academic_records::core::access::{Caller, Role};
use academic_records::core::report::ReportFormat;
use academic_records::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// Caller role argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum RoleArg {
    /// Administrator
    Admin,
    /// Professor
    Professor,
    /// Student
    Student,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Self::Admin,
            RoleArg::Professor => Self::Professor,
            RoleArg::Student => Self::Student,
        }
    }
}

/// Report output format argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Pretty-printed JSON
    Json,
    /// Markdown tables
    #[value(alias = "md")]
    Markdown,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Self::Json,
            FormatArg::Markdown => Self::Markdown,
        }
    }
}

/// Who is running a report, and where its output goes
#[derive(Debug, clap::Args)]
pub struct ReportArgs {
    /// Role of the caller
    #[arg(long, value_enum)]
    pub role: RoleArg,

    /// Account id of the caller
    #[arg(long = "user-id", value_name = "ID")]
    pub user_id: u64,

    /// Student to report on (ignored for students, who always see themselves)
    #[arg(long, value_name = "ID")]
    pub student: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: FormatArg,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the report into the configured reports directory
    #[arg(long, conflicts_with = "output")]
    pub save: bool,
}

impl ReportArgs {
    /// The caller described by `--role` and `--user-id`
    pub fn caller(&self) -> Caller {
        Caller::new(self.role.into(), self.user_id)
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `data_dir`, `weight_exam`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Show the letter grade and grade points for a numeric score.
    Grade {
        /// Numeric score (0-100)
        #[arg(value_name = "SCORE", allow_negative_numbers = true)]
        score: f64,
    },
    /// Academic history: per-period GPA and standing.
    History {
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Detailed per-section performance.
    Performance {
        #[command(flatten)]
        report: ReportArgs,

        /// Only show this academic period (e.g., 2025-C1)
        #[arg(long, value_name = "CODE")]
        period: Option<String>,
    },
    /// Check whether a student meets the prerequisites of a course.
    Prereqs {
        /// Student id
        #[arg(long, value_name = "ID")]
        student: u64,

        /// Course code
        #[arg(long, value_name = "CODE")]
        course: String,
    },
    /// List the academic periods a caller can filter by.
    Periods {
        /// Role of the caller
        #[arg(long, value_enum)]
        role: RoleArg,

        /// Account id of the caller
        #[arg(long = "user-id", value_name = "ID")]
        user_id: u64,

        /// Restrict to one student
        #[arg(long, value_name = "ID")]
        student: Option<u64>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "academics",
    about = "Grades, prerequisites and academic history from CSV records",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Load records from this directory for this run only
    #[arg(long, value_name = "DIR")]
    pub data: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config records directory
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `--data` wins over `--data-dir` when both are given.
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let as_string = |p: &PathBuf| p.to_string_lossy().to_string();
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_ref().map(as_string),
            verbose: self.config_verbose,
            data_dir: self
                .data
                .as_ref()
                .or(self.data_dir.as_ref())
                .map(as_string),
            reports_dir: self.reports_dir.as_ref().map(as_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(command: Command) -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            data: None,
            config_level: None,
            config_log_file: None,
            config_verbose: None,
            data_dir: None,
            reports_dir: None,
            command,
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = cli(Command::Config { subcommand: None }).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.data_dir.is_none());
        assert!(overrides.reports_dir.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let mut args = cli(Command::Config { subcommand: None });
        args.config_level = Some(LogLevelArg::Debug);
        args.config_log_file = Some(PathBuf::from("/tmp/test.log"));
        args.config_verbose = Some(true);
        args.data_dir = Some(PathBuf::from("/srv/records"));
        args.reports_dir = Some(PathBuf::from("/srv/reports"));

        let overrides = args.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.data_dir, Some("/srv/records".to_string()));
        assert_eq!(overrides.reports_dir, Some("/srv/reports".to_string()));
    }

    #[test]
    fn test_data_flag_precedence() {
        let mut args = cli(Command::Grade { score: 90.0 });
        args.data_dir = Some(PathBuf::from("/config/records"));
        args.data = Some(PathBuf::from("/run/records"));

        assert_eq!(args.to_config_overrides().data_dir, Some("/run/records".to_string()));
    }

    #[test]
    fn test_parse_history_command() {
        let args = Cli::parse_from([
            "academics",
            "history",
            "--role",
            "admin",
            "--user-id",
            "1",
            "--student",
            "5",
            "-f",
            "json",
        ]);
        match args.command {
            Command::History { report } => {
                assert_eq!(report.caller(), Caller::new(Role::Admin, 1));
                assert_eq!(report.student, Some(5));
                assert_eq!(ReportFormat::from(report.format), ReportFormat::Json);
                assert!(!report.save);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_grade_command() {
        let args = Cli::parse_from(["academics", "grade", "89.9"]);
        assert!(matches!(args.command, Command::Grade { score } if (score - 89.9).abs() < 1e-9));
    }
}
