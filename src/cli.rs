//! Command-line arguments, runtime configuration and logging setup.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{Result, RosterError};
use crate::records::{LoadPolicy, SaveMode};

const CSV_EXTENSION: &str = "csv";

/// Console roster manager for student records stored in a CSV file.
#[derive(Debug, Clone, Parser)]
#[command(name = "student-roster", version)]
pub struct Args {
    /// Roster file to load at startup and save to
    #[arg(short = 'f', long = "file", value_name = "PATH", default_value = "students.csv")]
    pub file: PathBuf,

    /// Append on save instead of rewriting the file
    ///
    /// The header is only written when the file is new, so every save adds
    /// another copy of the roster.
    #[arg(long)]
    pub append: bool,

    /// Skip lines that fail to parse instead of rejecting the whole file
    #[arg(long)]
    pub skip_malformed: bool,

    /// Log verbosity (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Settings the session runs with, resolved from [`Args`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub file: PathBuf,
    pub save_mode: SaveMode,
    pub load_policy: LoadPolicy,
}

impl Args {
    pub fn log_level(&self) -> LogLevel {
        if self.quiet {
            LogLevel::Error
        } else {
            self.log_level
        }
    }

    pub fn to_config(&self) -> Result<Config> {
        let has_csv_extension = self
            .file
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION));
        if !has_csv_extension {
            return Err(RosterError::InvalidArgument(format!(
                "the file must have a .csv extension: {}",
                self.file.display()
            )));
        }

        Ok(Config {
            file: self.file.clone(),
            save_mode: if self.append {
                SaveMode::Append
            } else {
                SaveMode::Overwrite
            },
            load_policy: if self.skip_malformed {
                LoadPolicy::SkipMalformed
            } else {
                LoadPolicy::Abort
            },
        })
    }
}

/// Structured logging to stderr so it never interleaves with the menu.
pub fn setup_logging(level: LogLevel) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("student_roster={}", level.as_str())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", level.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("student-roster").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);
        let config = args.to_config().unwrap();

        assert_eq!(config.file, PathBuf::from("students.csv"));
        assert_eq!(config.save_mode, SaveMode::Overwrite);
        assert_eq!(config.load_policy, LoadPolicy::Abort);
        assert_eq!(args.log_level(), LogLevel::Warn);
    }

    #[test]
    fn flags_select_append_and_skip() {
        let config = parse(&["--file", "data/class.CSV", "--append", "--skip-malformed"])
            .to_config()
            .unwrap();

        assert_eq!(config.file, PathBuf::from("data/class.CSV"));
        assert_eq!(config.save_mode, SaveMode::Append);
        assert_eq!(config.load_policy, LoadPolicy::SkipMalformed);
    }

    #[test]
    fn rejects_non_csv_file() {
        let err = parse(&["-f", "students.txt"]).to_config().unwrap_err();
        assert!(matches!(err, RosterError::InvalidArgument(_)));

        assert!(parse(&["-f", "students"]).to_config().is_err());
    }

    #[test]
    fn quiet_overrides_log_level() {
        assert_eq!(parse(&["--log-level", "debug", "-q"]).log_level(), LogLevel::Error);
        assert_eq!(parse(&["--log-level", "debug"]).log_level(), LogLevel::Debug);
    }
}
