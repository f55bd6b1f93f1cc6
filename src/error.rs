use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole timesheet run.
#[derive(Error, Debug)]
pub enum TimesheetError {
    #[error("Could not open calendar file {}: {source}", .path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Why a single calendar record could not become a timesheet entry.
///
/// These never abort a run: the record is dropped and counted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("event has no {0} property")]
    MissingProperty(&'static str),

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("unknown time zone '{0}'")]
    UnknownTimeZone(String),

    #[error("'{0}' is a date without a time of day")]
    DateOnly(String),

    #[error("floating time '{0}' has no time zone")]
    FloatingTime(String),
}
