use crate::persist::PersistError;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort the current log file. The run carries on with the next.
#[derive(Debug, Error)]
pub enum ImportError {
    //-------------------------------------------------------------------------
    // Log file
    //-------------------------------------------------------------------------
    #[error("could not open the log file {path}: {source}")]
    OpenLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading {path}: {source}")]
    ReadLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("first line of {path} is not an access log line")]
    FirstLineUnparsable { path: PathBuf },

    //-------------------------------------------------------------------------
    // Stats file
    //-------------------------------------------------------------------------
    #[error("unusable stats file for {date}: {source}")]
    CorruptStats {
        date: String,
        #[source]
        source: PersistError,
    },

    #[error("parsing log for {log_date} and existing stats are for {stats_date} in {path}")]
    DateMismatch {
        path: PathBuf,
        log_date: String,
        stats_date: String,
    },

    //-------------------------------------------------------------------------
    // Saving
    //-------------------------------------------------------------------------
    #[error(transparent)]
    Persist(#[from] PersistError),
}
