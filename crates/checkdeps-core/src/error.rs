use std::path::PathBuf;
use thiserror::Error;

/// Core error type for checkdeps operations.
///
/// Almost every problem a reconciliation pass finds is returned as data in
/// the [`Report`](crate::Report). This type covers the few cases that abort
/// a blocking call outright.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{command} failed with code: {code}")]
    InstallFailed { command: String, code: i32 },

    #[error("{command} was terminated by a signal")]
    InstallTerminated { command: String },

    #[error("Failed to start `{command}` in {cwd}: {source}")]
    Spawn {
        command: String,
        cwd: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CheckError {
    /// Build the error for a finished child process that did not succeed.
    ///
    /// `code` is `None` when the process was killed by a signal.
    #[must_use]
    pub fn from_exit(command: impl Into<String>, code: Option<i32>) -> Self {
        let command = command.into();
        match code {
            Some(code) => Self::InstallFailed { command, code },
            None => Self::InstallTerminated { command },
        }
    }
}
