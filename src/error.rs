//! Error types for the configuration and storage edges
//!
//! The simulation itself is total; only loading tuning files and the
//! leaderboard can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating [`crate::Tuning`].
#[derive(Error, Debug)]
pub enum TuningError {
    /// The tuning file could not be read.
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tuning JSON is malformed.
    #[error("malformed tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A field holds a value the simulation cannot run with.
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl TuningError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while persisting the leaderboard.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("leaderboard file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("leaderboard JSON: {0}")]
    Json(#[from] serde_json::Error),
}
