use std::path::PathBuf;

use cvault_path::{conceal_escaped, PathError};
use thiserror::Error;

pub type RestoreResult<T> = Result<T, RestoreError>;

/// Restore planning failures.
///
/// Everything except `Cancelled` and the details-source variants is scoped
/// to a single entry and is reported through a [`crate::FailureSink`].
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("parsing repo ref {repo_ref}: {source}")]
    RepoRef {
        /// Concealed.
        repo_ref: String,
        source: PathError,
    },

    #[error("building restore path from location ref {location_ref}: {source}")]
    LocationRef {
        /// Concealed.
        location_ref: String,
        source: PathError,
    },

    #[error("extracting drive path from {repo_ref}: {source}")]
    DrivePath {
        /// Concealed.
        repo_ref: String,
        source: PathError,
    },

    #[error("unknown entry type")]
    UnrecognizedEntryType,

    #[error("restore path {restore_path} shorter than storage path {storage_path}")]
    RestorePathTooShort {
        restore_path: String,
        storage_path: String,
    },

    #[error("deriving collection path: {0}")]
    Collection(#[source] PathError),

    #[error("restore cancelled")]
    Cancelled,

    #[error("reading details {}: {source}", .path.display())]
    DetailsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("decoding details: {0}")]
    DetailsJson(#[from] serde_json::Error),

    #[error("building worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl RestoreError {
    pub(crate) fn repo_ref(repo_ref: &str, source: PathError) -> Self {
        RestoreError::RepoRef {
            repo_ref: conceal_escaped(repo_ref),
            source,
        }
    }

    pub(crate) fn location_ref(location_ref: &str, source: PathError) -> Self {
        RestoreError::LocationRef {
            location_ref: conceal_escaped(location_ref),
            source,
        }
    }

    pub(crate) fn drive_path(repo_ref: &str, source: PathError) -> Self {
        RestoreError::DrivePath {
            repo_ref: conceal_escaped(repo_ref),
            source,
        }
    }

    /// The path error underneath, if this failure came from path handling.
    pub fn path_error(&self) -> Option<&PathError> {
        match self {
            RestoreError::RepoRef { source, .. }
            | RestoreError::LocationRef { source, .. }
            | RestoreError::DrivePath { source, .. }
            | RestoreError::Collection(source) => Some(source.root_cause()),
            _ => None,
        }
    }
}
