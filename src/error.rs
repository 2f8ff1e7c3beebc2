//! Error types for skeletonize operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while discovering, reconciling, or persisting settings
#[derive(Error, Debug)]
pub enum SkeletonizeError {
    /// The settings module could not be loaded at all
    #[error("Unable to load 'source_file' {}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings module loaded but evaluating it went wrong
    #[error("{}:{line}: {message}", path.display())]
    Execution {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The existing INI store is malformed
    #[error("{}:{line}: malformed ini: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The target exists and overwriting was not permitted
    #[error("ini_file '{}' exists and overwrite is False", path.display())]
    TargetExists { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SkeletonizeError {
    /// True for the failures reported at the CLI boundary without a backtrace of context
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. } | Self::TargetExists { .. })
    }
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, SkeletonizeError>;
