//! Best-effort persistence of log artifacts.
//!
//! Writing a log must never fail the instrumented HTTP call, so nothing in this
//! module returns `Err`. Failures are reported through [`WriteOutcome`] and a
//! `warn!` line; callers that ignore the outcome see only a missing file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a log artifact was not persisted.
#[derive(Debug, Error)]
pub enum LogError {
    /// Creating the parent directory failed and the write that followed failed too.
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the file failed.
    #[error("failed to write log file {path}: {source}")]
    Write {
        /// Destination file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The metadata document could not be serialized.
    #[error("failed to serialize log document for {path}: {source}")]
    Serialize {
        /// Destination file.
        path: PathBuf,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result of one best-effort write.
#[derive(Debug)]
pub enum WriteOutcome {
    /// The file at the contained path now holds the content.
    Written(PathBuf),
    /// Nothing was attempted (logging disabled for the exchange, or no target).
    Skipped,
    /// The write was attempted and failed.
    Failed(LogError),
}

impl WriteOutcome {
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Path of the written file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Written(path) => Some(path),
            Self::Skipped | Self::Failed(_) => None,
        }
    }
}

/// Writes `content` to `path`, creating missing parent directories.
///
/// An existing file is overwritten. A failed directory creation is not fatal on
/// its own: the write is still attempted, and only its failure is reported.
pub async fn write_log(path: &Path, content: &str) -> WriteOutcome {
    let mut dir_error = None;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(source) = tokio::fs::create_dir_all(parent).await
    {
        debug!(dir = %parent.display(), error = %source, "log directory creation failed");
        dir_error = Some(LogError::CreateDir {
            path: parent.to_path_buf(),
            source,
        });
    }

    match tokio::fs::write(path, content).await {
        Ok(()) => WriteOutcome::Written(path.to_path_buf()),
        Err(source) => {
            let error = dir_error.unwrap_or_else(|| LogError::Write {
                path: path.to_path_buf(),
                source,
            });
            warn!(error = %error, "log write failed, continuing");
            WriteOutcome::Failed(error)
        }
    }
}

/// Serializes `document` as pretty JSON and writes it with [`write_log`].
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, document: &T) -> WriteOutcome {
    match serde_json::to_string_pretty(document) {
        Ok(json) => write_log(path, &json).await,
        Err(source) => {
            let error = LogError::Serialize {
                path: path.to_path_buf(),
                source,
            };
            warn!(error = %error, "log document serialization failed, continuing");
            WriteOutcome::Failed(error)
        }
    }
}
