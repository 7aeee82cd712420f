//! Error taxonomy for the merge pipeline.
//!
//! Format, structure and IO failures abort a run. Lookup misses are not
//! errors; they surface as `SkippedPoint`s in the fusion report.

use crate::storage::config::ConfigError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Malformed timestamp, table row or XML syntax
    #[error("Format error at {location}: {message}")]
    Format { location: String, message: String },

    /// Track document does not have the expected activity/lap/track shape
    #[error("Structure error at {location}: {message}")]
    Structure { location: String, message: String },

    /// Input missing or output not writable
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML generation error
    #[error("XML serialization error: {0}")]
    Serialize(String),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MergeError {
    pub fn format(location: impl Into<String>, message: impl Into<String>) -> Self {
        MergeError::Format {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn structure(location: impl Into<String>, message: impl Into<String>) -> Self {
        MergeError::Structure {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        MergeError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Prefix the location with the file it was found in.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            MergeError::Format { location, message } => MergeError::Format {
                location: format!("{}, {}", path.display(), location),
                message,
            },
            MergeError::Structure { location, message } => MergeError::Structure {
                location: format!("{}, {}", path.display(), location),
                message,
            },
            other => other,
        }
    }

    /// Process exit status for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            MergeError::Format { .. } => 3,
            MergeError::Structure { .. } => 4,
            MergeError::Io { .. } | MergeError::Serialize(_) => 5,
            MergeError::Config(_) => 6,
        }
    }

    /// Short name of the failing stage for operator messages.
    pub fn kind(&self) -> &'static str {
        match self {
            MergeError::Format { .. } => "format",
            MergeError::Structure { .. } => "structure",
            MergeError::Io { .. } => "io",
            MergeError::Serialize(_) => "serialize",
            MergeError::Config(_) => "config",
        }
    }
}
