//! Error types for otakit-core

use camino::Utf8PathBuf;
use serde_json::Value;
use thiserror::Error;

use crate::entry::Entry;

/// Result type alias using otakit-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for otakit
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required inputs were not provided
    #[error("Missing required input: {}", .names.join(", "))]
    MissingInputs { names: Vec<&'static str> },

    /// The update artifact could not be accessed
    #[error("Cannot access OTA artifact {path}: {source}")]
    ArtifactAccess {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SHA256 digest computation failed
    #[error("Failed to compute SHA256 of {path}: {message}")]
    Digest { path: Utf8PathBuf, message: String },

    /// The new entry's fingerprint is already recorded in the manifest
    #[error(
        "New OTA entry {} ({}) conflicts with an old one: {}",
        .new.id, .new.filename, .existing
    )]
    FingerprintConflict {
        new: Box<Entry>,
        /// The recorded entry as stored in the manifest
        existing: Box<Value>,
    },

    /// The manifest could not be written back
    #[error("Failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a missing inputs error
    pub fn missing_inputs(names: Vec<&'static str>) -> Self {
        Self::MissingInputs { names }
    }

    /// Create an artifact access error
    pub fn artifact_access(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::ArtifactAccess {
            path: path.into(),
            source,
        }
    }

    /// Create a digest error
    pub fn digest(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self::Digest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a fingerprint conflict error
    pub fn fingerprint_conflict(new: Entry, existing: Value) -> Self {
        Self::FingerprintConflict {
            new: Box::new(new),
            existing: Box::new(existing),
        }
    }

    /// Create a manifest write error
    pub fn manifest_write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::ManifestWrite {
            path: path.into(),
            source,
        }
    }
}
