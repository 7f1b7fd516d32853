//! Structured error types for xlfill.
//!
//! Every failure the request boundary can report maps onto an [`ErrorKind`].

use serde::{Deserialize, Serialize};

/// All errors that can occur while reading, scanning, patching or storing workbooks.
#[derive(Debug, thiserror::Error)]
pub enum XlfillError {
    /// Missing file, empty payload or wrong extension.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// The bytes are not a readable XLSX container.
    #[error("Malformed package: {0}")]
    MalformedPackage(String),

    /// The configured template could not be found.
    #[error("Template not found: {0}")]
    TemplateMissing(String),

    /// An internal patch step failed.
    #[error("Patch failed: {0}")]
    PatchFailure(String),

    /// No artifact is stored under the requested identifier.
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Placeholder pattern could not be compiled.
    #[error("Pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Catch-all.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlfillError>;

/// Coarse error category surfaced to callers of the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUpload,
    MalformedPackage,
    TemplateMissing,
    PatchFailure,
    ArtifactNotFound,
    UnknownInternal,
}

impl XlfillError {
    /// Category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUpload(_) => ErrorKind::InvalidUpload,
            Self::MalformedPackage(_) | Self::Zip(_) | Self::Xml(_) => ErrorKind::MalformedPackage,
            Self::TemplateMissing(_) => ErrorKind::TemplateMissing,
            Self::PatchFailure(_) => ErrorKind::PatchFailure,
            Self::ArtifactNotFound(_) => ErrorKind::ArtifactNotFound,
            Self::Io(_) | Self::Json(_) | Self::Pattern(_) | Self::Other(_) => {
                ErrorKind::UnknownInternal
            }
        }
    }

    /// Wrap a container-level failure as [`XlfillError::MalformedPackage`].
    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        Self::MalformedPackage(err.to_string())
    }
}

impl From<String> for XlfillError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for XlfillError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}
