//! Error types for document loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a document, schema or payload.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML: {source}")]
    InvalidYaml {
        #[source]
        source: serde_yaml::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors during validation.
///
/// Constraint violations found in the data are reported through
/// [`ValidateError::Invalid`]; the other variants mean validation could not run.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Load(e) => e.exit_code(),
            ValidateError::InvalidSchema { .. } => 2,
            ValidateError::Invalid { .. } => 1,
        }
    }
}

/// Failure to resolve a `$ref` against the document it appears in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefError {
    /// Only same-document JSON pointers (`#/...`) are followed.
    #[error("invalid ref \"{reference}\"")]
    Unsupported { reference: String },

    #[error("object has no key \"{key}\"")]
    MissingKey { reference: String, key: String },

    #[error("invalid schema at \"{reference}\": {message}")]
    InvalidTarget { reference: String, message: String },
}

/// Single diagnostic with path context.
///
/// The message is self-contained (it already names the offending path), so
/// `Display` renders the message alone. `path` is kept for machine consumers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SchemaError {
    /// Dot-delimited path to the offending value, empty for document-wide findings.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl SchemaError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
