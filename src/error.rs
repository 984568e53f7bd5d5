//! Error types for loading Discovery documents and writing flattened output.
//!
//! Resolution itself never fails: missing schemas and references degrade to
//! empty or placeholder output instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading a Discovery document.
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

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid discovery document: {message}")]
    InvalidDocument { message: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while planning or writing output files.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid path filter \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{failed} of {total} file(s) could not be written")]
    Incomplete { failed: usize, total: usize },
}

impl GenerateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::InvalidPattern { .. } | GenerateError::Serialize { .. } => 2,
            _ => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("discovery.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::InvalidDocument {
            message: "expected an object".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn generate_error_exit_codes() {
        let err = GenerateError::CreateDir {
            path: PathBuf::from("out/files"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.exit_code(), 3);

        let err = GenerateError::Incomplete {
            failed: 1,
            total: 4,
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "1 of 4 file(s) could not be written");
    }

    #[test]
    fn invalid_pattern_display() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = GenerateError::InvalidPattern {
            pattern: "(".into(),
            source,
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("invalid path filter \"(\""));
    }
}
