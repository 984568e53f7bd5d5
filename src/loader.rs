//! Discovery document loading from files and strings.

use std::path::Path;

use serde_json::Value;

use crate::document::DiscoveryDocument;
use crate::error::LoadError;
use crate::types::json_type_name;

/// Load a Discovery document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::InvalidJson` if the file isn't valid JSON, or
/// `LoadError::InvalidDocument` if it isn't shaped like a Discovery document.
pub fn load_document(path: &Path) -> Result<DiscoveryDocument, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let document = load_document_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        schemas = document.schemas.len(),
        resources = document.resources.len(),
        "loaded discovery document"
    );
    Ok(document)
}

/// Load a Discovery document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON, or
/// `LoadError::InvalidDocument` if it isn't shaped like a Discovery document.
pub fn load_document_str(content: &str) -> Result<DiscoveryDocument, LoadError> {
    let raw: Value =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;

    if !raw.is_object() {
        return Err(LoadError::InvalidDocument {
            message: format!(
                "expected an object at the top level, got {}",
                json_type_name(&raw)
            ),
        });
    }

    serde_json::from_value(raw).map_err(|e| LoadError::InvalidDocument {
        message: e.to_string(),
    })
}
