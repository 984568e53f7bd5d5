//! Output generation - resolves each planned method and writes its files.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::document::{DiscoveryDocument, Method};
use crate::error::GenerateError;
use crate::planner::{compile_filter, plan, DEFAULT_FILTER};
use crate::resolver::resolve;
use crate::types::{Direction, ResolveOptions};

/// Options for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Policy for request schemas.
    pub request: ResolveOptions,
    /// Policy for response schemas.
    pub response: ResolveOptions,
    /// Only method directories matching this pattern are written.
    pub filter: Regex,
    /// Log and skip files that can't be written instead of aborting the run.
    pub keep_going: bool,
}

impl GenerateOptions {
    /// Create options with one policy for both directions and a match-all filter.
    pub fn new(options: ResolveOptions) -> Result<Self, GenerateError> {
        Ok(Self {
            request: options.clone(),
            response: options,
            filter: compile_filter(DEFAULT_FILTER)?,
            keep_going: false,
        })
    }

    pub fn request(mut self, options: ResolveOptions) -> Self {
        self.request = options;
        self
    }

    pub fn response(mut self, options: ResolveOptions) -> Self {
        self.response = options;
        self
    }

    pub fn filter(mut self, filter: Regex) -> Self {
        self.filter = filter;
        self
    }

    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Returns the policy for a direction.
    pub fn for_direction(&self, direction: Direction) -> &ResolveOptions {
        match direction {
            Direction::Request => &self.request,
            Direction::Response => &self.response,
        }
    }
}

/// A file produced by a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    /// Path relative to the output root.
    pub relative_path: PathBuf,
    /// Size of the serialized tree in bytes.
    pub bytes: usize,
    /// Time spent resolving, serializing and writing.
    pub elapsed: Duration,
}

/// Totals for a completed generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub methods: usize,
    pub files: usize,
    pub bytes: usize,
}

/// Resolve one direction of a method.
///
/// A method that doesn't declare the direction yields an empty object.
pub fn resolve_method(
    document: &DiscoveryDocument,
    method: &Method,
    direction: Direction,
    options: &ResolveOptions,
) -> Value {
    match method.schema_ref(direction) {
        Some(schema_ref) => resolve(
            schema_ref.target.as_deref().unwrap_or_default(),
            &document.schemas,
            options,
        ),
        None => Value::Object(Map::new()),
    }
}

/// Serialize a resolved tree with four-space indentation.
pub fn to_pretty_json(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Write `request.json` and `response.json` for every planned method.
///
/// Directories are created as needed; existing ones are reused. `on_file` is
/// called after each file is written.
///
/// # Errors
///
/// Without `keep_going`, the first directory or file that can't be written
/// aborts the run. With it, failures are logged and the run ends with
/// `GenerateError::Incomplete`.
pub fn generate<F>(
    document: &DiscoveryDocument,
    output_dir: &Path,
    options: &GenerateOptions,
    mut on_file: F,
) -> Result<GenerateSummary, GenerateError>
where
    F: FnMut(&WrittenFile),
{
    let planned = plan(document, &options.filter);
    let total = planned.len() * Direction::ALL.len();
    let mut summary = GenerateSummary {
        methods: planned.len(),
        ..GenerateSummary::default()
    };
    let mut failed = 0;

    for entry in &planned {
        let dir = output_dir.join(&entry.dir);
        if let Err(source) = std::fs::create_dir_all(&dir) {
            let err = GenerateError::CreateDir { path: dir, source };
            if !options.keep_going {
                return Err(err);
            }
            tracing::warn!(error = %err, "skipping method");
            failed += Direction::ALL.len();
            continue;
        }

        for direction in Direction::ALL {
            let relative_path = entry.dir.join(direction.file_name());
            let written = write_direction(
                document,
                entry.method,
                direction,
                options,
                &dir,
                relative_path,
            );
            match written {
                Ok(file) => {
                    tracing::info!(
                        direction = direction.key(),
                        path = %file.relative_path.display(),
                        bytes = file.bytes,
                        elapsed_ms = file.elapsed.as_millis() as u64,
                        "wrote file"
                    );
                    summary.files += 1;
                    summary.bytes += file.bytes;
                    on_file(&file);
                }
                Err(err) if options.keep_going => {
                    tracing::warn!(direction = direction.key(), error = %err, "skipping file");
                    failed += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    if failed > 0 {
        return Err(GenerateError::Incomplete { failed, total });
    }
    Ok(summary)
}

fn write_direction(
    document: &DiscoveryDocument,
    method: &Method,
    direction: Direction,
    options: &GenerateOptions,
    dir: &Path,
    relative_path: PathBuf,
) -> Result<WrittenFile, GenerateError> {
    let path = dir.join(direction.file_name());
    let start = Instant::now();

    let resolved = resolve_method(document, method, direction, options.for_direction(direction));
    let content = to_pretty_json(&resolved).map_err(|source| GenerateError::Serialize {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, &content).map_err(|source| GenerateError::WriteFile {
        path: path.clone(),
        source,
    })?;

    Ok(WrittenFile {
        path,
        relative_path,
        bytes: content.len(),
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_pretty_json_uses_four_spaces() {
        let out = to_pretty_json(&json!({ "id": "<string>" })).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n    \"id\": \"<string>\"\n}");
    }

    #[test]
    fn to_pretty_json_empty_object() {
        let out = to_pretty_json(&json!({})).unwrap();
        assert_eq!(out, b"{}");
    }

    #[test]
    fn resolve_method_missing_direction_is_empty() {
        let document = DiscoveryDocument::default();
        let method = Method::default();
        let result = resolve_method(
            &document,
            &method,
            Direction::Response,
            &ResolveOptions::new(),
        );
        assert_eq!(result, json!({}));
    }

    #[test]
    fn generate_options_per_direction() {
        let options = GenerateOptions::new(ResolveOptions::new())
            .unwrap()
            .response(ResolveOptions::new().max_depth(3));
        assert_eq!(options.for_direction(Direction::Request).max_depth, 100);
        assert_eq!(options.for_direction(Direction::Response).max_depth, 3);
    }
}
