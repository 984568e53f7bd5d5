//! Output planning - decides which method directories exist.
//!
//! Each method with a path template maps to a directory built from the
//! template's segments plus its upper-cased HTTP verb:
//!
//! ```text
//! path "files/{fileId}/copy", httpMethod "post"  ->  files/{fileId}/copy/POST
//! ```

use std::path::PathBuf;

use regex::Regex;

use crate::document::{DiscoveryDocument, Method, Resource};
use crate::error::GenerateError;

/// Filter pattern that keeps every method.
pub const DEFAULT_FILTER: &str = "^.*$";

/// Verb segment used when a method has no `httpMethod`.
const UNKNOWN_VERB: &str = "UNKNOWN";

/// A method selected for output.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMethod<'a> {
    /// Output directory, relative to the output root.
    pub dir: PathBuf,
    pub method: &'a Method,
}

/// Compile a path filter.
///
/// # Errors
///
/// Returns `GenerateError::InvalidPattern` if `pattern` isn't a valid regex.
pub fn compile_filter(pattern: &str) -> Result<Regex, GenerateError> {
    Regex::new(pattern).map_err(|source| GenerateError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// List every method in the document whose directory matches `filter`.
///
/// Methods are visited in document order, root methods first, and each
/// resource's methods before its nested resources. Methods without a path
/// template are skipped. The planner never resolves schemas.
pub fn plan<'a>(document: &'a DiscoveryDocument, filter: &Regex) -> Vec<PlannedMethod<'a>> {
    let mut candidates = Vec::new();
    collect_methods(&document.methods, &mut candidates);
    for (_, resource) in &document.resources {
        collect_resource(resource, &mut candidates);
    }

    let total = candidates.len();
    let planned: Vec<PlannedMethod<'a>> = candidates
        .into_iter()
        .filter(|p| filter.is_match(&p.dir.to_string_lossy()))
        .collect();

    tracing::debug!(
        candidates = total,
        selected = planned.len(),
        filter = filter.as_str(),
        "planned method directories"
    );
    planned
}

/// Directory for a method, or `None` when it has no path template.
///
/// Empty, `.` and `..` segments are dropped, and a verb that isn't a plain
/// segment becomes `UNKNOWN`, so the directory always stays below the output
/// root.
pub fn method_dir(method: &Method) -> Option<PathBuf> {
    let path = method.path.as_deref()?;

    let mut dir: PathBuf = path
        .split('/')
        .filter(|segment| is_plain_segment(segment))
        .collect();
    let verb = method
        .http_method
        .as_deref()
        .map(str::to_uppercase)
        .filter(|verb| is_plain_segment(verb) && !verb.contains('/'))
        .unwrap_or_else(|| UNKNOWN_VERB.to_string());
    dir.push(verb);
    Some(dir)
}

fn is_plain_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
}

fn collect_resource<'a>(resource: &'a Resource, out: &mut Vec<PlannedMethod<'a>>) {
    collect_methods(&resource.methods, out);
    for (_, child) in &resource.resources {
        collect_resource(child, out);
    }
}

fn collect_methods<'a>(methods: &'a [(String, Method)], out: &mut Vec<PlannedMethod<'a>>) {
    for (_, method) in methods {
        if let Some(dir) = method_dir(method) {
            out.push(PlannedMethod { dir, method });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn method(verb: Option<&str>, path: Option<&str>) -> Method {
        Method {
            http_method: verb.map(String::from),
            path: path.map(String::from),
            ..Method::default()
        }
    }

    #[test]
    fn method_dir_strips_leading_separators() {
        let dir = method_dir(&method(Some("get"), Some("//files/{id}"))).unwrap();
        assert_eq!(dir, Path::new("files").join("{id}").join("GET"));
    }

    #[test]
    fn method_dir_defaults_verb() {
        let dir = method_dir(&method(None, Some("files"))).unwrap();
        assert_eq!(dir, Path::new("files").join("UNKNOWN"));
    }

    #[test]
    fn method_dir_requires_path() {
        assert!(method_dir(&method(Some("GET"), None)).is_none());
    }

    #[test]
    fn method_dir_skips_empty_segments() {
        let dir = method_dir(&method(Some("delete"), Some("a//b/"))).unwrap();
        assert_eq!(dir, Path::new("a").join("b").join("DELETE"));
    }

    #[test]
    fn method_dir_drops_dot_segments() {
        let dir = method_dir(&method(Some("put"), Some("../../x/./y/.."))).unwrap();
        assert_eq!(dir, Path::new("x").join("y").join("PUT"));
        assert!(dir.components().all(|c| matches!(c, std::path::Component::Normal(_))));
    }

    #[test]
    fn method_dir_rejects_path_like_verbs() {
        let dir = method_dir(&method(Some(".."), Some("files"))).unwrap();
        assert_eq!(dir, Path::new("files").join("UNKNOWN"));

        let dir = method_dir(&method(Some("get/../.."), Some("files"))).unwrap();
        assert_eq!(dir, Path::new("files").join("UNKNOWN"));
    }

    #[test]
    fn compile_filter_rejects_invalid_pattern() {
        let result = compile_filter("files/(");
        assert!(matches!(result, Err(GenerateError::InvalidPattern { .. })));
    }

    #[test]
    fn default_filter_matches_everything() {
        let filter = compile_filter(DEFAULT_FILTER).unwrap();
        assert!(filter.is_match("files/{id}/GET"));
        assert!(filter.is_match(""));
    }
}
