//! Core types for schema flattening.

use std::collections::BTreeSet;

use serde_json::Value;

/// Reserved key under which description text is injected into resolved mappings.
pub const DOCS_KEY: &str = "__DOCS";

/// Schemas hidden by default: vendor context blobs that dwarf every method they appear in.
pub const DEFAULT_BLACKLIST: &[&str] = &[
    "YoutubeApiInnertubeInnerTubeContext",
    "YoutubeApiInnertubeResponseContext",
];

/// Deepest stack depth the resolver will recurse to, whatever the options say.
///
/// `start_depth` and `max_depth` are clamped to this value, so every
/// resolution stops within `DEPTH_LIMIT` nested expansions.
pub const DEPTH_LIMIT: usize = 256;

/// Placeholder emitted for blacklisted schemas.
pub const HIDDEN_BLACKLISTED: &str = "(hidden: blacklisted)";

/// Placeholder emitted when a schema repeats along the current path.
pub const RECURSION_STOPPED: &str = "(recursion stopped)";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Direction of a method's payload.
///
/// Each planned method produces one output file per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    /// Both directions, in output order.
    pub const ALL: [Direction; 2] = [Direction::Request, Direction::Response];

    /// Returns the method record key for this direction.
    pub fn key(&self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Response => "response",
        }
    }

    /// Returns the output file name for this direction.
    pub fn file_name(&self) -> &'static str {
        match self {
            Direction::Request => "request.json",
            Direction::Response => "response.json",
        }
    }
}

/// Policy knobs for one resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Stack depth at which expansion stops with a "max recursion" placeholder.
    pub max_depth: usize,
    /// Depth below which depth, cycle and branch checks are skipped.
    pub start_depth: usize,
    /// Largest property count a gated schema may have and still be expanded.
    pub max_branches: usize,
    /// Schema names that always resolve to the blacklisted placeholder.
    pub blacklist: BTreeSet<String>,
    /// Whether to carry description text into the output.
    pub include_docs: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: 100,
            start_depth: 1,
            max_branches: 10,
            blacklist: BTreeSet::new(),
            include_docs: false,
        }
    }
}

impl ResolveOptions {
    /// Create options with the default limits and an empty blacklist.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn start_depth(mut self, start_depth: usize) -> Self {
        self.start_depth = start_depth;
        self
    }

    pub fn max_branches(mut self, max_branches: usize) -> Self {
        self.max_branches = max_branches;
        self
    }

    /// Replace the blacklist. Blank names are dropped.
    pub fn blacklist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.trim().is_empty())
            .collect();
        self
    }

    pub fn include_docs(mut self, include_docs: bool) -> Self {
        self.include_docs = include_docs;
        self
    }

    /// `start_depth`, clamped to [`DEPTH_LIMIT`].
    pub fn effective_start_depth(&self) -> usize {
        self.start_depth.min(DEPTH_LIMIT)
    }

    /// `max_depth`, clamped to [`DEPTH_LIMIT`].
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.min(DEPTH_LIMIT)
    }

    /// Returns true if `name` is blacklisted.
    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.blacklist.contains(name)
    }
}

/// Returns the trimmed text if it is not blank.
pub(crate) fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
