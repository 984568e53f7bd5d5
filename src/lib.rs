//! Discovery Schema Flattener
//!
//! Expands the recursive, name-referencing schemas of a Discovery document
//! into bounded, self-contained trees, one per API method and direction.
//!
//! # Example
//!
//! ```
//! use discovery_flatten::{load_document_str, resolve, ResolveOptions};
//! use serde_json::json;
//!
//! let doc = load_document_str(r#"{
//!     "schemas": {
//!         "Folder": {
//!             "properties": {
//!                 "name": { "type": "string" },
//!                 "parent": { "$ref": "Folder" },
//!                 "kind": { "enum": ["SHARED", "PRIVATE"] }
//!             }
//!         }
//!     }
//! }"#).unwrap();
//!
//! let options = ResolveOptions::new().start_depth(0);
//! let resolved = resolve("Folder", &doc.schemas, &options);
//!
//! assert_eq!(resolved, json!({
//!     "name": "<string>",
//!     "parent": "(recursion stopped)",
//!     "kind": "<SHARED|PRIVATE>"
//! }));
//! ```
//!
//! # Cut-off Rules
//!
//! | Rule | Applies | Placeholder |
//! |------|---------|-------------|
//! | Blacklist | always, checked first | `(hidden: blacklisted)` |
//! | Depth | depth >= `start_depth` | `(N properties hidden: max recursion exceeded)` |
//! | Cycle | depth >= `start_depth` | `(recursion stopped)` |
//! | Branches | depth >= `start_depth` | `(N properties hidden: max branches exceeded)` |
//!
//! Depth is the number of schemas being expanded above the current one.
//!
//! # Output Layout
//!
//! ```text
//! <output_dir>/files/{fileId}/GET/request.json
//! <output_dir>/files/{fileId}/GET/response.json
//! ```

mod document;
mod error;
mod generate;
mod loader;
mod planner;
mod resolver;
mod types;

pub use document::{
    DiscoveryDocument, FieldSpec, ItemSpec, Method, Resource, SchemaCatalogue, SchemaDefinition,
    SchemaRef,
};
pub use error::{GenerateError, LoadError};
pub use generate::{
    generate, resolve_method, to_pretty_json, GenerateOptions, GenerateSummary, WrittenFile,
};
pub use loader::{load_document, load_document_str};
pub use planner::{compile_filter, method_dir, plan, PlannedMethod, DEFAULT_FILTER};
pub use resolver::resolve;
pub use types::{
    Direction, ResolveOptions, DEFAULT_BLACKLIST, DEPTH_LIMIT, DOCS_KEY, HIDDEN_BLACKLISTED,
    RECURSION_STOPPED,
};
