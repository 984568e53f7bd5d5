//! Schema resolution - expands a named schema into a bounded, self-contained tree.

use serde_json::{Map, Value};

use crate::document::{FieldSpec, ItemSpec, SchemaCatalogue, SchemaDefinition};
use crate::types::{non_blank, ResolveOptions, DOCS_KEY, HIDDEN_BLACKLISTED, RECURSION_STOPPED};

/// Resolve a schema by name into a JSON tree describing its shape.
///
/// Every reachable `$ref` is expanded in place. Leaves become placeholder
/// strings such as `"<string>"` or `"<A|B>"`; arrays become a one-element
/// sequence wrapping their item. Expansion is cut short with a placeholder
/// string when:
///
/// - the schema is blacklisted (checked first, at any depth),
/// - the current depth reaches `max_depth`,
/// - the schema already appears on the path from the root,
/// - the schema has more than `max_branches` properties.
///
/// The last three checks only apply once the depth reaches `start_depth`.
/// Both depths are clamped to [`DEPTH_LIMIT`](crate::DEPTH_LIMIT), which bounds
/// the recursion regardless of the options.
/// A missing or unknown schema name resolves to an empty object.
pub fn resolve<'a>(
    schema_name: &'a str,
    catalogue: &'a SchemaCatalogue,
    options: &'a ResolveOptions,
) -> Value {
    let mut resolver = Resolver {
        catalogue,
        options,
        stack: Vec::new(),
    };
    resolver.resolve_schema(schema_name)
}

// --- Internal implementation ---

struct Resolver<'a> {
    catalogue: &'a SchemaCatalogue,
    options: &'a ResolveOptions,
    /// Schemas being expanded on the path from the root; each name at most once.
    stack: Vec<&'a str>,
}

impl<'a> Resolver<'a> {
    fn resolve_schema(&mut self, name: &'a str) -> Value {
        if self.options.is_blacklisted(name) {
            return Value::String(HIDDEN_BLACKLISTED.to_string());
        }

        let schema = self.catalogue.get(name);
        let property_count = schema.map_or(0, |s| s.properties.len());
        let depth = self.stack.len();

        if depth >= self.options.effective_start_depth() {
            if depth >= self.options.effective_max_depth() {
                return Value::String(format!(
                    "({} properties hidden: max recursion exceeded)",
                    property_count
                ));
            }
            if self.stack.contains(&name) {
                return Value::String(RECURSION_STOPPED.to_string());
            }
            if property_count > self.options.max_branches {
                return Value::String(format!(
                    "({} properties hidden: max branches exceeded)",
                    property_count
                ));
            }
        }

        self.stack.push(name);
        let expanded = self.expand(schema);
        self.stack.pop();
        Value::Object(expanded)
    }

    fn expand(&mut self, schema: Option<&'a SchemaDefinition>) -> Map<String, Value> {
        let mut resolved = Map::new();
        let Some(schema) = schema else {
            return resolved;
        };

        if self.options.include_docs {
            if let Some(docs) = non_blank(schema.description.as_deref()) {
                resolved.insert(DOCS_KEY.to_string(), Value::String(docs.to_string()));
            }
        }

        for (name, field) in &schema.properties {
            let value = self.resolve_field(field);
            resolved.insert(name.clone(), value);
        }

        resolved
    }

    fn resolve_field(&mut self, field: &'a FieldSpec) -> Value {
        match field {
            FieldSpec::Ref { target } => self.resolve_schema(target),
            FieldSpec::Array { items, description } => {
                let item = match items {
                    ItemSpec::Ref(target) => self.resolve_schema(target),
                    ItemSpec::Primitive(type_name) => Value::String(format!("<{}>", type_name)),
                };
                // Described arrays carry the docs as a leading marker element.
                match self.docs(description) {
                    Some(docs) => Value::Array(vec![
                        Value::String(format!("(DOCS: {})", docs)),
                        item,
                    ]),
                    None => Value::Array(vec![item]),
                }
            }
            FieldSpec::Object {
                target,
                description,
            } => {
                let mut node = match target {
                    Some(target) => self.resolve_schema(target),
                    None => Value::Object(Map::new()),
                };
                // Placeholder strings have nowhere to carry docs.
                if let (Some(docs), Value::Object(map)) = (self.docs(description), &mut node) {
                    map.insert(DOCS_KEY.to_string(), Value::String(docs.to_string()));
                }
                node
            }
            FieldSpec::Enum {
                values,
                descriptions,
            } => Value::String(render_enum(values, descriptions)),
            FieldSpec::Primitive {
                type_name,
                description,
            } => match self.docs(description) {
                Some(docs) => Value::String(format!("<{}: {}>", type_name, docs)),
                None => Value::String(format!("<{}>", type_name)),
            },
        }
    }

    /// Field description to emit, if docs are enabled and it isn't blank.
    fn docs<'d>(&self, description: &'d Option<String>) -> Option<&'d str> {
        if !self.options.include_docs {
            return None;
        }
        description.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// Render an enumeration as `<v1|v2>`, or `<v1: doc|v2>` when any value is described.
///
/// Values without a matching description render bare.
fn render_enum(values: &[String], descriptions: &[String]) -> String {
    let described = descriptions.iter().any(|d| !d.trim().is_empty());
    if !described {
        return format!("<{}>", values.join("|"));
    }

    let rendered: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, value)| match non_blank(descriptions.get(i).map(String::as_str)) {
            Some(doc) => format!("{}: {}", value, doc),
            None => value.clone(),
        })
        .collect();
    format!("<{}>", rendered.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalogue(raw: Value) -> SchemaCatalogue {
        serde_json::from_value(raw).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // === Enum Rendering ===

    #[test]
    fn render_enum_without_descriptions() {
        assert_eq!(render_enum(&strings(&["A", "B"]), &[]), "<A|B>");
    }

    #[test]
    fn render_enum_blank_descriptions_only() {
        assert_eq!(
            render_enum(&strings(&["A", "B"]), &strings(&["", "  "])),
            "<A|B>"
        );
    }

    #[test]
    fn render_enum_partial_descriptions() {
        assert_eq!(
            render_enum(&strings(&["A", "B"]), &strings(&["first", ""])),
            "<A: first|B>"
        );
    }

    #[test]
    fn render_enum_trims_descriptions() {
        assert_eq!(
            render_enum(&strings(&["A"]), &strings(&["  first \n"])),
            "<A: first>"
        );
    }

    #[test]
    fn render_enum_short_description_list_keeps_all_values() {
        assert_eq!(
            render_enum(&strings(&["A", "B", "C"]), &strings(&["first"])),
            "<A: first|B|C>"
        );
    }

    // === Stack Discipline ===

    #[test]
    fn sibling_branches_do_not_see_each_other() {
        let schemas = catalogue(json!({
            "Root": { "properties": {
                "left": { "$ref": "Leaf" },
                "right": { "$ref": "Leaf" }
            }},
            "Leaf": { "properties": { "id": { "type": "string" } } }
        }));
        let options = ResolveOptions::new().start_depth(0);
        let result = resolve("Root", &schemas, &options);
        assert_eq!(
            result,
            json!({ "left": { "id": "<string>" }, "right": { "id": "<string>" } })
        );
    }

    #[test]
    fn missing_schema_resolves_empty() {
        let schemas = SchemaCatalogue::default();
        let options = ResolveOptions::new();
        assert_eq!(resolve("Nope", &schemas, &options), json!({}));
        assert_eq!(resolve("", &schemas, &options), json!({}));
    }

    #[test]
    fn missing_schema_at_max_depth_reports_zero_properties() {
        let schemas = SchemaCatalogue::default();
        let options = ResolveOptions::new().start_depth(0).max_depth(0);
        assert_eq!(
            resolve("Nope", &schemas, &options),
            json!("(0 properties hidden: max recursion exceeded)")
        );
    }

    #[test]
    fn object_docs_skip_placeholders() {
        let schemas = catalogue(json!({
            "Node": { "properties": {
                "parent": { "type": "object", "$ref": "Node", "description": "up" }
            }}
        }));
        let options = ResolveOptions::new().start_depth(0).include_docs(true);
        assert_eq!(
            resolve("Node", &schemas, &options),
            json!({ "parent": "(recursion stopped)" })
        );
    }
}
