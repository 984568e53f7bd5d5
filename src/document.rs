//! Typed model of a Discovery document.
//!
//! Only the parts the flattener consumes are modelled: the `schemas` catalogue
//! and the `resources`/`methods` tree. Everything else in the document is ignored.
//! Property and resource order follows the document, so output order is stable.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A parsed Discovery document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub schemas: SchemaCatalogue,
    /// Top-level resource groups, in declared order.
    #[serde(default, deserialize_with = "ordered::deserialize")]
    pub resources: Vec<(String, Resource)>,
    /// Methods declared directly on the API root.
    #[serde(default, deserialize_with = "ordered::deserialize")]
    pub methods: Vec<(String, Method)>,
}

/// Named schema definitions, shared read-only by every resolution.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SchemaCatalogue {
    schemas: HashMap<String, SchemaDefinition>,
}

impl SchemaCatalogue {
    pub fn get(&self, name: &str) -> Option<&SchemaDefinition> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// A named schema: its properties in declared order and an optional description.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default, deserialize_with = "ordered::deserialize")]
    pub properties: Vec<(String, FieldSpec)>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Shape of a single schema property.
///
/// Discovery properties are untyped records; they are classified once here so
/// the resolver can match on a closed set of shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// `{"$ref": "Name"}`
    Ref { target: String },
    /// `{"type": "array", "items": ...}`
    Array {
        items: ItemSpec,
        description: Option<String>,
    },
    /// `{"type": "object"}`, optionally with a `$ref` to expand in place.
    Object {
        target: Option<String>,
        description: Option<String>,
    },
    /// `{"enum": [...], "enumDescriptions": [...]}`
    Enum {
        values: Vec<String>,
        descriptions: Vec<String>,
    },
    /// Anything else; `type_name` is `"unknown"` when the record has no type.
    Primitive {
        type_name: String,
        description: Option<String>,
    },
}

/// Element shape of an array property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSpec {
    Ref(String),
    Primitive(String),
}

const UNKNOWN_TYPE: &str = "unknown";

impl FieldSpec {
    /// Classify a raw property record.
    ///
    /// Precedence: `$ref`, array, object, enum, primitive. An object-typed
    /// record carrying a `$ref` keeps its object shape so its description
    /// can still be attached.
    pub fn from_value(raw: &Value) -> Self {
        let empty = Map::new();
        let record = raw.as_object().unwrap_or(&empty);
        let type_name = record.get("type").and_then(Value::as_str);
        let description = record
            .get("description")
            .and_then(Value::as_str)
            .map(String::from);
        let target = record.get("$ref").map(ref_target);

        match (target, type_name) {
            (Some(target), Some("object")) => FieldSpec::Object {
                target: Some(target),
                description,
            },
            (Some(target), _) => FieldSpec::Ref { target },
            (None, Some("array")) => FieldSpec::Array {
                items: ItemSpec::from_value(record.get("items")),
                description,
            },
            (None, Some("object")) => FieldSpec::Object {
                target: None,
                description,
            },
            (None, _) if record.contains_key("enum") => FieldSpec::Enum {
                values: string_list(record.get("enum")),
                descriptions: string_list(record.get("enumDescriptions")),
            },
            (None, _) => FieldSpec::Primitive {
                type_name: type_name.unwrap_or(UNKNOWN_TYPE).to_string(),
                description,
            },
        }
    }
}

impl ItemSpec {
    fn from_value(raw: Option<&Value>) -> Self {
        let Some(record) = raw.and_then(Value::as_object) else {
            return ItemSpec::Primitive(UNKNOWN_TYPE.to_string());
        };
        match record.get("$ref") {
            Some(target) => ItemSpec::Ref(ref_target(target)),
            None => ItemSpec::Primitive(
                record
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_TYPE)
                    .to_string(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(FieldSpec::from_value(&raw))
    }
}

/// A non-string `$ref` names no schema; it resolves like a missing one.
fn ref_target(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// A resource group: its own methods and nested resources, in declared order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resource {
    #[serde(default, deserialize_with = "ordered::deserialize")]
    pub methods: Vec<(String, Method)>,
    #[serde(default, deserialize_with = "ordered::deserialize")]
    pub resources: Vec<(String, Resource)>,
}

/// A single API method.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub http_method: Option<String>,
    /// Path template relative to the service root, e.g. `files/{fileId}`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub request: Option<SchemaRef>,
    #[serde(default)]
    pub response: Option<SchemaRef>,
}

impl Method {
    /// Returns the schema reference for a direction, if the method declares it.
    pub fn schema_ref(&self, direction: crate::Direction) -> Option<&SchemaRef> {
        match direction {
            crate::Direction::Request => self.request.as_ref(),
            crate::Direction::Response => self.response.as_ref(),
        }
    }
}

/// `{"$ref": "Name"}` on a method's request or response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SchemaRef {
    #[serde(rename = "$ref", default)]
    pub target: Option<String>,
}

/// Deserialize a JSON object into `(key, value)` pairs, keeping document order.
/// `null` reads as no entries.
mod ordered {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        deserializer.deserialize_any(EntriesVisitor(PhantomData))
    }

    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object")
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }
}
