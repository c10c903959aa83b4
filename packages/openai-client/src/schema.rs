//! Strict JSON schemas for OpenAI structured outputs.
//!
//! Schemas are generated from Rust types with `schemars` and then rewritten to
//! satisfy the strict `json_schema` response format:
//!
//! 1. every `$ref` is replaced by its definition (no `definitions` section)
//! 2. every object carries `additionalProperties: false`
//! 3. every property of an object is listed in `required`
//! 4. numeric `format` hints (`double`, `uint32`, ...) are dropped
//!
//! # Example
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use openai_client::StructuredOutput;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct PriceTag {
//!     /// Numeric price shown on the tag
//!     amount: f64,
//! }
//!
//! let schema = PriceTag::openai_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Types usable as a structured-output response.
///
/// Blanket-implemented for every `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Strict-mode schema for this type.
    fn openai_schema() -> Value {
        let mut root = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = match &mut root {
            Value::Object(map) => {
                map.remove("$schema");
                map.remove("definitions")
            }
            _ => None,
        };

        normalize(&mut root, definitions.as_ref());
        root
    }

    /// Schema name, used as the `json_schema.name` of a request.
    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Single recursive pass: resolve refs first, then tighten objects.
fn normalize(value: &mut Value, definitions: Option<&Value>) {
    match value {
        Value::Object(map) => {
            if let Some(resolved) = resolve_ref(map, definitions) {
                *value = resolved;
                normalize(value, definitions);
                return;
            }

            map.remove("format");
            if map.get("type").and_then(Value::as_str) == Some("object") {
                tighten_object(map);
            }

            for child in map.values_mut() {
                normalize(child, definitions);
            }
        }
        Value::Array(items) => {
            for item in items {
                normalize(item, definitions);
            }
        }
        _ => {}
    }
}

/// Look up `#/definitions/<Name>` for an object holding a `$ref`.
fn resolve_ref(map: &Map<String, Value>, definitions: Option<&Value>) -> Option<Value> {
    let name = map.get("$ref")?.as_str()?.strip_prefix("#/definitions/")?;
    definitions?.get(name).cloned()
}

fn tighten_object(map: &mut Map<String, Value>) {
    map.insert("additionalProperties".into(), Value::Bool(false));

    let required: Vec<Value> = match map.get("properties") {
        Some(Value::Object(props)) => props.keys().cloned().map(Value::String).collect(),
        _ => return,
    };
    map.insert("required".into(), Value::Array(required));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct Tag {
        label: String,
        amount: f64,
        note: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    struct Photo {
        tag: Tag,
        visible: bool,
    }

    fn required_of(obj: &Value) -> Vec<&str> {
        obj["required"]
            .as_array()
            .expect("required array")
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    #[test]
    fn test_root_is_strict_object() {
        let schema = Tag::openai_schema();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], Value::Bool(false));
        assert!(schema.get("$schema").is_none());
    }

    #[test]
    fn test_optional_fields_are_still_required() {
        let schema = Tag::openai_schema();
        let required = required_of(&schema);

        assert!(required.contains(&"label"));
        assert!(required.contains(&"amount"));
        assert!(required.contains(&"note"));
    }

    #[test]
    fn test_number_format_is_dropped() {
        let schema = Tag::openai_schema();

        assert_eq!(schema["properties"]["amount"]["type"], "number");
        assert!(schema["properties"]["amount"].get("format").is_none());
    }

    #[test]
    fn test_nested_refs_are_inlined() {
        let schema = Photo::openai_schema();
        let text = serde_json::to_string(&schema).unwrap();

        assert!(schema.get("definitions").is_none());
        assert!(!text.contains("$ref"));

        let tag = &schema["properties"]["tag"];
        assert_eq!(tag["type"], "object");
        assert_eq!(tag["additionalProperties"], Value::Bool(false));
        assert_eq!(required_of(tag).len(), 3);
    }
}
