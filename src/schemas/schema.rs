use schemars::{gen::SchemaSettings, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::{any::type_name, sync::Arc};

/// Cached JSON schema handle associated with a response type.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    type_name: &'static str,
    schema_json: Arc<Value>,
}

impl SchemaHandle {
    /// Generate a self-contained draft-07 schema for `T`.
    ///
    /// Subschemas are inlined because neither provider resolves `$ref`.
    pub fn generate<T: JsonSchema>(schema_name: &'static str) -> Self {
        let generator = SchemaSettings::draft07()
            .with(|settings| {
                settings.inline_subschemas = true;
                settings.option_add_null_type = false;
            })
            .into_generator();
        let root = generator.into_root_schema_for::<T>();
        let schema_json = serde_json::to_value(root).unwrap_or_else(|err| {
            panic!("failed to serialize schema for {}: {}", type_name::<T>(), err)
        });

        Self {
            schema_name,
            type_name: type_name::<T>(),
            schema_json: Arc::new(schema_json),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    /// Schema in the OpenAPI subset accepted by Gemini's `responseSchema`.
    pub fn to_gemini_schema(&self) -> Value {
        let mut value = self.schema_json().clone();
        strip_fields(&mut value, &["$schema", "title", "definitions", "additionalProperties"]);
        uppercase_types(&mut value);
        value
    }

    /// Schema for OpenAI-style `json_schema` response formats in strict mode.
    pub fn to_strict_json_schema(&self) -> Value {
        let mut value = self.schema_json().clone();
        strip_fields(&mut value, &["$schema", "title", "definitions"]);
        close_objects(&mut value);
        value
    }
}

/// A type the model is asked to produce as its JSON answer.
pub trait ResponseSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

fn strip_fields(value: &mut Value, fields: &[&str]) {
    match value {
        Value::Object(map) => {
            for field in fields {
                map.remove(*field);
            }
            for nested in map.values_mut() {
                strip_fields(nested, fields);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                strip_fields(item, fields);
            }
        }
        _ => {}
    }
}

fn uppercase_types(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(kind)) = map.get_mut("type") {
                *kind = kind.to_uppercase();
            }
            for (key, nested) in map.iter_mut() {
                // property names live under `properties`, never rename those keys
                if key == "properties" {
                    if let Value::Object(props) = nested {
                        props.values_mut().for_each(uppercase_types);
                    }
                } else {
                    uppercase_types(nested);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(uppercase_types),
        _ => {}
    }
}

fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.contains_key("properties") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                ensure_all_required(map);
            }
            for nested in map.values_mut() {
                close_objects(nested);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}

fn ensure_all_required(map: &mut Map<String, Value>) {
    let Some(Value::Object(props)) = map.get("properties") else {
        return;
    };
    let names: Vec<Value> = props.keys().cloned().map(Value::String).collect();
    map.insert("required".to_string(), Value::Array(names));
}
