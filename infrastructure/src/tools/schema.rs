//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing the function
//! declaration shape the model API expects:
//! `{name, description, parameters: {type: "object", properties, required}}`.

use confine_application::ports::tool_schema::ToolSchemaPort;
use confine_domain::tool::entities::{ParamType, ToolDefinition};
use serde_json::{Map, Value, json};

/// Converts [`ToolDefinition`]s to JSON Schema.
///
/// Type mapping:
/// - `String` → `"string"`
/// - `Integer` → `"integer"`
/// - `Boolean` → `"boolean"`
/// - `StringArray` → `{"type": "array", "items": {"type": "string"}}`
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let mut prop = Map::new();
            prop.insert("type".to_string(), json!(param.param_type.as_schema_type()));
            if param.param_type == ParamType::StringArray {
                prop.insert("items".to_string(), json!({ "type": "string" }));
            }
            prop.insert("description".to_string(), json!(param.description));
            properties.insert(param.name.clone(), Value::Object(prop));

            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}
