use rmcp::model::JsonObject;
use serde_json::Value;

use crate::errors::{ServerError, ToolError};

/// Checks tool arguments against the tool's input schema.
///
/// Each top-level property gets its own compiled validator, so a failure can always be
/// attributed to the argument that caused it.
pub(crate) struct ArgumentValidator {
    required: Vec<String>,
    properties: Vec<(String, jsonschema::Validator)>,
    integers: Vec<String>,
}

impl ArgumentValidator {
    pub(crate) fn new(tool: &str, schema: &JsonObject) -> Result<Self, ServerError> {
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|required| {
                required
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let properties = match schema.get("properties").and_then(Value::as_object) {
            Some(properties) => properties
                .iter()
                .map(|(name, property)| {
                    jsonschema::validator_for(property)
                        .map(|validator| (name.clone(), validator))
                        .map_err(|error| ServerError::ToolSchema {
                            tool: tool.to_string(),
                            message: format!("{name}: {error}"),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let integers = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .filter(|(_, property)| is_integer(property))
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            required,
            properties,
            integers,
        })
    }

    /// Validate arguments, reporting the first offending field.
    ///
    /// JSON Schema counts `5.0` as an integer, so integer arguments written with a zero
    /// fraction are rewritten as integers before they reach the tool input.
    pub(crate) fn validate(&self, mut arguments: JsonObject) -> Result<JsonObject, ToolError> {
        if let Some(missing) = self
            .required
            .iter()
            .find(|name| arguments.get(name.as_str()).is_none_or(Value::is_null))
        {
            return Err(ToolError::MissingArgument(missing.clone()));
        }

        for (name, validator) in &self.properties {
            if let Some(value) = arguments.get(name) {
                validator
                    .validate(value)
                    .map_err(|error| ToolError::invalid_argument(name, error.to_string()))?;
            }
        }

        for name in &self.integers {
            if let Some(value) = arguments.get_mut(name) {
                if let Some(whole) = whole_number(value) {
                    *value = whole;
                }
            }
        }

        Ok(arguments)
    }
}

/// Whether a property schema is `"type": "integer"`, possibly alongside `"null"`
fn is_integer(property: &Value) -> bool {
    match property.get("type") {
        Some(Value::String(kind)) => kind == "integer",
        Some(Value::Array(kinds)) => kinds.iter().any(|kind| kind == "integer"),
        _ => false,
    }
}

/// A float with no fractional part as an integer value
fn whole_number(value: &Value) -> Option<Value> {
    let number = value.as_f64().filter(|_| value.is_f64())?;
    if number.fract() != 0.0 {
        return None;
    }
    if number >= 0.0 && number <= u64::MAX as f64 {
        Some(Value::from(number as u64))
    } else if number >= i64::MIN as f64 {
        Some(Value::from(number as i64))
    } else {
        None
    }
}
