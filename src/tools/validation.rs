//! Validate tool call arguments against the declared schema before execution.

use serde_json::Value;

use super::arguments::whole_number;
use super::error::ToolError;

/// Validate tool arguments against a JSON Schema.
///
/// Top-level only: object shape, required fields, property types, `enum`
/// membership and integer `minimum`. Reports the first violation found.
pub fn validate_arguments(args: &Value, schema: &Value) -> Result<(), ToolError> {
    let wants_object = schema.get("type").and_then(Value::as_str) == Some("object");
    if wants_object && !args.is_object() {
        let got = json_type_name(args);
        return Err(invalid(format!("expected object arguments, got {got}")));
    }
    let Some(obj) = args.as_object() else {
        return Ok(());
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if obj.get(name).map_or(true, Value::is_null) {
                return Err(invalid(format!("missing required field '{name}'")));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };
    for (key, value) in obj {
        // Extra fields and explicit nulls for optional fields are tolerated.
        let Some(prop) = properties.get(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        if let Some(expected) = prop.get("type").and_then(Value::as_str) {
            if !value_matches_type(value, expected) {
                let found = json_type_name(value);
                return Err(invalid(format!(
                    "field '{key}' expected type '{expected}', got {found}"
                )));
            }
        }
        if let Some(allowed) = prop.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                let allowed = Value::from(allowed.clone());
                return Err(invalid(format!("field '{key}' must be one of {allowed}")));
            }
        }
        let minimum = prop.get("minimum").and_then(Value::as_f64);
        if let (Some(min), Some(n)) = (minimum, value.as_f64()) {
            if n < min {
                return Err(invalid(format!("field '{key}' must be >= {min}")));
            }
        }
    }

    Ok(())
}

fn invalid(message: String) -> ToolError {
    ToolError::InvalidArguments(message)
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64() || whole_number(value).is_some(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recall_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "limit": { "type": "integer", "minimum": 0 },
                "importance": { "type": "string", "enum": ["low", "medium", "high"] },
            },
            "required": ["query"],
        })
    }

    fn check(args: Value) -> Result<(), ToolError> {
        validate_arguments(&args, &recall_schema())
    }

    fn message(result: Result<(), ToolError>) -> String {
        match result {
            Err(ToolError::InvalidArguments(msg)) => msg,
            other => panic!("expected InvalidArguments, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_object_args() {
        let msg = message(check(json!("hello")));
        assert!(msg.contains("expected object"));
    }

    #[test]
    fn rejects_missing_or_null_required_field() {
        let msg = message(check(json!({})));
        assert!(msg.contains("missing required field 'query'"));

        let msg = message(check(json!({ "query": null })));
        assert!(msg.contains("'query'"));
    }

    #[test]
    fn rejects_wrong_type() {
        let msg = message(check(json!({ "query": "x", "limit": "five" })));
        assert!(msg.contains("expected type 'integer'"));
    }

    #[test]
    fn rejects_fractional_integer_and_negative() {
        assert!(check(json!({ "query": "x", "limit": 2.5 })).is_err());
        assert!(check(json!({ "query": "x", "limit": -1 })).is_err());
    }

    #[test]
    fn accepts_whole_number_floats_as_integers() {
        assert!(check(json!({ "query": "x", "limit": 5.0 })).is_ok());
        assert!(check(json!({ "query": "x", "limit": -1.0 })).is_err());
    }

    #[test]
    fn rejects_value_outside_enum() {
        let msg = message(check(json!({ "query": "x", "importance": "urgent" })));
        assert!(msg.contains("must be one of"));
    }

    #[test]
    fn accepts_valid_args_extra_fields_and_null_optionals() {
        let args = json!({ "query": "x", "limit": 0, "importance": "high", "extra": true });
        assert!(check(args).is_ok());
        assert!(check(json!({ "query": "x", "limit": null })).is_ok());
    }

    #[test]
    fn empty_schema_accepts_anything() {
        assert!(validate_arguments(&json!({ "anything": 42 }), &json!({})).is_ok());
        assert!(validate_arguments(&Value::Null, &json!({})).is_ok());
    }
}
