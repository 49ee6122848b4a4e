//! Typed access to tool call arguments.

use serde_json::{json, Value};

use super::error::ToolError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: Value,
}

impl ToolArguments {
    /// Wrap raw arguments. A JSON-encoded string (as some hosts send) is
    /// decoded; an empty string or `null` becomes `{}`.
    pub fn new(value: Value) -> Self {
        let value = match value {
            Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    json!({})
                } else {
                    serde_json::from_str(trimmed).unwrap_or(Value::String(raw))
                }
            }
            Value::Null => json!({}),
            other => other,
        };
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, ToolError> {
        let missing = || ToolError::InvalidArguments(format!("Missing string argument: {key}"));
        self.get_str_opt(key).ok_or_else(missing)
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Get an optional non-negative integer argument.
    ///
    /// Present but not a non-negative integer is an error, absent is `None`.
    pub fn get_u32_opt(&self, key: &str) -> Result<Option<u32>, ToolError> {
        let Some(value) = self.present(key) else {
            return Ok(None);
        };
        let n = value.as_u64().or_else(|| whole_number(value));
        match n.and_then(|n| u32::try_from(n).ok()) {
            Some(n) => Ok(Some(n)),
            None => {
                let message = format!("Argument {key} must be a non-negative integer");
                Err(ToolError::InvalidArguments(message))
            }
        }
    }

    /// Get an optional float argument.
    pub fn get_f64_opt(&self, key: &str) -> Result<Option<f64>, ToolError> {
        let Some(value) = self.present(key) else {
            return Ok(None);
        };
        match value.as_f64() {
            Some(n) => Ok(Some(n)),
            None => Err(ToolError::InvalidArguments(format!("Argument {key} must be a number"))),
        }
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.value.get(key).filter(|v| !v.is_null())
    }
}

/// A non-negative float with no fractional part, such as `5.0`.
pub(crate) fn whole_number(value: &Value) -> Option<u64> {
    value
        .as_f64()
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= u64::MAX as f64)
        .map(|n| n as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_string_arguments_are_decoded() {
        let args = ToolArguments::new(json!(r#"{"query":"dark mode"}"#));
        assert_eq!(args.get_str("query").unwrap(), "dark mode");
    }

    #[test]
    fn null_and_blank_arguments_become_empty_object() {
        assert_eq!(ToolArguments::new(Value::Null).raw(), &json!({}));
        assert_eq!(ToolArguments::new(json!("  ")).raw(), &json!({}));
    }

    #[test]
    fn missing_string_is_invalid_arguments() {
        let args = ToolArguments::new(json!({}));
        assert!(matches!(
            args.get_str("content"),
            Err(ToolError::InvalidArguments(msg)) if msg.contains("content")
        ));
    }

    #[test]
    fn optional_integer_accepts_absent_and_rejects_negative() {
        let args = ToolArguments::new(json!({ "limit": 3, "bad": -1, "none": null }));
        assert_eq!(args.get_u32_opt("limit").unwrap(), Some(3));
        assert_eq!(args.get_u32_opt("missing").unwrap(), None);
        assert_eq!(args.get_u32_opt("none").unwrap(), None);
        assert!(args.get_u32_opt("bad").is_err());
    }

    #[test]
    fn optional_integer_accepts_whole_floats() {
        let args = ToolArguments::new(json!({ "limit": 5.0, "half": 2.5, "neg": -1.0 }));
        assert_eq!(args.get_u32_opt("limit").unwrap(), Some(5));
        assert!(args.get_u32_opt("half").is_err());
        assert!(args.get_u32_opt("neg").is_err());
    }

    #[test]
    fn optional_float_accepts_integers() {
        let args = ToolArguments::new(json!({ "rate": 1 }));
        assert_eq!(args.get_f64_opt("rate").unwrap(), Some(1.0));
    }
}
