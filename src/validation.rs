//! Schema validation helpers.
//!
//! This module validates a `serde_json::Value` attribute bag against a
//! [`Schema`] and reports every problem as a [`Diagnostic`] carrying the
//! dotted path of the offending attribute.
//!
//! # Example
//!
//! ```
//! use auth0_log_stream_provider::schema::{AllowedValues, Attribute, Schema};
//! use auth0_log_stream_provider::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("name", Attribute::required_string())
//!     .with_attribute(
//!         "status",
//!         Attribute::optional_computed_string()
//!             .with_allowed_values(AllowedValues::exact(&["active", "paused"])),
//!     );
//!
//! assert!(validate(&schema, &json!({"name": "audit"})).is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"name": "audit", "status": "stopped"}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("status".to_string()));
//! ```

use crate::schema::{Attribute, AttributeType, Block, Diagnostic, NestedBlock, Schema};
use serde_json::{Map, Value};

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any validation errors found.
/// An empty list means the value is valid.
///
/// # Validation Rules
///
/// - Required attributes must be present, non-null and not an empty string
/// - Computed-only attributes are skipped (provider sets these)
/// - Attribute types must match the schema
/// - String values must be one of the attribute's allowed values, if any
/// - Attributes listed in `required_with` must be set whenever the owner is
/// - Required nested blocks must be present; nested blocks are validated recursively
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_block(&schema.block, value, "", &mut diagnostics);
    diagnostics
}

/// Validate a JSON value against a schema, returning Ok if valid or Err with diagnostics.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a JSON value is valid against a schema.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

/// Whether an attribute counts as set in configuration.
///
/// Absent, null and empty-string values are all treated as unset.
pub fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn validate_block(block: &Block, value: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return,
        _ => {
            let mut diag = Diagnostic::error("Expected object")
                .with_detail(format!("Got {}", value_type_name(value)));
            if !path.is_empty() {
                diag = diag.with_attribute(path);
            }
            diagnostics.push(diag);
            return;
        },
    };

    for (name, attr) in &block.attributes {
        let attr_path = join_path(path, name);
        validate_attribute(attr, obj.get(name), &attr_path, diagnostics);
        validate_required_with(attr, obj, path, &attr_path, diagnostics);
    }

    for (name, nested) in &block.blocks {
        let block_path = join_path(path, name);
        validate_nested_block(nested, obj.get(name), &block_path, diagnostics);
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Computed-only attributes are set by the provider
    if attr.flags.computed && !attr.flags.optional && !attr.flags.required {
        return;
    }

    if !is_set(value) {
        if attr.flags.required {
            diagnostics.push(
                Diagnostic::error(format!("Missing required attribute '{}'", path))
                    .with_detail("This attribute is required and must be provided")
                    .with_attribute(path),
            );
        }
        return;
    }

    if let Some(v) = value {
        let before = diagnostics.len();
        validate_attribute_type(&attr.attr_type, v, path, diagnostics);
        if diagnostics.len() == before {
            validate_allowed_values(attr, v, path, diagnostics);
        }
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        },
        AttributeType::Number => {
            if !value.is_number() {
                diagnostics.push(type_error(path, "number", value));
            }
        },
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        },
        AttributeType::List(element_type) => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "list", value));
            }
        },
        AttributeType::Map(value_type) => {
            if let Some(obj) = value.as_object() {
                for (key, val) in obj {
                    let key_path = format!("{}.{}", path, key);
                    validate_attribute_type(value_type, val, &key_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "map", value));
            }
        },
    }
}

fn validate_allowed_values(
    attr: &Attribute,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let (Some(allowed), Some(s)) = (&attr.allowed_values, value.as_str()) else {
        return;
    };
    if !allowed.accepts(s) {
        diagnostics.push(
            Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                .with_detail(format!(
                    "Expected one of {}, got `{}`",
                    allowed.describe(),
                    s
                ))
                .with_attribute(path),
        );
    }
}

fn validate_required_with(
    attr: &Attribute,
    obj: &Map<String, Value>,
    block_path: &str,
    attr_path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if attr.required_with.is_empty() || !is_set(obj.get(last_segment(attr_path))) {
        return;
    }

    let missing: Vec<String> = attr
        .required_with
        .iter()
        .filter(|sibling| !is_set(obj.get(sibling.as_str())))
        .map(|sibling| join_path(block_path, sibling))
        .collect();

    if !missing.is_empty() {
        diagnostics.push(
            Diagnostic::error(format!("Missing required argument for '{}'", attr_path))
                .with_detail(format!(
                    "\"{}\": all of `{}` must be specified",
                    attr_path,
                    missing.join(",")
                ))
                .with_attribute(attr_path),
        );
    }
}

fn validate_nested_block(
    nested: &NestedBlock,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match value {
        None | Some(Value::Null) => {
            if nested.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required block '{}'", path))
                        .with_detail("Exactly one block is required")
                        .with_attribute(path),
                );
            }
        },
        Some(Value::Array(items)) => match items.as_slice() {
            [] => validate_nested_block(nested, None, path, diagnostics),
            [item] => validate_block(&nested.block, item, path, diagnostics),
            _ => diagnostics.push(
                Diagnostic::error(format!(
                    "Block '{}' allows at most 1 item(s), got {}",
                    path,
                    items.len()
                ))
                .with_detail("Expected a single object or a one-item list")
                .with_attribute(path),
            ),
        },
        Some(v) => validate_block(&nested.block, v, path, diagnostics),
    }
}

// Helper functions

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!(
            "Expected {}, got {}",
            expected,
            value_type_name(got)
        ))
        .with_attribute(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AllowedValues, Attribute, AttributeFlags, Block, NestedBlock, Schema};
    use serde_json::json;

    #[test]
    fn test_validate_required_string() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(validate(&schema, &json!({"name": "test"})).is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("name".to_string()));

        assert_eq!(validate(&schema, &json!({"name": null})).len(), 1);
        assert_eq!(validate(&schema, &json!({"name": ""})).len(), 1);

        let diagnostics = validate(&schema, &json!({"name": 123}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_computed_attribute_skipped() {
        let schema = Schema::v0().with_attribute("id", Attribute::computed_string());

        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"id": 123})).is_empty());
    }

    #[test]
    fn test_validate_bool() {
        let schema = Schema::v0().with_attribute("secure", Attribute::optional_bool());

        assert!(validate(&schema, &json!({"secure": true})).is_empty());
        assert!(validate(&schema, &json!({"secure": false})).is_empty());
        assert_eq!(validate(&schema, &json!({"secure": "true"})).len(), 1);
    }

    #[test]
    fn test_validate_allowed_values() {
        let schema = Schema::v0()
            .with_attribute(
                "type",
                Attribute::required_string()
                    .with_allowed_values(AllowedValues::ignore_case(&["http", "sumo"])),
            )
            .with_attribute(
                "status",
                Attribute::optional_computed_string()
                    .with_allowed_values(AllowedValues::exact(&["active", "paused"])),
            );

        assert!(validate(&schema, &json!({"type": "HTTP"})).is_empty());
        assert!(validate(&schema, &json!({"type": "http", "status": ""})).is_empty());

        let diagnostics = validate(&schema, &json!({"type": "kafka"}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("type".to_string()));
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("`http`, `sumo`"));

        let diagnostics = validate(&schema, &json!({"type": "http", "status": "Active"}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("status".to_string()));
    }

    #[test]
    fn test_validate_list_of_maps() {
        let schema = Schema::v0().with_attribute(
            "filters",
            Attribute::new(
                AttributeType::list_of_string_maps(),
                AttributeFlags::optional(),
            ),
        );

        assert!(validate(
            &schema,
            &json!({"filters": [{"type": "category", "name": "auth.login.fail"}]})
        )
        .is_empty());
        assert!(validate(&schema, &json!({"filters": []})).is_empty());

        let diagnostics = validate(&schema, &json!({"filters": [{"type": 1}]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("filters.0.type".to_string()));

        let diagnostics = validate(&schema, &json!({"filters": "category"}));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_validate_required_with() {
        let schema = Schema::v0().with_block(
            "sink",
            NestedBlock::single(
                Block::new()
                    .with_attribute(
                        "datadog_region",
                        Attribute::optional_string().with_required_with(&["datadog_api_key"]),
                    )
                    .with_attribute(
                        "datadog_api_key",
                        Attribute::optional_string().with_required_with(&["datadog_region"]),
                    ),
            ),
        );

        assert!(validate(
            &schema,
            &json!({"sink": {"datadog_region": "eu", "datadog_api_key": "k"}})
        )
        .is_empty());
        assert!(validate(&schema, &json!({"sink": {}})).is_empty());

        let diagnostics = validate(&schema, &json!({"sink": {"datadog_region": "eu"}}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("sink.datadog_region".to_string())
        );
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("sink.datadog_api_key"));

        // Empty strings count as unset on both sides
        let diagnostics = validate(
            &schema,
            &json!({"sink": {"datadog_region": "", "datadog_api_key": "k"}}),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("sink.datadog_api_key".to_string())
        );
    }

    #[test]
    fn test_validate_nested_block() {
        let schema = Schema::v0().with_block(
            "sink",
            NestedBlock::single(Block::new().with_attribute("splunk_secure", Attribute::optional_bool()))
                .required(),
        );

        assert!(validate(&schema, &json!({"sink": {"splunk_secure": true}})).is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Missing required block"));

        let diagnostics = validate(&schema, &json!({"sink": {"splunk_secure": "yes"}}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("sink.splunk_secure".to_string())
        );

        let diagnostics = validate(&schema, &json!({"sink": [{}, {}]}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("at most 1"));
    }

    #[test]
    fn test_validate_nested_block_as_list() {
        let schema = Schema::v0().with_block(
            "sink",
            NestedBlock::single(Block::new().with_attribute("splunk_secure", Attribute::optional_bool()))
                .required(),
        );

        assert!(validate(&schema, &json!({"sink": [{"splunk_secure": true}]})).is_empty());

        let diagnostics = validate(&schema, &json!({"sink": [{"splunk_secure": "yes"}]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("sink.splunk_secure".to_string())
        );

        let diagnostics = validate(&schema, &json!({"sink": []}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Missing required block"));
    }

    #[test]
    fn test_validate_multiple_errors() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string())
            .with_attribute("type", Attribute::required_string())
            .with_attribute("secure", Attribute::optional_bool());

        let diagnostics = validate(&schema, &json!({"name": 123, "secure": "yes"}));
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_is_valid_and_result_helpers() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(is_valid(&schema, &json!({"name": "test"})));
        assert!(!is_valid(&schema, &json!({})));

        assert!(validate_result(&schema, &json!({"name": "test"})).is_ok());
        assert_eq!(validate_result(&schema, &json!({})).unwrap_err().len(), 1);
    }

    #[test]
    fn test_is_set() {
        assert!(!is_set(None));
        assert!(!is_set(Some(&Value::Null)));
        assert!(!is_set(Some(&json!(""))));
        assert!(is_set(Some(&json!("x"))));
        assert!(is_set(Some(&json!(false))));
        assert!(is_set(Some(&json!([]))));
    }

    #[test]
    fn test_validate_root_not_object() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        let diagnostics = validate(&schema, &json!("not an object"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Expected object"));
    }
}
