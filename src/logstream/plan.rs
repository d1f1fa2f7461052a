//! Plan computation: what applying a configuration would change.

use std::collections::BTreeSet;

use serde_json::{json, Value};

use super::model::LogStreamConfig;
use super::schema::resource_schema;
use crate::error::ProviderError;
use crate::schema::Schema;
use crate::types::{AttributeChange, PlanResult};

/// Attributes the server fills in; they never show up as changes.
const COMPUTED_PATHS: [&str; 3] = [
    "id",
    "sink.aws_partner_event_source",
    "sink.azure_partner_topic",
];

/// Shown in place of a sensitive value in a change.
pub const SENSITIVE_VALUE: &str = "(sensitive value)";

/// Plan a create (`prior` is `None`), an update, or a destroy (`proposed` is null).
pub fn plan(prior: Option<Value>, proposed: Value) -> Result<PlanResult, ProviderError> {
    let prior = match prior {
        Some(value) if !value.is_null() => Some(LogStreamConfig::from_value(value)?),
        _ => None,
    };

    if proposed.is_null() {
        return Ok(match prior {
            Some(prior) => PlanResult::with_changes(
                Value::Null,
                vec![AttributeChange::removed("id", json!(prior.id))],
                false,
            ),
            None => PlanResult::no_change(Value::Null),
        });
    }

    let mut planned = LogStreamConfig::from_value(proposed)?;

    let schema = resource_schema();

    let Some(prior) = prior else {
        planned.id = None;
        let planned_state = planned.to_value()?;
        let mut changes = diff(&Value::Null, &planned_state);
        mask_sensitive(&schema, &mut changes);
        return Ok(PlanResult::with_changes(planned_state, changes, false));
    };

    let configured_status = planned.status.clone();
    planned.id = prior.id.clone();
    if planned.status().is_none() {
        planned.status = prior.status.clone();
    }
    if planned.stream_type.eq_ignore_ascii_case(&prior.stream_type) {
        planned.stream_type = prior.stream_type.clone();
    }

    let mut changes = diff(&prior.to_value()?, &planned.to_value()?);
    changes.retain(|change| !COMPUTED_PATHS.contains(&change.path.as_str()));

    let replace_paths = replacement_paths(&schema);
    let requires_replace = changes
        .iter()
        .any(|change| replace_paths.contains(&change.path));

    if requires_replace {
        planned.id = None;
        planned.status = configured_status;
    } else {
        planned.sink.retain_computed(&prior.sink);
    }
    mask_sensitive(&schema, &mut changes);

    Ok(PlanResult::with_changes(
        planned.to_value()?,
        changes,
        requires_replace,
    ))
}

/// Dotted paths of every force-new attribute, nested blocks included.
fn replacement_paths(schema: &Schema) -> Vec<String> {
    let top = schema.block.force_new_attributes().map(str::to_string);
    let nested = schema.block.blocks.iter().flat_map(|(name, nested)| {
        nested
            .block
            .force_new_attributes()
            .map(move |attr| format!("{}.{}", name, attr))
    });
    top.chain(nested).collect()
}

/// Force-new attributes whose value differs between two configurations.
///
/// A `type` that only differs in letter case does not count.
pub fn replacement_changes(
    prior: &LogStreamConfig,
    planned: &LogStreamConfig,
) -> Result<Vec<String>, ProviderError> {
    let replace_paths = replacement_paths(&resource_schema());
    let same_type = prior.stream_type.eq_ignore_ascii_case(&planned.stream_type);

    Ok(diff(&prior.to_value()?, &planned.to_value()?)
        .into_iter()
        .map(|change| change.path)
        .filter(|path| replace_paths.contains(path))
        .filter(|path| !(same_type && path == "type"))
        .collect())
}

/// Dotted paths of every sensitive attribute, nested blocks included.
fn sensitive_paths(schema: &Schema) -> Vec<String> {
    let top = schema.block.sensitive_attributes().map(str::to_string);
    let nested = schema.block.blocks.iter().flat_map(|(name, nested)| {
        nested
            .block
            .sensitive_attributes()
            .map(move |attr| format!("{}.{}", name, attr))
    });
    top.chain(nested).collect()
}

fn mask_sensitive(schema: &Schema, changes: &mut [AttributeChange]) {
    let sensitive = sensitive_paths(schema);
    for change in changes.iter_mut().filter(|c| sensitive.contains(&c.path)) {
        for value in [&mut change.before, &mut change.after].into_iter().flatten() {
            *value = Value::String(SENSITIVE_VALUE.to_string());
        }
    }
}

fn diff(before: &Value, after: &Value) -> Vec<AttributeChange> {
    let mut changes = Vec::new();
    diff_into(before, after, "", &mut changes);
    changes
}

fn diff_into(before: &Value, after: &Value, prefix: &str, changes: &mut Vec<AttributeChange>) {
    let keys: BTreeSet<&String> = before
        .as_object()
        .into_iter()
        .chain(after.as_object())
        .flat_map(|map| map.keys())
        .collect();

    for key in keys {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        let old = before.get(key.as_str()).filter(|v| is_meaningful(v));
        let new = after.get(key.as_str()).filter(|v| is_meaningful(v));

        match (old, new) {
            (Some(Value::Object(_)), _) | (_, Some(Value::Object(_))) => diff_into(
                old.unwrap_or(&Value::Null),
                new.unwrap_or(&Value::Null),
                &path,
                changes,
            ),
            (None, Some(new)) => changes.push(AttributeChange::added(path, new.clone())),
            (Some(old), None) => changes.push(AttributeChange::removed(path, old.clone())),
            (Some(old), Some(new)) if old != new => {
                changes.push(AttributeChange::modified(path, old.clone(), new.clone()))
            },
            _ => {},
        }
    }
}

/// Zero values count as unset.
fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_config() -> Value {
        json!({
            "name": "audit",
            "type": "http",
            "sink": {
                "http_endpoint": "https://example.com/logs",
                "http_content_format": "JSONLINES",
                "http_content_type": "application/json",
                "http_authorization": "Bearer t"
            }
        })
    }

    fn http_state() -> Value {
        let mut config = LogStreamConfig::from_value(http_config()).unwrap();
        config.id = Some("lst_1".to_string());
        config.status = Some("active".to_string());
        config.to_value().unwrap()
    }

    fn paths(result: &PlanResult) -> Vec<&str> {
        result.changes.iter().map(|c| c.path.as_str()).collect()
    }

    #[test]
    fn test_plan_create() {
        let result = plan(None, http_config()).unwrap();

        assert!(!result.requires_replace);
        assert_eq!(result.planned_state["id"], Value::Null);
        assert_eq!(result.planned_state["sink"]["datadog_region"], "");
        assert_eq!(
            paths(&result),
            vec![
                "name",
                "sink.http_authorization",
                "sink.http_content_format",
                "sink.http_content_type",
                "sink.http_endpoint",
                "type"
            ]
        );
        assert!(result.changes.iter().all(|c| c.before.is_none()));

        let authorization = &result.changes[1];
        assert_eq!(authorization.after, Some(json!(SENSITIVE_VALUE)));
        assert_eq!(result.changes[4].after, Some(json!("https://example.com/logs")));
        assert_eq!(result.planned_state["sink"]["http_authorization"], "Bearer t");
    }

    #[test]
    fn test_plan_masks_rotated_secret() {
        let mut config = http_config();
        config["sink"]["http_authorization"] = json!("Bearer rotated");
        let result = plan(Some(http_state()), config).unwrap();

        assert_eq!(paths(&result), vec!["sink.http_authorization"]);
        assert_eq!(result.changes[0].before, Some(json!(SENSITIVE_VALUE)));
        assert_eq!(result.changes[0].after, Some(json!(SENSITIVE_VALUE)));
    }

    #[test]
    fn test_replacement_changes() {
        let prior = LogStreamConfig::from_value(json!({
            "name": "bridge",
            "type": "eventbridge",
            "sink": {"aws_account_id": "999999999999", "aws_region": "us-west-2"}
        }))
        .unwrap();

        let mut planned = prior.clone();
        planned.name = "renamed".to_string();
        planned.stream_type = "EventBridge".to_string();
        assert!(replacement_changes(&prior, &planned).unwrap().is_empty());

        planned.sink.aws_region = "eu-west-1".to_string();
        assert_eq!(
            replacement_changes(&prior, &planned).unwrap(),
            vec!["sink.aws_region".to_string()]
        );
    }

    #[test]
    fn test_plan_no_change_keeps_server_values() {
        let result = plan(Some(http_state()), http_config()).unwrap();

        assert!(result.is_empty(), "{:?}", result.changes);
        assert_eq!(result.planned_state["id"], "lst_1");
        assert_eq!(result.planned_state["status"], "active");
    }

    #[test]
    fn test_plan_type_case_is_not_a_change() {
        let mut config = http_config();
        config["type"] = json!("HTTP");
        let result = plan(Some(http_state()), config).unwrap();

        assert!(result.is_empty());
        assert_eq!(result.planned_state["type"], "http");
    }

    #[test]
    fn test_plan_update_in_place() {
        let mut config = http_config();
        config["status"] = json!("paused");
        config["sink"]["http_endpoint"] = json!("https://example.com/v2");
        let result = plan(Some(http_state()), config).unwrap();

        assert!(!result.requires_replace);
        assert_eq!(paths(&result), vec!["sink.http_endpoint", "status"]);
        assert_eq!(result.changes[1].before, Some(json!("active")));
        assert_eq!(result.planned_state["id"], "lst_1");
    }

    #[test]
    fn test_plan_type_change_requires_replace() {
        let config = json!({
            "name": "audit",
            "type": "sumo",
            "sink": {"sumo_source_address": "https://sumo"}
        });
        let result = plan(Some(http_state()), config).unwrap();

        assert!(result.requires_replace);
        assert_eq!(result.planned_state["id"], Value::Null);
        assert_eq!(result.planned_state["status"], Value::Null);
        assert!(paths(&result).contains(&"type"));
    }

    #[test]
    fn test_plan_force_new_sink_field_requires_replace() {
        let state = json!({
            "id": "lst_2",
            "name": "bridge",
            "type": "eventbridge",
            "status": "active",
            "sink": {
                "aws_account_id": "999999999999",
                "aws_region": "us-west-2",
                "aws_partner_event_source": "aws.partner/auth0.com/lst_2/auth0.logs"
            }
        });
        let config = json!({
            "name": "bridge",
            "type": "eventbridge",
            "sink": {"aws_account_id": "999999999999", "aws_region": "eu-west-1"}
        });
        let result = plan(Some(state.clone()), config).unwrap();
        assert!(result.requires_replace);
        assert_eq!(paths(&result), vec!["sink.aws_region"]);

        let unchanged = json!({
            "name": "bridge",
            "type": "eventbridge",
            "sink": {"aws_account_id": "999999999999", "aws_region": "us-west-2"}
        });
        let result = plan(Some(state), unchanged).unwrap();
        assert!(result.is_empty());
        assert_eq!(
            result.planned_state["sink"]["aws_partner_event_source"],
            "aws.partner/auth0.com/lst_2/auth0.logs"
        );
    }

    #[test]
    fn test_plan_destroy() {
        let result = plan(Some(http_state()), Value::Null).unwrap();
        assert_eq!(result.planned_state, Value::Null);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].before, Some(json!("lst_1")));

        let nothing = plan(None, Value::Null).unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_replacement_paths() {
        let paths = replacement_paths(&resource_schema());
        assert!(paths.contains(&"type".to_string()));
        assert!(paths.contains(&"sink.azure_region".to_string()));
        assert!(!paths.contains(&"sink.http_endpoint".to_string()));
    }
}
