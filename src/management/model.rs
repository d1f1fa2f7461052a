//! Wire types for the `/api/v2/log-streams` endpoints.
//!
//! Every field is optional so a request only carries what the caller set.
//! Absent fields are skipped on serialization, never sent as empty strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A log stream as sent to and returned by the management API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStream {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sink provider, one of the values in [`crate::logstream::StreamType`].
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub stream_type: Option<String>,
    /// `active`, `paused` or `suspended`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Event filters, e.g. `{"type": "category", "name": "auth.login.fail"}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<BTreeMap<String, String>>>,
    /// Sink configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink: Option<Sink>,
}

impl LogStream {
    /// A request that only changes the status of a stream.
    pub fn status_only(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    /// The id, or an empty string when the server has not assigned one.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// The status, or an empty string when absent.
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or_default()
    }
}

/// Sink settings for every provider, flattened into one object.
///
/// Field names mirror the API's camelCase keys.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_partner_event_source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_resource_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_partner_topic: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_content_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_authorization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_custom_headers: Option<Vec<BTreeMap<String, String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datadog_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datadog_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunk_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunk_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunk_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunk_secure: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sumo_source_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixpanel_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixpanel_project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixpanel_service_account_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixpanel_service_account_password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_write_key: Option<String>,
}
