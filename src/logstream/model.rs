//! Typed form of the `auth0_log_stream` attribute bag.
//!
//! [`LogStreamConfig`] and [`SinkBlock`] mirror the schema field for field,
//! with empty strings standing in for unset values. [`Sink`] is the
//! validated view of a sink block: exactly one provider's settings.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;
use crate::management;

/// The sink provider of a log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    /// Amazon EventBridge.
    EventBridge,
    /// Azure Event Grid.
    EventGrid,
    /// Generic HTTP webhook.
    Http,
    /// Datadog.
    Datadog,
    /// Splunk.
    Splunk,
    /// Sumo Logic.
    Sumo,
    /// Mixpanel.
    Mixpanel,
    /// Segment.
    Segment,
}

impl StreamType {
    /// Every stream type, in documentation order.
    pub const ALL: [StreamType; 8] = [
        StreamType::EventBridge,
        StreamType::EventGrid,
        StreamType::Http,
        StreamType::Datadog,
        StreamType::Splunk,
        StreamType::Sumo,
        StreamType::Mixpanel,
        StreamType::Segment,
    ];

    /// The API name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamType::EventBridge => "eventbridge",
            StreamType::EventGrid => "eventgrid",
            StreamType::Http => "http",
            StreamType::Datadog => "datadog",
            StreamType::Splunk => "splunk",
            StreamType::Sumo => "sumo",
            StreamType::Mixpanel => "mixpanel",
            StreamType::Segment => "segment",
        }
    }

    /// API names of every type.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(StreamType::as_str).collect()
    }

    /// Whether the sink of this type can be changed without replacing the stream.
    pub fn sink_is_mutable(&self) -> bool {
        !matches!(self, StreamType::EventBridge | StreamType::EventGrid)
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamType {
    type Err = ProviderError;

    /// Parses a type name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ProviderError::Validation(format!(
                    "unknown log stream type `{}`, expected one of: {}",
                    s,
                    Self::names().join(", ")
                ))
            })
    }
}

/// Accepted values of `status`.
pub const STATUS_VALUES: [&str; 3] = ["active", "paused", "suspended"];
/// Accepted values of `sink.http_content_format`.
pub const HTTP_CONTENT_FORMATS: [&str; 3] = ["JSONLINES", "JSONARRAY", "JSONOBJECT"];
/// Accepted values of `sink.datadog_region`.
pub const DATADOG_REGIONS: [&str; 4] = ["us", "eu", "us3", "us5"];
/// Accepted values of `sink.mixpanel_region`.
pub const MIXPANEL_REGIONS: [&str; 2] = ["us", "eu"];

/// Sink attributes the API never returns in plaintext.
pub const SENSITIVE_SINK_FIELDS: [&str; 5] = [
    "http_authorization",
    "datadog_api_key",
    "splunk_token",
    "mixpanel_service_account_password",
    "segment_write_key",
];

/// The `auth0_log_stream` attribute bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogStreamConfig {
    /// Server-assigned id; `None` before creation.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Sink provider as written in configuration (any letter case).
    #[serde(rename = "type")]
    pub stream_type: String,
    /// Status; `None` leaves it to the server.
    pub status: Option<String>,
    /// Event filters; empty delivers all events.
    pub filters: Vec<BTreeMap<String, String>>,
    /// The sink block.
    pub sink: SinkBlock,
}

impl LogStreamConfig {
    /// Decode an attribute bag. Null values are treated as unset.
    pub fn from_value(value: Value) -> Result<Self, ProviderError> {
        Ok(serde_json::from_value(strip_nulls(single_sink(value)))?)
    }

    /// Encode back into an attribute bag.
    pub fn to_value(&self) -> Result<Value, ProviderError> {
        Ok(serde_json::to_value(self)?)
    }

    /// The id, if one has been assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The configured status, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    /// The parsed stream type.
    pub fn stream_type(&self) -> Result<StreamType, ProviderError> {
        self.stream_type.parse()
    }
}

/// The `sink` block: every provider's fields side by side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct SinkBlock {
    pub aws_account_id: String,
    pub aws_region: String,
    pub aws_partner_event_source: String,

    pub azure_subscription_id: String,
    pub azure_resource_group: String,
    pub azure_region: String,
    pub azure_partner_topic: String,

    pub http_content_format: String,
    pub http_content_type: String,
    pub http_endpoint: String,
    pub http_authorization: String,
    pub http_custom_headers: Vec<BTreeMap<String, String>>,

    pub datadog_region: String,
    pub datadog_api_key: String,

    pub splunk_domain: String,
    pub splunk_token: String,
    pub splunk_port: String,
    pub splunk_secure: bool,

    pub sumo_source_address: String,

    pub mixpanel_region: String,
    pub mixpanel_project_id: String,
    pub mixpanel_service_account_username: String,
    pub mixpanel_service_account_password: String,

    pub segment_write_key: String,
}

impl SinkBlock {
    /// The providers whose configurable fields are set in this block.
    ///
    /// Computed fields and `splunk_secure` do not mark a provider as populated.
    pub fn populated(&self) -> Vec<StreamType> {
        fn any(fields: &[&String]) -> bool {
            fields.iter().any(|f| !f.is_empty())
        }

        let mut kinds = Vec::new();
        if any(&[&self.aws_account_id, &self.aws_region]) {
            kinds.push(StreamType::EventBridge);
        }
        if any(&[
            &self.azure_subscription_id,
            &self.azure_resource_group,
            &self.azure_region,
        ]) {
            kinds.push(StreamType::EventGrid);
        }
        if any(&[
            &self.http_endpoint,
            &self.http_content_format,
            &self.http_content_type,
            &self.http_authorization,
        ]) || !self.http_custom_headers.is_empty()
        {
            kinds.push(StreamType::Http);
        }
        if any(&[&self.datadog_region, &self.datadog_api_key]) {
            kinds.push(StreamType::Datadog);
        }
        if any(&[&self.splunk_domain, &self.splunk_token, &self.splunk_port]) {
            kinds.push(StreamType::Splunk);
        }
        if any(&[&self.sumo_source_address]) {
            kinds.push(StreamType::Sumo);
        }
        if any(&[
            &self.mixpanel_region,
            &self.mixpanel_project_id,
            &self.mixpanel_service_account_username,
            &self.mixpanel_service_account_password,
        ]) {
            kinds.push(StreamType::Mixpanel);
        }
        if any(&[&self.segment_write_key]) {
            kinds.push(StreamType::Segment);
        }
        kinds
    }

    /// Fill sensitive fields left empty from a previously stored block.
    pub fn retain_secrets(&mut self, prior: &SinkBlock) {
        keep_if_empty(&mut self.http_authorization, &prior.http_authorization);
        keep_if_empty(&mut self.datadog_api_key, &prior.datadog_api_key);
        keep_if_empty(&mut self.splunk_token, &prior.splunk_token);
        keep_if_empty(
            &mut self.mixpanel_service_account_password,
            &prior.mixpanel_service_account_password,
        );
        keep_if_empty(&mut self.segment_write_key, &prior.segment_write_key);
    }

    /// Fill computed fields left empty from a previously stored block.
    pub fn retain_computed(&mut self, prior: &SinkBlock) {
        keep_if_empty(
            &mut self.aws_partner_event_source,
            &prior.aws_partner_event_source,
        );
        keep_if_empty(&mut self.azure_partner_topic, &prior.azure_partner_topic);
    }
}

impl From<&management::Sink> for SinkBlock {
    fn from(sink: &management::Sink) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            aws_account_id: text(&sink.aws_account_id),
            aws_region: text(&sink.aws_region),
            aws_partner_event_source: text(&sink.aws_partner_event_source),
            azure_subscription_id: text(&sink.azure_subscription_id),
            azure_resource_group: text(&sink.azure_resource_group),
            azure_region: text(&sink.azure_region),
            azure_partner_topic: text(&sink.azure_partner_topic),
            http_content_format: text(&sink.http_content_format),
            http_content_type: text(&sink.http_content_type),
            http_endpoint: text(&sink.http_endpoint),
            http_authorization: text(&sink.http_authorization),
            http_custom_headers: sink.http_custom_headers.clone().unwrap_or_default(),
            datadog_region: text(&sink.datadog_region),
            datadog_api_key: text(&sink.datadog_api_key),
            splunk_domain: text(&sink.splunk_domain),
            splunk_token: text(&sink.splunk_token),
            splunk_port: text(&sink.splunk_port),
            splunk_secure: sink.splunk_secure.unwrap_or_default(),
            sumo_source_address: text(&sink.sumo_source_address),
            mixpanel_region: text(&sink.mixpanel_region),
            mixpanel_project_id: text(&sink.mixpanel_project_id),
            mixpanel_service_account_username: text(&sink.mixpanel_service_account_username),
            mixpanel_service_account_password: text(&sink.mixpanel_service_account_password),
            segment_write_key: text(&sink.segment_write_key),
        }
    }
}

/// A sink configured for exactly one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Sink {
    EventBridge {
        account_id: String,
        region: String,
        partner_event_source: Option<String>,
    },
    EventGrid {
        subscription_id: String,
        resource_group: String,
        region: String,
        partner_topic: Option<String>,
    },
    Http {
        endpoint: String,
        content_format: String,
        content_type: String,
        authorization: String,
        custom_headers: Vec<BTreeMap<String, String>>,
    },
    Datadog {
        region: String,
        api_key: String,
    },
    Splunk {
        domain: String,
        token: String,
        port: String,
        secure: bool,
    },
    Sumo {
        source_address: String,
    },
    Mixpanel {
        region: String,
        project_id: String,
        service_account_username: String,
        service_account_password: String,
    },
    Segment {
        write_key: String,
    },
}

impl Sink {
    /// The provider this sink belongs to.
    pub fn kind(&self) -> StreamType {
        match self {
            Sink::EventBridge { .. } => StreamType::EventBridge,
            Sink::EventGrid { .. } => StreamType::EventGrid,
            Sink::Http { .. } => StreamType::Http,
            Sink::Datadog { .. } => StreamType::Datadog,
            Sink::Splunk { .. } => StreamType::Splunk,
            Sink::Sumo { .. } => StreamType::Sumo,
            Sink::Mixpanel { .. } => StreamType::Mixpanel,
            Sink::Segment { .. } => StreamType::Segment,
        }
    }

    /// Select the single populated provider of a sink block.
    pub fn from_block(block: &SinkBlock) -> Result<Self, ProviderError> {
        let populated = block.populated();
        let kind = match populated.as_slice() {
            [kind] => *kind,
            [] => {
                return Err(ProviderError::Validation(
                    "sink has no provider settings".to_string(),
                ))
            },
            many => {
                let names: Vec<&str> = many.iter().map(StreamType::as_str).collect();
                return Err(ProviderError::Validation(format!(
                    "sink mixes settings of several providers: {}",
                    names.join(", ")
                )));
            },
        };

        let b = block.clone();
        Ok(match kind {
            StreamType::EventBridge => Sink::EventBridge {
                account_id: b.aws_account_id,
                region: b.aws_region,
                partner_event_source: non_empty(b.aws_partner_event_source),
            },
            StreamType::EventGrid => Sink::EventGrid {
                subscription_id: b.azure_subscription_id,
                resource_group: b.azure_resource_group,
                region: b.azure_region,
                partner_topic: non_empty(b.azure_partner_topic),
            },
            StreamType::Http => Sink::Http {
                endpoint: b.http_endpoint,
                content_format: b.http_content_format,
                content_type: b.http_content_type,
                authorization: b.http_authorization,
                custom_headers: b.http_custom_headers,
            },
            StreamType::Datadog => Sink::Datadog {
                region: b.datadog_region,
                api_key: b.datadog_api_key,
            },
            StreamType::Splunk => Sink::Splunk {
                domain: b.splunk_domain,
                token: b.splunk_token,
                port: b.splunk_port,
                secure: b.splunk_secure,
            },
            StreamType::Sumo => Sink::Sumo {
                source_address: b.sumo_source_address,
            },
            StreamType::Mixpanel => Sink::Mixpanel {
                region: b.mixpanel_region,
                project_id: b.mixpanel_project_id,
                service_account_username: b.mixpanel_service_account_username,
                service_account_password: b.mixpanel_service_account_password,
            },
            StreamType::Segment => Sink::Segment {
                write_key: b.segment_write_key,
            },
        })
    }
}

impl From<Sink> for management::Sink {
    /// Only the selected provider's fields are set; empty strings become absent.
    fn from(sink: Sink) -> Self {
        let mut wire = management::Sink::default();
        match sink {
            Sink::EventBridge {
                account_id,
                region,
                partner_event_source,
            } => {
                wire.aws_account_id = non_empty(account_id);
                wire.aws_region = non_empty(region);
                wire.aws_partner_event_source = partner_event_source;
            },
            Sink::EventGrid {
                subscription_id,
                resource_group,
                region,
                partner_topic,
            } => {
                wire.azure_subscription_id = non_empty(subscription_id);
                wire.azure_resource_group = non_empty(resource_group);
                wire.azure_region = non_empty(region);
                wire.azure_partner_topic = partner_topic;
            },
            Sink::Http {
                endpoint,
                content_format,
                content_type,
                authorization,
                custom_headers,
            } => {
                wire.http_endpoint = non_empty(endpoint);
                wire.http_content_format = non_empty(content_format);
                wire.http_content_type = non_empty(content_type);
                wire.http_authorization = non_empty(authorization);
                if !custom_headers.is_empty() {
                    wire.http_custom_headers = Some(custom_headers);
                }
            },
            Sink::Datadog { region, api_key } => {
                wire.datadog_region = non_empty(region);
                wire.datadog_api_key = non_empty(api_key);
            },
            Sink::Splunk {
                domain,
                token,
                port,
                secure,
            } => {
                wire.splunk_domain = non_empty(domain);
                wire.splunk_token = non_empty(token);
                wire.splunk_port = non_empty(port);
                wire.splunk_secure = Some(secure);
            },
            Sink::Sumo { source_address } => {
                wire.sumo_source_address = non_empty(source_address);
            },
            Sink::Mixpanel {
                region,
                project_id,
                service_account_username,
                service_account_password,
            } => {
                wire.mixpanel_region = non_empty(region);
                wire.mixpanel_project_id = non_empty(project_id);
                wire.mixpanel_service_account_username = non_empty(service_account_username);
                wire.mixpanel_service_account_password = non_empty(service_account_password);
            },
            Sink::Segment { write_key } => {
                wire.segment_write_key = non_empty(write_key);
            },
        }
        wire
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn keep_if_empty(current: &mut String, prior: &str) {
    if current.is_empty() && !prior.is_empty() {
        *current = prior.to_string();
    }
}

/// Unwrap a `sink` given as a list of at most one block.
fn single_sink(mut value: Value) -> Value {
    if let Some(sink) = value.get_mut("sink") {
        let single = match sink {
            Value::Array(items) if items.len() <= 1 => Some(items.pop().unwrap_or(Value::Null)),
            _ => None,
        };
        if let Some(single) = single {
            *sink = single;
        }
    }
    value
}

/// Drop null object entries so `#[serde(default)]` fills them in.
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}
