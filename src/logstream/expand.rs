//! Attribute bag to management API request.

use super::model::{LogStreamConfig, Sink, StreamType};
use crate::error::ProviderError;
use crate::management::{self, LogStream};

/// Which request the payload is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandMode {
    /// `POST /log-streams`: carries the type, never the status.
    Create,
    /// `PATCH /log-streams/{id}`: carries the status, never the type.
    Update,
}

/// Build the request body for `config`.
///
/// Only the fields of the provider selected by the populated sink settings
/// are sent. On update, EventBridge and EventGrid sinks are left out since
/// the API refuses to change them, and an HTTP sink always carries its
/// custom headers so an empty list clears them.
pub fn expand(config: &LogStreamConfig, mode: ExpandMode) -> Result<LogStream, ProviderError> {
    let sink = Sink::from_block(&config.sink)?;

    let request = match mode {
        ExpandMode::Create => LogStream {
            name: Some(config.name.clone()),
            stream_type: Some(config.stream_type()?.as_str().to_string()),
            filters: if config.filters.is_empty() {
                None
            } else {
                Some(config.filters.clone())
            },
            sink: Some(sink.into()),
            ..Default::default()
        },
        ExpandMode::Update => LogStream {
            name: Some(config.name.clone()),
            status: config.status().map(str::to_string),
            filters: Some(config.filters.clone()),
            sink: update_sink(sink),
            ..Default::default()
        },
    };

    Ok(request)
}

fn update_sink(sink: Sink) -> Option<management::Sink> {
    let kind = sink.kind();
    if !kind.sink_is_mutable() {
        return None;
    }
    let mut wire: management::Sink = sink.into();
    if kind == StreamType::Http && wire.http_custom_headers.is_none() {
        wire.http_custom_headers = Some(Vec::new());
    }
    Some(wire)
}
