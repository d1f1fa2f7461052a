//! Management API response to attribute bag.

use super::model::{LogStreamConfig, SinkBlock};
use crate::management::LogStream;

/// Build the stored state from an API response.
///
/// Every sink field is written, unset ones as zero values. Sensitive fields
/// the API leaves out are carried over from `prior`.
pub fn flatten(response: &LogStream, prior: Option<&LogStreamConfig>) -> LogStreamConfig {
    let mut sink = response
        .sink
        .as_ref()
        .map(SinkBlock::from)
        .unwrap_or_default();
    if let Some(prior) = prior {
        sink.retain_secrets(&prior.sink);
    }

    LogStreamConfig {
        id: response
            .id
            .clone()
            .or_else(|| prior.and_then(|p| p.id.clone())),
        name: response.name.clone().unwrap_or_default(),
        stream_type: response.stream_type.clone().unwrap_or_default(),
        status: response.status.clone(),
        filters: response.filters.clone().unwrap_or_default(),
        sink,
    }
}
